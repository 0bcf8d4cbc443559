use chrono::{DateTime, Utc};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, TableComponent,
    modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};

use crate::consts::{DATE_FORMAT, DATETIME_FORMAT};
use crate::utils::Timezone;

/// Thousands-separated integer
pub(crate) fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Seconds as `"Xh Ym Zs"`; the hour part is dropped when zero.
/// Hours are not rolled over into days.
pub(crate) fn format_watch_time(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else {
        format!("{m}m {s}s")
    }
}

pub(crate) fn format_timestamp(ts: Option<DateTime<Utc>>, timezone: Timezone) -> String {
    match ts {
        Some(ts) => timezone.format(ts, DATETIME_FORMAT),
        None => "-".to_string(),
    }
}

pub(crate) fn format_date(ts: Option<DateTime<Utc>>, timezone: Timezone) -> String {
    match ts {
        Some(ts) => timezone.format(ts, DATE_FORMAT),
        None => "?".to_string(),
    }
}

/// Display label for an interaction category
pub(crate) fn category_label(category: &str) -> &str {
    match category {
        "post" => "Post",
        "video" => "Video",
        "knowhow" => "Know-how",
        "task" => "Task",
        "news" => "News",
        "mission" => "Mission",
        "notice" => "NOTICE",
        other => other,
    }
}

/// At most `max_chars` characters of an id
pub(crate) fn short_id(id: &str, max_chars: usize) -> &str {
    match id.char_indices().nth(max_chars) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

pub(crate) fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub(crate) fn styled_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(c) = color {
        cell = cell.fg(c);
    }
    if bold {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

pub(crate) fn header_cell(text: &str, use_color: bool) -> Cell {
    let mut cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell = cell.fg(Color::Cyan);
    }
    cell
}

pub(crate) fn right_cell(text: &str, color: Option<Color>, bold: bool) -> Cell {
    styled_cell(text, color, bold).set_alignment(CellAlignment::Right)
}

/// Replace the double-line header separator (╞═╪═╡) with single-line (├─┼─┤)
fn normalize_header_separator(table: &mut Table) {
    table.set_style(TableComponent::HeaderLines, '─');
    table.set_style(TableComponent::LeftHeaderIntersection, '├');
    table.set_style(TableComponent::MiddleHeaderIntersections, '┼');
    table.set_style(TableComponent::RightHeaderIntersection, '┤');
}

pub(crate) fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    normalize_header_separator(&mut table);
    table
}
