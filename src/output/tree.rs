//! Collapsible tree tables for interaction and watch logs
//!
//! Rows come from the visible-row projection, so the tables only ever show
//! what the expand state lets through. Disclosure markers follow the usual
//! `▸` collapsed / `▾` expanded convention.

use comfy_table::{Cell, Color};

use crate::core::{RowKind, VisibleRow};
use crate::output::format::{
    category_label, create_styled_table, format_count, format_date, format_timestamp,
    format_watch_time, header_cell, right_cell, short_id, styled_cell,
};
use crate::utils::Timezone;

/// Longest user id shown next to a display name
const USER_ID_CHARS: usize = 16;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) use_color: bool,
    pub(crate) timezone: Timezone,
}

fn marker(row: &VisibleRow) -> &'static str {
    if row.expanded { "▾" } else { "▸" }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn interaction_label(row: &VisibleRow) -> String {
    let pad = indent(row.depth);
    match row.kind {
        RowKind::Team => format!("{pad}{} TEAM {}", marker(row), row.label),
        RowKind::User => match &row.detail {
            Some(id) => format!(
                "{pad}{} {} (ID: {})",
                marker(row),
                row.label,
                short_id(id, USER_ID_CHARS)
            ),
            None => format!("{pad}{} {}", marker(row), row.label),
        },
        RowKind::Category => format!("{pad}{} [{}]", marker(row), category_label(&row.label)),
        _ => format!("{pad}└ {}", row.label),
    }
}

fn watch_label(row: &VisibleRow) -> String {
    let pad = indent(row.depth);
    match row.kind {
        RowKind::Video => format!("{pad}{} {}", marker(row), row.label),
        _ => match &row.detail {
            Some(name) => format!("{pad}└ {} ({name})", row.label),
            None => format!("{pad}└ {}", row.label),
        },
    }
}

fn group_color(kind: RowKind, use_color: bool) -> Option<Color> {
    if !use_color {
        return None;
    }
    match kind {
        RowKind::Team | RowKind::Video => Some(Color::Cyan),
        RowKind::User => Some(Color::Yellow),
        RowKind::Category => Some(Color::Magenta),
        _ => None,
    }
}

fn empty_row(columns: usize) -> Vec<Cell> {
    let mut row = vec![Cell::new("No logs found")];
    row.extend((1..columns).map(|_| Cell::new("")));
    row
}

/// Interaction tree as a three-column table followed by a summary line
pub(crate) fn render_interaction_table(
    rows: &[VisibleRow],
    total: u64,
    options: TableOptions,
) -> String {
    let use_color = options.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Target / Item", use_color),
        header_cell("Clicks", use_color),
        header_cell("Last log", use_color),
    ]);

    if rows.is_empty() {
        table.add_row(empty_row(3));
    }

    for row in rows {
        let is_group = row.key.is_some();
        let color = group_color(row.kind, use_color);
        // Group rows carry no timestamp of their own
        let last = if row.kind == RowKind::Item {
            format_timestamp(row.last_at, options.timezone)
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            styled_cell(&interaction_label(row), color, row.kind == RowKind::Team),
            right_cell(&format_count(row.value), color, is_group),
            Cell::new(last),
        ]);
    }

    format!("{table}\n\n  {} interactions\n", format_count(total))
}

/// Watch tree as a three-column table followed by a summary line
pub(crate) fn render_watch_table(
    rows: &[VisibleRow],
    total_watch_time: u64,
    options: TableOptions,
) -> String {
    let use_color = options.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Video", use_color),
        header_cell("Watch time", use_color),
        header_cell("Period (first - latest)", use_color),
    ]);

    if rows.is_empty() {
        table.add_row(empty_row(3));
    }

    let mut videos = 0usize;
    for row in rows {
        let (period, color) = if row.kind == RowKind::Video {
            videos += 1;
            let period = format!(
                "{} - {}",
                format_date(row.first_at, options.timezone),
                format_date(row.last_at, options.timezone)
            );
            (period, group_color(row.kind, use_color))
        } else {
            (format_timestamp(row.last_at, options.timezone), None)
        };
        let bold = row.kind == RowKind::Video;
        table.add_row(vec![
            styled_cell(&watch_label(row), color, bold),
            right_cell(&format_watch_time(row.value), color, bold),
            Cell::new(period),
        ]);
    }

    format!(
        "{table}\n\n  {} videos | {} watched in total\n",
        format_count(videos as u64),
        format_watch_time(total_watch_time)
    )
}
