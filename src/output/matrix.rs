use comfy_table::{Cell, Color};

use crate::core::{MatrixCell, WatchMatrix};
use crate::output::format::{create_styled_table, format_count, header_cell, styled_cell};

/// `"<views> views"`, plus `"<m>m <s>s"` when any time was recorded.
/// Minutes are not rolled over into hours here.
fn cell_text(cell: Option<&MatrixCell>) -> String {
    match cell {
        None => "-".to_string(),
        Some(cell) if cell.time > 0 => format!(
            "{} views\n{}m {}s",
            format_count(cell.views),
            cell.time / 60,
            cell.time % 60
        ),
        Some(cell) => format!("{} views", format_count(cell.views)),
    }
}

pub(crate) fn render_matrix_table(matrix: &WatchMatrix, use_color: bool) -> String {
    if matrix.users.is_empty() || matrix.videos.is_empty() {
        return "No watch data found.\n".to_string();
    }

    let mut table = create_styled_table();
    let mut header = vec![header_cell("User", use_color)];
    header.extend(
        matrix
            .videos
            .iter()
            .map(|video| header_cell(&video.title, use_color)),
    );
    table.set_header(header);

    let seen_color = if use_color { Some(Color::Green) } else { None };
    for user in &matrix.users {
        let mut row = vec![styled_cell(&user.name, None, true)];
        for video in &matrix.videos {
            let cell = matrix.cell(user, video);
            let text = cell_text(cell);
            if cell.is_some_and(MatrixCell::has_view) {
                row.push(styled_cell(&text, seen_color, false));
            } else {
                row.push(Cell::new(text));
            }
        }
        table.add_row(row);
    }

    format!(
        "{table}\n\n  {} users x {} videos\n",
        matrix.users.len(),
        matrix.videos.len()
    )
}
