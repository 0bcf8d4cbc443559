mod csv;
mod format;
mod json;
mod matrix;
mod tree;

pub(crate) use csv::{interactions_csv, matrix_csv, watch_csv};
pub(crate) use json::{interactions_json, matrix_json, watch_json};
pub(crate) use matrix::render_matrix_table;
pub(crate) use tree::{TableOptions, render_interaction_table, render_watch_table};
