//! Core module - record types, aggregation and the table view model

mod aggregator;
mod expand;
mod filter;
mod types;
mod view;

pub(crate) use aggregator::{ChildOrder, interaction_leaf_total, total_watch_time};
#[cfg(test)]
pub(crate) use aggregator::{aggregate_interactions, aggregate_watch};
pub(crate) use expand::{ExpandState, NodeKey};
pub(crate) use filter::LogFilter;
pub(crate) use types::{
    InteractionRecord, MatrixCell, MatrixUser, MatrixVideo, TeamGroup, VideoGroup, WatchMatrix,
    WatchRecord, rfc3339,
};
pub(crate) use view::{AnalysisView, FetchOutcome, RowKind, VisibleRow};
