//! Fetch → parse → filter pipeline shared by all commands

use std::time::Instant;

use crate::core::{InteractionRecord, LogFilter, WatchMatrix, WatchRecord};
use crate::error::SourceError;
use crate::source::parser::{parse_interaction_logs, parse_watch_logs, parse_watch_matrix};
use crate::source::{Endpoint, Source};
use crate::utils::Timezone;

/// Drop records the filter rejects, unless the source already filtered
fn apply_local_filter<R>(
    source: &dyn Source,
    records: Vec<R>,
    keep: impl Fn(&R) -> bool,
) -> Vec<R> {
    if source.capabilities().filters_server_side {
        return records;
    }
    let before = records.len();
    let kept: Vec<R> = records.into_iter().filter(|r| keep(r)).collect();
    tracing::debug!(before, after = kept.len(), "applied local filter");
    kept
}

pub(crate) fn load_interactions(
    source: &dyn Source,
    filter: &LogFilter,
    timezone: Timezone,
) -> Result<Vec<InteractionRecord>, SourceError> {
    let start = Instant::now();
    let payload = source.fetch(Endpoint::InteractionLogs, &filter.interaction_query())?;
    let records = parse_interaction_logs(&payload, &source.display_name())?;
    let records = apply_local_filter(source, records, |r| filter.matches_interaction(r, timezone));
    tracing::debug!(
        records = records.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "loaded interaction logs"
    );
    Ok(records)
}

pub(crate) fn load_watch_logs(
    source: &dyn Source,
    filter: &LogFilter,
    timezone: Timezone,
) -> Result<Vec<WatchRecord>, SourceError> {
    let start = Instant::now();
    let payload = source.fetch(Endpoint::ViewLogs, &filter.watch_query())?;
    let records = parse_watch_logs(&payload, &source.display_name())?;
    let records = apply_local_filter(source, records, |r| filter.matches_watch(r, timezone));
    tracing::debug!(
        records = records.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "loaded watch logs"
    );
    Ok(records)
}

pub(crate) fn load_matrix(source: &dyn Source) -> Result<WatchMatrix, SourceError> {
    let payload = source.fetch(Endpoint::WatchMatrix, &[])?;
    let matrix = parse_watch_matrix(&payload, &source.display_name())?;
    tracing::debug!(
        users = matrix.users.len(),
        videos = matrix.videos.len(),
        "loaded watch matrix"
    );
    Ok(matrix)
}
