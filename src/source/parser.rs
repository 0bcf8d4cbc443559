//! API payload → typed records
//!
//! The API is loosely typed: fields go missing, come back as `null` or as
//! numbers where strings were expected. Every field is read with a
//! parse-or-default rule so that a sparse record still ends up in the tree
//! under a sentinel label instead of being dropped.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::consts::{NO_ITEM, UNKNOWN, UNKNOWN_VIDEO, UNSET_TEAM};
use crate::core::{InteractionRecord, MatrixCell, MatrixUser, MatrixVideo, WatchMatrix, WatchRecord};
use crate::error::SourceError;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp. Offset-less values are taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// First non-blank textual value among `names`. Numbers count as text
/// since ids are sometimes serialized as integers.
fn text_field(value: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| match value.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn seconds_field(value: &Value, name: &str) -> u64 {
    match value.get(name) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<f64>().map_or(0, |f| f.max(0.0) as u64),
        _ => 0,
    }
}

fn timestamp_field(value: &Value, name: &str) -> Option<DateTime<Utc>> {
    let raw = text_field(value, &[name])?;
    let parsed = parse_timestamp(&raw);
    if parsed.is_none() {
        tracing::debug!(field = name, raw = %raw, "unparseable timestamp kept as unknown");
    }
    parsed
}

fn or_sentinel(field: Option<String>, sentinel: &str, name: &str) -> String {
    field.unwrap_or_else(|| {
        tracing::debug!(field = name, sentinel, "missing field replaced by sentinel");
        sentinel.to_string()
    })
}

/// The record list of a response: either a bare array or a paginated
/// object carrying a `results` array.
pub(crate) fn record_list<'a>(payload: &'a Value, origin: &str) -> Result<&'a [Value], SourceError> {
    match payload {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            _ => Err(SourceError::Shape {
                origin: origin.to_string(),
                expected: "a JSON array of log records",
            }),
        },
        _ => Err(SourceError::Shape {
            origin: origin.to_string(),
            expected: "a JSON array of log records",
        }),
    }
}

pub(crate) fn parse_interaction(value: &Value) -> InteractionRecord {
    let user_id = or_sentinel(text_field(value, &["user_id"]), UNKNOWN, "user_id");
    let display_name = text_field(value, &["display_name"]).unwrap_or_else(|| user_id.clone());
    InteractionRecord {
        display_name,
        team: or_sentinel(text_field(value, &["team"]), UNSET_TEAM, "team"),
        category: or_sentinel(text_field(value, &["category"]), UNKNOWN, "category"),
        item_id: text_field(value, &["item_id"]).unwrap_or_else(|| NO_ITEM.to_string()),
        item_title: text_field(value, &["item_title"]).unwrap_or_else(|| UNKNOWN.to_string()),
        created_at: timestamp_field(value, "created_at"),
        user_id,
    }
}

pub(crate) fn parse_watch(value: &Value) -> WatchRecord {
    // `user` is either the id itself or a nested user object
    let (user_id, nested_name) = match value.get("user") {
        Some(user @ Value::Object(_)) => (
            text_field(user, &["user_id", "id"]),
            text_field(user, &["display_name", "name"]),
        ),
        _ => (text_field(value, &["user", "user_id"]), None),
    };
    let user_id = or_sentinel(user_id, UNKNOWN, "user");
    let display_name = text_field(value, &["display_name"])
        .or(nested_name)
        .unwrap_or_else(|| user_id.clone());
    WatchRecord {
        display_name,
        video_title: or_sentinel(text_field(value, &["video_title"]), UNKNOWN_VIDEO, "video_title"),
        watch_time: seconds_field(value, "watch_time"),
        last_watched_at: timestamp_field(value, "last_watched_at"),
        user_id,
    }
}

pub(crate) fn parse_interaction_logs(payload: &Value, origin: &str) -> Result<Vec<InteractionRecord>, SourceError> {
    Ok(record_list(payload, origin)?
        .iter()
        .map(parse_interaction)
        .collect())
}

pub(crate) fn parse_watch_logs(payload: &Value, origin: &str) -> Result<Vec<WatchRecord>, SourceError> {
    Ok(record_list(payload, origin)?.iter().map(parse_watch).collect())
}

pub(crate) fn parse_watch_matrix(payload: &Value, origin: &str) -> Result<WatchMatrix, SourceError> {
    let shape_error = || SourceError::Shape {
        origin: origin.to_string(),
        expected: "an object with users, videos and matrix",
    };
    let users = payload.get("users").and_then(Value::as_array).ok_or_else(shape_error)?;
    let videos = payload.get("videos").and_then(Value::as_array).ok_or_else(shape_error)?;

    let users = users
        .iter()
        .filter_map(|u| {
            let Some(id) = text_field(u, &["id"]) else {
                // A user without an id cannot be matched against matrix cells
                tracing::debug!(origin, entry = %u, "skipping matrix user without id");
                return None;
            };
            let name = text_field(u, &["name", "display_name"]).unwrap_or_else(|| id.clone());
            Some(MatrixUser { id, name })
        })
        .collect();
    let videos = videos
        .iter()
        .filter_map(|v| {
            let Some(id) = text_field(v, &["id"]) else {
                tracing::debug!(origin, entry = %v, "skipping matrix video without id");
                return None;
            };
            let title = text_field(v, &["title"]).unwrap_or_else(|| UNKNOWN_VIDEO.to_string());
            Some(MatrixVideo { id, title })
        })
        .collect();

    let cells: HashMap<String, MatrixCell> = match payload.get("matrix") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, cell)| {
                let cell = MatrixCell {
                    time: seconds_field(cell, "time"),
                    views: seconds_field(cell, "views"),
                };
                (key.clone(), cell)
            })
            .collect(),
        Some(Value::Null) | None => HashMap::new(),
        Some(_) => return Err(shape_error()),
    };

    Ok(WatchMatrix {
        users,
        videos,
        cells,
    })
}
