//! Core data types shared by the loaders, the aggregator and the renderers
//!
//! Records are already normalized: every string field holds either real data
//! or a sentinel, so nothing downstream has to deal with missing values
//! except timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// RFC 3339 in UTC with a `Z` suffix; fractional seconds only when present
pub(crate) fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn serialize_ts<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => s.serialize_str(&rfc3339(ts)),
        None => s.serialize_none(),
    }
}

/// One interaction (tap/click) event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct InteractionRecord {
    pub(crate) user_id: String,
    /// Falls back to `user_id`
    pub(crate) display_name: String,
    pub(crate) team: String,
    pub(crate) category: String,
    pub(crate) item_id: String,
    pub(crate) item_title: String,
    /// `None` when the API sent nothing parseable
    #[serde(serialize_with = "serialize_ts")]
    pub(crate) created_at: Option<DateTime<Utc>>,
}

/// Accumulated watch time of one user on one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct WatchRecord {
    pub(crate) user_id: String,
    pub(crate) display_name: String,
    pub(crate) video_title: String,
    /// Seconds
    pub(crate) watch_time: u64,
    #[serde(serialize_with = "serialize_ts")]
    pub(crate) last_watched_at: Option<DateTime<Utc>>,
}

/// Leaf of the interaction tree: every record for one item merged together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ItemSummary {
    pub(crate) item_id: String,
    pub(crate) title: String,
    pub(crate) count: u64,
    #[serde(serialize_with = "serialize_ts")]
    pub(crate) last_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryGroup {
    pub(crate) name: String,
    pub(crate) total_count: u64,
    pub(crate) items: Vec<ItemSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct UserGroup {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) total_count: u64,
    pub(crate) categories: Vec<CategoryGroup>,
}

/// Top level of the interaction tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TeamGroup {
    pub(crate) name: String,
    pub(crate) total_count: u64,
    pub(crate) users: Vec<UserGroup>,
}

/// Top level of the watch tree. Logs are kept as-is, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct VideoGroup {
    pub(crate) title: String,
    pub(crate) total_watch_time: u64,
    #[serde(serialize_with = "serialize_ts")]
    pub(crate) first_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "serialize_ts")]
    pub(crate) last_at: Option<DateTime<Utc>>,
    pub(crate) logs: Vec<WatchRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MatrixUser {
    pub(crate) id: String,
    pub(crate) name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MatrixVideo {
    pub(crate) id: String,
    pub(crate) title: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct MatrixCell {
    /// Seconds
    pub(crate) time: u64,
    pub(crate) views: u64,
}

impl MatrixCell {
    pub(crate) fn has_view(&self) -> bool {
        self.time > 0 || self.views > 0
    }
}

/// Users × videos grid as served by the analytics endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WatchMatrix {
    pub(crate) users: Vec<MatrixUser>,
    pub(crate) videos: Vec<MatrixVideo>,
    /// Keyed the way the API keys them, see [`matrix_key`]
    pub(crate) cells: HashMap<String, MatrixCell>,
}

/// Wire key of a matrix cell: `"<user_id>_<video_id>"`
pub(crate) fn matrix_key(user_id: &str, video_id: &str) -> String {
    format!("{user_id}_{video_id}")
}

impl WatchMatrix {
    pub(crate) fn cell(&self, user: &MatrixUser, video: &MatrixVideo) -> Option<&MatrixCell> {
        self.cells.get(&matrix_key(&user.id, &video.id))
    }
}
