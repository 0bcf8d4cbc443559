//! Data source abstraction layer
//!
//! The live API and a JSON export on disk both implement [`Source`], so the
//! loaders and everything above them do not care where payloads come from.

pub(crate) mod api;
pub(crate) mod file;
pub(crate) mod loader;
pub(crate) mod parser;

use serde_json::Value;

use crate::error::SourceError;

/// Endpoints the analytics pages read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    InteractionLogs,
    ViewLogs,
    WatchMatrix,
}

impl Endpoint {
    /// Path relative to the API root
    pub(crate) fn path(self) -> &'static str {
        match self {
            Endpoint::InteractionLogs => "admin/interaction-logs/",
            Endpoint::ViewLogs => "videos/view_logs/",
            Endpoint::WatchMatrix => "analytics/watch_matrix/",
        }
    }

    /// Top-level key under which a bundled export stores this payload
    pub(crate) fn bundle_key(self) -> &'static str {
        match self {
            Endpoint::InteractionLogs => "interaction_logs",
            Endpoint::ViewLogs => "view_logs",
            Endpoint::WatchMatrix => "watch_matrix",
        }
    }
}

/// Capabilities that a data source may support
#[derive(Debug, Clone, Default)]
pub(crate) struct Capabilities {
    /// Query parameters are honored by the source itself
    pub(crate) filters_server_side: bool,
}

pub(crate) trait Source {
    /// Display name for messages
    fn display_name(&self) -> String;

    fn capabilities(&self) -> Capabilities;

    /// Fetch the raw JSON payload of one endpoint
    fn fetch(&self, endpoint: Endpoint, query: &[(&'static str, String)]) -> Result<Value, SourceError>;
}

pub(crate) use api::ApiSource;
pub(crate) use file::FileSource;
pub(crate) use loader::{load_interactions, load_matrix, load_watch_logs};
