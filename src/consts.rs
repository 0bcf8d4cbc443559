/// Standard date format used for filters and short date display: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for per-record columns
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Team label for records without a team
pub(crate) const UNSET_TEAM: &str = "unset";

/// Item key for records without an item id
pub(crate) const NO_ITEM: &str = "none";

/// Fallback for missing user ids, categories and item titles
pub(crate) const UNKNOWN: &str = "unknown";

/// Fallback for watch logs without a video title
pub(crate) const UNKNOWN_VIDEO: &str = "unknown video";

/// Default API root when neither the CLI nor the config names one
pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Default HTTP timeout in seconds
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;
