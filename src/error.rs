use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error(
        "Invalid expand key \"{input}\" (expected team=<name>, user=<id>, category=<user>/<category> or video=<title>)"
    )]
    InvalidExpandKey { input: String },

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error("Unauthorized (401) from {url}: token is missing or invalid")]
    Unauthorized { url: String },

    #[error("Request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected payload from {origin}: {expected}")]
    Shape {
        origin: String,
        expected: &'static str,
    },
}
