//! REST API source
//!
//! Plain blocking GETs against the platform API. Requests carry
//! `Authorization: Token <token>` when a token is configured.

use serde_json::Value;
use std::time::{Duration, Instant};

use crate::error::SourceError;
use crate::source::{Capabilities, Endpoint, Source};

pub(crate) struct ApiSource {
    base_url: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl ApiSource {
    pub(crate) fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        ApiSource {
            base_url: normalize_base_url(base_url),
            token: token.filter(|t| !t.trim().is_empty()),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub(crate) fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

/// Ensure exactly one trailing slash so endpoint paths can be appended
fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

fn map_error(url: &str, err: ureq::Error) -> SourceError {
    match err {
        ureq::Error::StatusCode(401) => SourceError::Unauthorized {
            url: url.to_string(),
        },
        ureq::Error::StatusCode(status) => SourceError::Status {
            url: url.to_string(),
            status,
        },
        other => SourceError::Transport {
            url: url.to_string(),
            message: other.to_string(),
        },
    }
}

impl Source for ApiSource {
    fn display_name(&self) -> String {
        self.base_url.clone()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            filters_server_side: true,
        }
    }

    fn fetch(&self, endpoint: Endpoint, query: &[(&'static str, String)]) -> Result<Value, SourceError> {
        let url = self.endpoint_url(endpoint);
        let start = Instant::now();

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(*key, value);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Token {token}"));
        } else {
            tracing::debug!(%url, "no API token configured, sending unauthenticated request");
        }

        let response = request.call().map_err(|e| map_error(&url, e))?;
        let mut body = response.into_body();
        let payload: Value =
            serde_json::from_reader(body.as_reader()).map_err(|source| SourceError::Json {
                origin: url.clone(),
                source,
            })?;

        tracing::debug!(
            %url,
            params = query.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "fetched payload"
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_single_trailing_slash() {
        assert_eq!(normalize_base_url("http://x/api"), "http://x/api/");
        assert_eq!(normalize_base_url("http://x/api/"), "http://x/api/");
        assert_eq!(normalize_base_url(" http://x/api// "), "http://x/api/");
    }

    #[test]
    fn endpoint_urls() {
        let source = ApiSource::new("http://localhost:8000/api", None, Duration::from_secs(1));
        assert_eq!(
            source.endpoint_url(Endpoint::InteractionLogs),
            "http://localhost:8000/api/admin/interaction-logs/"
        );
        assert_eq!(
            source.endpoint_url(Endpoint::ViewLogs),
            "http://localhost:8000/api/videos/view_logs/"
        );
        assert_eq!(
            source.endpoint_url(Endpoint::WatchMatrix),
            "http://localhost:8000/api/analytics/watch_matrix/"
        );
    }

    #[test]
    fn blank_token_is_ignored() {
        let source = ApiSource::new("http://x/api", Some("  ".into()), Duration::from_secs(1));
        assert!(source.token.is_none());
    }

    #[test]
    fn status_errors_are_classified() {
        assert!(matches!(
            map_error("u", ureq::Error::StatusCode(401)),
            SourceError::Unauthorized { .. }
        ));
        assert!(matches!(
            map_error("u", ureq::Error::StatusCode(503)),
            SourceError::Status { status: 503, .. }
        ));
    }
}
