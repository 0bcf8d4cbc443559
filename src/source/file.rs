//! JSON export source
//!
//! Reads a saved API response from disk, or from stdin when the path is
//! `-`. A file may hold a single payload, or a bundle object with one key
//! per endpoint (`interaction_logs`, `view_logs`, `watch_matrix`).

use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

use crate::error::SourceError;
use crate::source::{Capabilities, Endpoint, Source};

pub(crate) struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub(crate) fn new(path: PathBuf) -> Self {
        FileSource { path }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    fn read(&self) -> Result<String, SourceError> {
        let io_error = |source| SourceError::Io {
            origin: self.display_name(),
            source,
        };
        if self.is_stdin() {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(io_error)?;
            Ok(buf)
        } else {
            std::fs::read_to_string(&self.path).map_err(io_error)
        }
    }
}

/// Pick the endpoint's section out of a bundle, or use the whole document
fn select_payload(mut doc: Value, endpoint: Endpoint) -> Value {
    if let Value::Object(map) = &mut doc
        && let Some(section) = map.remove(endpoint.bundle_key())
    {
        return section;
    }
    doc
}

impl Source for FileSource {
    fn display_name(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            filters_server_side: false,
        }
    }

    fn fetch(&self, endpoint: Endpoint, _query: &[(&'static str, String)]) -> Result<Value, SourceError> {
        let content = self.read()?;
        let doc: Value = serde_json::from_str(&content).map_err(|source| SourceError::Json {
            origin: self.display_name(),
            source,
        })?;
        tracing::debug!(source = %self.display_name(), bytes = content.len(), "read export");
        Ok(select_payload(doc, endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn reads_bare_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"user_id":"u1"}}]"#).unwrap();
        let source = FileSource::new(file.path().to_path_buf());
        let payload = source.fetch(Endpoint::InteractionLogs, &[]).unwrap();
        assert_eq!(payload, json!([{ "user_id": "u1" }]));
    }

    #[test]
    fn selects_bundle_section() {
        let doc = json!({
            "interaction_logs": [{ "user_id": "u1" }],
            "view_logs": [{ "user": "u2" }]
        });
        assert_eq!(
            select_payload(doc.clone(), Endpoint::ViewLogs),
            json!([{ "user": "u2" }])
        );
        assert_eq!(
            select_payload(doc, Endpoint::InteractionLogs),
            json!([{ "user_id": "u1" }])
        );
    }

    #[test]
    fn matrix_document_is_not_mistaken_for_bundle() {
        let doc = json!({ "users": [], "videos": [], "matrix": {} });
        assert_eq!(select_payload(doc.clone(), Endpoint::WatchMatrix), doc);
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = FileSource::new(PathBuf::from("/definitely/not/here.json"));
        let err = source.fetch(Endpoint::ViewLogs, &[]).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let source = FileSource::new(file.path().to_path_buf());
        let err = source.fetch(Endpoint::ViewLogs, &[]).unwrap_err();
        assert!(matches!(err, SourceError::Json { .. }));
    }
}
