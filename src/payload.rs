//! JSON request payloads loaded from disk.
//!
//! Payloads are passed to the service verbatim. The only inspection done is
//! pulling out a name needed to build a delete request.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} as JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Payload has no string field at {0}")]
    MissingField(&'static str),
}

/// Read `path` and parse it as a JSON document.
pub async fn load_json(path: impl AsRef<Path>) -> Result<Value, PayloadError> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PayloadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&contents).map_err(|source| PayloadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `experiment_name` of the first entry of an experiment array.
pub fn experiment_name(payload: &Value) -> Result<&str, PayloadError> {
    payload
        .get(0)
        .and_then(|entry| entry.get("experiment_name"))
        .and_then(Value::as_str)
        .ok_or(PayloadError::MissingField("[0].experiment_name"))
}

/// `metadata.name` of a metric profile document.
pub fn metric_profile_name(payload: &Value) -> Result<&str, PayloadError> {
    payload
        .get("metadata")
        .and_then(|metadata| metadata.get("name"))
        .and_then(Value::as_str)
        .ok_or(PayloadError::MissingField("metadata.name"))
}
