//! Best-effort logging of response bodies.
//!
//! Logging only observes a response; it never fails and never changes what
//! the caller receives.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::ApiResponse;

/// How a response body was interpreted for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// JSON object or array, logged pretty-printed.
    JsonDocument,
    /// Valid JSON that is neither an object nor an array.
    JsonScalar,
    /// Not JSON, logged as raw text.
    Text,
    Empty,
}

/// Classify a response body.
pub fn classify_body(body: &str) -> BodyFormat {
    if body.trim().is_empty() {
        return BodyFormat::Empty;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(_)) | Ok(Value::Array(_)) => BodyFormat::JsonDocument,
        Ok(_) => BodyFormat::JsonScalar,
        Err(_) => BodyFormat::Text,
    }
}

/// Log the status of `response` and, when `log_body` is set, its body.
///
/// Bodies are logged at `info` so they show under the default filter.
pub fn log_response(endpoint: &str, response: &ApiResponse, log_body: bool) -> BodyFormat {
    let format = classify_body(&response.body);
    info!(
        endpoint,
        status = response.status.as_u16(),
        body_format = ?format,
        "Response status code = {}",
        response.status.as_u16()
    );

    if !log_body {
        return format;
    }

    match format {
        BodyFormat::JsonDocument => {
            let pretty = serde_json::from_str::<Value>(&response.body)
                .and_then(|v| serde_json::to_string_pretty(&v))
                .unwrap_or_else(|_| response.body.clone());
            info!(endpoint, "{}", pretty);
        }
        BodyFormat::JsonScalar => {
            warn!(endpoint, "Invalid JSON format in the response: {}", response.body);
        }
        BodyFormat::Text => {
            info!(endpoint, "Response content is not valid JSON: {}", response.body);
        }
        BodyFormat::Empty => {}
    }
    format
}

/// Log an outgoing JSON payload.
pub fn log_payload(endpoint: &str, payload: &Value) {
    match serde_json::to_string_pretty(payload) {
        Ok(pretty) => debug!(endpoint, "Request payload:\n{}", pretty),
        Err(e) => warn!(endpoint, "Could not render request payload: {}", e),
    }
}
