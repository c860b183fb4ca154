//! Storefront API Errors

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the storefront server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("{path} failed with status {status}")]
    Status {
        path: String,
        status: u16,
        detail: Value,
    },
}

/// Extract the message a server error body carries, if any.
///
/// Error bodies are `{"detail": "..."}`, `{"field": ["..."]}`, a bare string,
/// or a list of strings.
pub fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(values) => values.iter().find_map(detail_message),
        Value::Object(fields) => fields
            .get("detail")
            .or_else(|| fields.get("error"))
            .or_else(|| fields.get("non_field_errors"))
            .and_then(detail_message)
            .or_else(|| fields.values().find_map(detail_message)),
        _ => None,
    }
}
