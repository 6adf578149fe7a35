//! Client error types
//!
//! Every failure a caller can see goes through [`ClientError`]. Its `Display`
//! output is the message shown to the user, nothing more.

use reqwest::StatusCode;
use serde_json::Value;
use splitalgo_core::ValidationError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or transport failure; no response was received
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response whose body did not decode
    #[error("Unexpected response from server: {0}")]
    Decode(#[source] serde_json::Error),

    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Form input rejected before any request was made
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The stored token cannot be sent as a header value
    #[error("Stored session token is not a valid header value")]
    InvalidToken,

    /// A path identifier that would not stay a single segment
    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Build an API error from a failed response
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        Self::Api {
            status: status.as_u16(),
            message: error_message(status, body),
        }
    }

    /// HTTP status, for errors that carry one
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend rejected the session token
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Extract a human-readable message from an error response body
///
/// JSON bodies yield `detail`, then `message`, then `HTTP Error: <status>`.
/// A `detail` that is not a string (validation error lists) is rendered as
/// JSON text. Bodies that are not JSON yield the status text.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    let fallback = || format!("HTTP Error: {}", status.as_u16());

    let Ok(parsed) = serde_json::from_slice::<Value>(body) else {
        return status
            .canonical_reason()
            .map_or_else(fallback, str::to_string);
    };

    if let Some(detail) = parsed.get("detail").and_then(non_empty) {
        return detail;
    }
    if let Some(message) = parsed.get("message").and_then(non_empty) {
        return message;
    }
    fallback()
}

fn non_empty(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
