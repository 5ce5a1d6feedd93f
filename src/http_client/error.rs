//! Transport error type.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the transport and the record service.
///
/// Every variant except [`ApiError::Text`] and [`ApiError::Unknown`] carries
/// its own message; HTTP failures may additionally carry the backend's JSON
/// error body, whose `message` field takes precedence when shown to users.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Http failure response for {url}: {status}")]
    Status {
        status: StatusCode,
        url: String,
        body: Option<Value>,
    },
    #[error("Http failure during request to {url}: {reason}")]
    Connection { url: String, reason: String },
    #[error("Request to {url} timed out after {}ms", .after.as_millis())]
    Timeout { url: String, after: Duration },
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("Invalid request: {0}")]
    Validation(String),
    /// A bare text error, shown as-is.
    #[error("{0}")]
    Text(String),
    /// A failure that carries no message at all.
    #[error("unknown error")]
    Unknown,
}

impl ApiError {
    /// Build a status error, keeping the body only if it is JSON.
    pub fn from_status(status: StatusCode, url: &str, body: &[u8]) -> Self {
        ApiError::Status {
            status,
            url: url.to_string(),
            body: serde_json::from_slice(body).ok(),
        }
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
                after: timeout,
            }
        } else if err.is_decode() {
            ApiError::Decode {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            ApiError::Connection {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// The `message` field of the backend error body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// The error's own message, for variants that have one.
    pub fn own_message(&self) -> Option<String> {
        match self {
            ApiError::Text(_) | ApiError::Unknown => None,
            other => Some(other.to_string()),
        }
    }

    /// The error itself when it is plain text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiError::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
