//! Error types for the Star Gallery client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde_json::Value;
use thiserror::Error;

/// The main error type for the Star Gallery client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// No response was received (connect failure, reset, timeout)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Http { status: u16, detail: Option<String> },

    #[error("Not found: {}", .detail.as_deref().unwrap_or("resource does not exist"))]
    NotFound { detail: Option<String> },

    /// Backend (400/422) or local precondition failure. `status` is `None`
    /// when the request was never sent.
    #[error("Validation failed: {detail}")]
    Validation { status: Option<u16>, detail: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a local validation error (request not sent)
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            status: None,
            detail: detail.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify a non-2xx response from its status and raw body
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        match status {
            404 => Self::NotFound { detail },
            400 | 422 => Self::Validation {
                status: Some(status),
                detail: detail.unwrap_or_else(|| format!("request rejected with status {status}")),
            },
            _ => Self::Http { status, detail },
        }
    }

    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            Error::Validation { status, .. } => *status,
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Backend-supplied `detail` message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::Http { detail, .. } | Error::NotFound { detail } => detail.as_deref(),
            Error::Validation { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Check if this is a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is a validation failure (local or remote)
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Check if no response was received at all
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Message suitable for a user-facing notice
    ///
    /// The backend `detail` is used verbatim when present.
    pub fn user_message(&self) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_string();
        }
        match self {
            Error::Network(_) => "Cannot reach the backend server".to_string(),
            Error::Http { status, .. } => format!("Request failed with status {status}"),
            Error::NotFound { .. } => "The requested resource does not exist".to_string(),
            other => other.to_string(),
        }
    }
}

/// Pull the `detail` field out of an error body
///
/// Accepts a plain string detail or a list of `{loc, msg}` objects, which
/// are joined with `"; "`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let loc = item
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .map(|field| match field {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        });
                    Some(match loc {
                        Some(field) => format!("{field}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Result type alias for the Star Gallery client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
