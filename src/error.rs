//! Error types for ats-harvest
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde_json::Value;
use thiserror::Error;

/// The main error type for ats-harvest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing credential: environment variable {variable} is not set")]
    MissingCredential { variable: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to extract records from path '{path}': {message}")]
    RecordExtraction { path: String, message: String },

    // ============================================================================
    // Harvest Errors
    // ============================================================================
    #[error("Harvest of '{resource}' incomplete after {} records: {source}", .records.len())]
    IncompleteHarvest {
        resource: String,
        records: Vec<Value>,
        source: Box<Error>,
    },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of a failure, used in harvest reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection failure or timeout
    Transport,
    /// Non-2xx response
    HttpStatus,
    /// Body could not be parsed or did not have the expected shape
    Decode,
    /// Anything else (auth, templates, configuration)
    Other,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing credential error
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a record extraction error
    pub fn record_extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordExtraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap a harvest failure together with the records accumulated before it
    pub fn incomplete_harvest(
        resource: impl Into<String>,
        records: Vec<Value>,
        source: Error,
    ) -> Self {
        Self::IncompleteHarvest {
            resource: resource.into(),
            records,
            source: Box::new(source),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Transport(e) if e.is_decode() => FailureKind::Decode,
            Error::Transport(_) | Error::Timeout { .. } => FailureKind::Transport,
            Error::HttpStatus { .. } => FailureKind::HttpStatus,
            Error::Decode { .. } | Error::RecordExtraction { .. } | Error::JsonParse(_) => {
                FailureKind::Decode
            }
            Error::IncompleteHarvest { source, .. } => source.kind(),
            _ => FailureKind::Other,
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::IncompleteHarvest { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for ats-harvest
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_credential("GUPY_API_KEY");
        assert_eq!(
            err.to_string(),
            "Missing credential: environment variable GUPY_API_KEY is not set"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_incomplete_harvest_display() {
        let err = Error::incomplete_harvest(
            "jobs",
            vec![json!({"id": 1}), json!({"id": 2})],
            Error::http_status(500, "boom"),
        );
        assert_eq!(
            err.to_string(),
            "Harvest of 'jobs' incomplete after 2 records: HTTP 500: boom"
        );
        assert_eq!(err.kind(), FailureKind::HttpStatus);
        assert_eq!(err.status(), Some(500));
    }

    #[test_case(429, true ; "too many requests")]
    #[test_case(500, true ; "internal error")]
    #[test_case(503, true ; "unavailable")]
    #[test_case(400, false ; "bad request")]
    #[test_case(401, false ; "unauthorized")]
    #[test_case(404, false ; "not found")]
    fn test_status_is_retryable(status: u16, expected: bool) {
        assert_eq!(Error::http_status(status, "").is_retryable(), expected);
    }

    #[test]
    fn test_is_retryable_other_kinds() {
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::decode("bad body").is_retryable());
    }

    #[test]
    fn test_kind() {
        assert_eq!(
            Error::Timeout { timeout_ms: 10 }.kind(),
            FailureKind::Transport
        );
        assert_eq!(Error::http_status(500, "").kind(), FailureKind::HttpStatus);
        assert_eq!(Error::decode("x").kind(), FailureKind::Decode);
        assert_eq!(
            Error::record_extraction("items", "missing").kind(),
            FailureKind::Decode
        );
        assert_eq!(Error::auth("denied").kind(), FailureKind::Other);
    }
}
