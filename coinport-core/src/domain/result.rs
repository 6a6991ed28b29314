//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown for any transport-level failure (refused connection, DNS, timeout)
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Unable to connect to the server. Please check if the backend is running.";

/// Core library error type
///
/// Display strings are user-facing: the CLI prints them as-is.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP response. The payload keeps the
    /// transport detail for logs; the display message stays generic.
    #[error("Network error: Unable to connect to the server. Please check if the backend is running.")]
    Network(String),

    /// Non-2xx response. `message` is the body's `message` field when the
    /// body was JSON, otherwise `HTTP error! status: <code>`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not signed in: {0}")]
    Unauthenticated(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an API status error
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error came from the transport rather than the server
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for `--json` output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Attach a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_operation_result_fail_with_context() {
        let result: OperationResult<i32> =
            OperationResult::fail("HTTP 502: Bad Gateway").with_context("status", 502.into());
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.context.unwrap()["status"], 502);
    }

    #[test]
    fn test_from_result() {
        let err: Result<i32> = Err(Error::validation("Please fill in all fields"));
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Please fill in all fields"));
    }

    #[test]
    fn test_network_error_hides_transport_detail() {
        let err = Error::Network("tcp connect error: Connection refused".into());
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert!(err.is_network());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_error_displays_server_message() {
        let err = Error::api(422, "The email has already been taken.");
        assert_eq!(err.to_string(), "The email has already been taken.");
        assert_eq!(err.status(), Some(422));
    }
}
