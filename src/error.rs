//! Error types for the integration execution layer.
//!
//! Three layers of error exist here:
//!
//! - [`IntegrationError`]: crate-level failures (configuration, client construction)
//! - [`CallError`]: why a single attempt of a unit of work failed
//! - [`ExecutionError`]: the structured error handed back to callers inside an
//!   [`ExecutionResult`](crate::executor::ExecutionResult)

use crate::config::ConfigurationError;
use crate::constants::TIMEOUT_SENTINEL;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Unknown integration: {0}")]
    UnknownIntegration(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, IntegrationError>;

/// Failure of one attempt of a unit of work
#[derive(Debug, Error)]
pub enum CallError {
    /// The attempt did not settle before its deadline
    #[error("Request timeout")]
    Timeout { after: Duration },

    /// The remote answered with a non-2xx status
    #[error("HTTP {status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The unit of work panicked instead of returning
    #[error("Unit of work panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CallError {
    /// Build a failure from a plain message
    pub fn message(message: impl Into<String>) -> Self {
        CallError::Other(anyhow::anyhow!(message.into()))
    }

    /// Whether this failure counts as a timeout for ledger classification
    pub fn is_timeout(&self) -> bool {
        match self {
            CallError::Timeout { .. } => true,
            CallError::Transport(err) => err.is_timeout(),
            // units of work may report their own deadline with the sentinel text
            CallError::Other(err) => err.to_string() == TIMEOUT_SENTINEL,
            _ => false,
        }
    }

    /// Transport-level status code carried by this failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CallError::HttpStatus { status, .. } => Some(*status),
            CallError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<String> for CallError {
    fn from(message: String) -> Self {
        CallError::message(message)
    }
}

impl From<&str> for CallError {
    fn from(message: &str) -> Self {
        CallError::message(message)
    }
}

/// Structured error returned to every caller of the execution layer
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
    pub integration_id: String,
    pub status_code: Option<u16>,
    /// Always `false` today: retries are exhausted before an error surfaces
    pub is_retryable: bool,
    #[source]
    pub cause: Option<Arc<CallError>>,
}

impl ExecutionError {
    /// Error for a call rejected by the readiness gate, before any attempt
    pub fn not_ready(integration_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            integration_id: integration_id.into(),
            status_code: None,
            is_retryable: false,
            cause: None,
        }
    }

    /// Error wrapping the last attempt's failure once retries are exhausted
    pub fn exhausted(integration_id: impl Into<String>, cause: CallError) -> Self {
        Self {
            message: cause.to_string(),
            integration_id: integration_id.into(),
            status_code: cause.status_code(),
            is_retryable: false,
            cause: Some(Arc::new(cause)),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.cause.as_deref().is_some_and(CallError::is_timeout) || self.message == TIMEOUT_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_timeout_displays_sentinel() {
        let err = CallError::Timeout {
            after: Duration::from_millis(50),
        };
        assert_eq!(err.to_string(), TIMEOUT_SENTINEL);
        assert!(err.is_timeout());

        assert!(CallError::from("Request timeout").is_timeout());
        assert!(!CallError::from("Request timeout exceeded quota").is_timeout());
    }

    #[test]
    fn test_http_status_carries_code() {
        let err = CallError::HttpStatus {
            status: 502,
            status_text: "Bad Gateway".to_string(),
        };
        assert_eq!(err.status_code(), Some(502));
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_exhausted_error_wraps_cause() {
        let err = ExecutionError::exhausted(
            "paystack",
            CallError::HttpStatus {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            },
        );
        assert_eq!(err.integration_id, "paystack");
        assert_eq!(err.status_code, Some(500));
        assert!(!err.is_retryable);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_not_ready_error_has_no_cause() {
        let err = ExecutionError::not_ready("veriff", "Integration is disabled");
        assert_eq!(err.to_string(), "Integration is disabled");
        assert!(err.cause.is_none());
        assert!(!err.is_timeout());
    }
}
