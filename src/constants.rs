//! # System Constants
//!
//! Core constants and enums that define the operational vocabulary of the
//! integration execution layer: connectivity states, call lifecycle states,
//! well-known integration identifiers and the user-facing readiness messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Well-known integration identifiers used across the marketplace
pub mod integrations {
    // Payments
    pub const PAYSTACK: &str = "paystack";
    pub const FLUTTERWAVE: &str = "flutterwave";

    // Identity verification
    pub const VERIFF: &str = "veriff";
    pub const FACIAL_RECOGNITION: &str = "facial_recognition";

    // OAuth identity providers
    pub const GOOGLE_OAUTH: &str = "google_oauth";

    // Object storage
    pub const GOOGLE_CLOUD_STORAGE: &str = "google_cloud_storage";

    // SMS / OTP
    pub const TERMII: &str = "termii";

    // AI inference
    pub const OPENAI: &str = "openai";
}

/// User-facing readiness messages.
///
/// UI layers branch on these strings to decide between "ask an admin to set this up"
/// and "try again later", so they must stay stable.
pub mod messages {
    pub const NOT_CONFIGURED: &str = "Integration is not configured";
    pub const DISABLED: &str = "Integration is disabled";
    pub const READY: &str = "Integration is ready";

    /// Message for an integration that is set up but whose last known status is not `connected`
    pub fn not_connected(status: super::IntegrationStatus) -> String {
        format!("Integration is not connected (status: {status})")
    }
}

/// Display text of an attempt that lost the race against its deadline
pub const TIMEOUT_SENTINEL: &str = "Request timeout";

/// Default number of entries retained by the call ledger
pub const DEFAULT_LEDGER_CAPACITY: usize = 1000;

/// Default per-attempt deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Last known connectivity state of an integration, owned by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    #[default]
    NotConfigured,
    Disconnected,
    Connected,
    Error,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationStatus::NotConfigured => "not_configured",
            IntegrationStatus::Disconnected => "disconnected",
            IntegrationStatus::Connected => "connected",
            IntegrationStatus::Error => "error",
        }
    }
}

impl fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lifecycle status recorded on a call ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Pending,
    Success,
    Error,
    Timeout,
    Retry,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Pending => "pending",
            CallStatus::Success => "success",
            CallStatus::Error => "error",
            CallStatus::Timeout => "timeout",
            CallStatus::Retry => "retry",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Credential environment an integration is pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationEnvironment {
    #[default]
    Sandbox,
    Live,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization_matches_registry_format() {
        let json = serde_json::to_string(&IntegrationStatus::NotConfigured).unwrap();
        assert_eq!(json, "\"not_configured\"");

        let parsed: IntegrationStatus = serde_json::from_str("\"connected\"").unwrap();
        assert_eq!(parsed, IntegrationStatus::Connected);
    }

    #[test]
    fn test_call_status_display() {
        assert_eq!(CallStatus::Retry.to_string(), "retry");
        assert_eq!(CallStatus::Timeout.to_string(), "timeout");
    }

    #[test]
    fn test_not_connected_message_names_status() {
        assert_eq!(
            messages::not_connected(IntegrationStatus::Error),
            "Integration is not connected (status: error)"
        );
    }
}
