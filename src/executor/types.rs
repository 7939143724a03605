//! Per-call options and the uniform result type returned to every caller.

use crate::config::ExecutionDefaults;
use crate::error::ExecutionError;
use std::collections::HashMap;
use std::time::Duration;

/// Per-call configuration. Unset fields fall back to the executor's defaults.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub user_id: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    /// Call even when the readiness gate would refuse, e.g. to probe an unconfirmed integration
    pub skip_status_check: bool,
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn skip_status_check(mut self) -> Self {
        self.skip_status_check = true;
        self
    }

    pub(crate) fn resolve(self, defaults: &ExecutionDefaults) -> ResolvedOptions {
        ResolvedOptions {
            timeout: self.timeout.unwrap_or_else(|| defaults.timeout()),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_delay: self.retry_delay.unwrap_or_else(|| defaults.retry_delay()),
            user_id: self.user_id,
            metadata: self.metadata,
            skip_status_check: self.skip_status_check,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedOptions {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub user_id: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub skip_status_check: bool,
}

impl ResolvedOptions {
    /// Sleep before retry number `retry_count + 1`: `retry_delay * 2^retry_count`, uncapped
    pub fn backoff(&self, retry_count: u32) -> Duration {
        backoff_delay(self.retry_delay, retry_count)
    }
}

/// Exponential backoff without jitter or ceiling
pub fn backoff_delay(base: Duration, retry_count: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(retry_count))
}

/// Outcome of one orchestrated call, identical in shape for every integration
#[derive(Debug, Clone)]
pub struct ExecutionResult<T> {
    /// Payload on success, structured error on failure
    pub outcome: Result<T, ExecutionError>,
    pub integration_id: String,
    /// Elapsed time since the call began, across every attempt and backoff
    pub duration: Duration,
    /// Retries actually performed
    pub retry_count: u32,
}

impl<T> ExecutionResult<T> {
    pub(crate) fn success(
        integration_id: impl Into<String>,
        data: T,
        duration: Duration,
        retry_count: u32,
    ) -> Self {
        Self {
            outcome: Ok(data),
            integration_id: integration_id.into(),
            duration,
            retry_count,
        }
    }

    pub(crate) fn failure(
        integration_id: impl Into<String>,
        error: ExecutionError,
        duration: Duration,
        retry_count: u32,
    ) -> Self {
        Self {
            outcome: Err(error),
            integration_id: integration_id.into(),
            duration,
            retry_count,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn data(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ExecutionError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<T, ExecutionError> {
        self.outcome
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExecutionResult<U> {
        ExecutionResult {
            outcome: self.outcome.map(f),
            integration_id: self.integration_id,
            duration: self.duration,
            retry_count: self.retry_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_resolve_against_defaults() {
        let defaults = ExecutionDefaults::default();
        let resolved = ExecutionOptions::new()
            .with_max_retries(1)
            .with_user_id("user-42")
            .resolve(&defaults);

        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert_eq!(resolved.max_retries, 1);
        assert_eq!(resolved.retry_delay, Duration::from_secs(1));
        assert_eq!(resolved.user_id.as_deref(), Some("user-42"));
        assert!(!resolved.skip_status_check);
    }

    #[test]
    fn test_backoff_doubles_without_cap() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 4), Duration::from_millis(1600));
        assert_eq!(backoff_delay(base, 20), Duration::from_millis(100 * (1 << 20)));
    }

    #[test]
    fn test_result_accessors() {
        let ok: ExecutionResult<u32> =
            ExecutionResult::success("paystack", 7, Duration::from_millis(5), 1);
        assert!(ok.is_success());
        assert_eq!(ok.data(), Some(&7));
        assert!(ok.error().is_none());
        assert_eq!(ok.map(|n| n * 2).into_result().unwrap(), 14);

        let err: ExecutionResult<u32> = ExecutionResult::failure(
            "paystack",
            ExecutionError::not_ready("paystack", "Integration is disabled"),
            Duration::ZERO,
            0,
        );
        assert!(!err.is_success());
        assert!(err.data().is_none());
        assert_eq!(err.error().unwrap().message, "Integration is disabled");
    }
}
