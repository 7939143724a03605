//! # Integration Gateway Configuration
//!
//! YAML-based configuration for the execution layer: per-call defaults, ledger
//! sizing and the integrations an in-memory registry is seeded with.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use integration_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load_from_file("config/gateway.yaml")?;
//!
//! let timeout = manager.config().execution.timeout();
//! let capacity = manager.config().ledger.capacity;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::{
    IntegrationEnvironment, IntegrationStatus, DEFAULT_LEDGER_CAPACITY, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::warn;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Worst-case cumulative backoff above which validation logs a warning
const BACKOFF_WARNING_THRESHOLD: Duration = Duration::from_secs(3600);

/// Root configuration structure mirroring gateway.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Per-call execution defaults
    pub execution: ExecutionDefaults,

    /// Call ledger sizing
    pub ledger: LedgerConfig,

    /// Integrations to seed an in-memory registry with
    pub integrations: Vec<IntegrationSeed>,
}

/// Default execution options applied when a caller does not override them
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionDefaults {
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for ExecutionDefaults {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
        }
    }
}

impl ExecutionDefaults {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Sum of every backoff sleep a call can incur when all attempts fail
    pub fn worst_case_backoff(&self) -> Duration {
        let total_ms = (0..self.max_retries).fold(0u64, |acc, attempt| {
            let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
            acc.saturating_add(self.retry_delay_ms.saturating_mul(factor))
        });
        Duration::from_millis(total_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LEDGER_CAPACITY,
        }
    }
}

/// Initial registry state for one integration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntegrationSeed {
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub configured: bool,
    #[serde(default)]
    pub status: IntegrationStatus,
    #[serde(default)]
    pub environment: IntegrationEnvironment,
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

impl GatewayConfig {
    /// Validate configuration values, rejecting settings the executor cannot honour
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.execution.timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "execution.timeout_ms",
                "0",
                "timeout must be greater than 0",
            ));
        }

        if self.ledger.capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "ledger.capacity",
                "0",
                "ledger capacity must be greater than 0",
            ));
        }

        let mut seen = HashSet::new();
        for seed in &self.integrations {
            if seed.id.trim().is_empty() {
                return Err(ConfigurationError::ValidationError(
                    "integration id must not be empty".to_string(),
                ));
            }
            if !seen.insert(seed.id.as_str()) {
                return Err(ConfigurationError::ValidationError(format!(
                    "duplicate integration id '{}'",
                    seed.id
                )));
            }
        }

        let worst_case = self.execution.worst_case_backoff();
        if worst_case > BACKOFF_WARNING_THRESHOLD {
            warn!(
                max_retries = self.execution.max_retries,
                retry_delay_ms = self.execution.retry_delay_ms,
                worst_case_backoff_secs = worst_case.as_secs(),
                "⚠️ Backoff is uncapped; failing calls may sleep for a very long time"
            );
        }

        Ok(())
    }
}
