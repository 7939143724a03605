//! # Central API Execution Layer
//!
//! Every outbound call to an external integration (payments, KYC, OAuth,
//! storage, SMS, AI inference) goes through an [`ApiExecutor`]. The executor
//! gates calls on registry readiness, races each attempt against a deadline,
//! retries with exponential backoff, records every attempt in its
//! [`CallLedger`] and reconciles the registry's connectivity status.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use integration_core::executor::{ApiExecutor, ExecutionOptions};
//! use integration_core::registry::{InMemoryIntegrationRegistry, IntegrationRecord};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(InMemoryIntegrationRegistry::new());
//! registry.upsert(IntegrationRecord::connected("paystack"));
//!
//! let executor = ApiExecutor::new(registry)?;
//! let result = executor
//!     .execute_fetch::<serde_json::Value>(
//!         "paystack",
//!         "https://api.paystack.co/bank",
//!         Default::default(),
//!         ExecutionOptions::new().with_timeout(Duration::from_secs(10)),
//!     )
//!     .await;
//!
//! match result.into_result() {
//!     Ok(banks) => println!("banks: {banks}"),
//!     Err(err) => println!("paystack unavailable: {err}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod fetch;
pub mod gated;
pub mod health;
mod orchestrator;
pub mod types;

use crate::config::{ConfigManager, ExecutionDefaults, GatewayConfig};
use crate::error::Result;
use crate::ledger::{ApiStats, CallLedger, CallLogEntry};
use crate::registry::{self, FeatureAvailability, IntegrationAvailability, IntegrationRegistry};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

pub use fetch::FetchRequest;
pub use gated::{GatedFunction, GatedOutcome};
pub use health::{HealthCheckResult, HealthProbe, HttpHealthProbe, NoopProbe};
pub use types::{backoff_delay, ExecutionOptions, ExecutionResult};

/// Single chokepoint for outbound integration calls.
///
/// Cloning is cheap; clones share the ledger, registry and probes.
#[derive(Clone)]
pub struct ApiExecutor {
    registry: Arc<dyn IntegrationRegistry>,
    ledger: Arc<CallLedger>,
    defaults: ExecutionDefaults,
    http: reqwest::Client,
    probes: Arc<DashMap<String, Arc<dyn HealthProbe>>>,
}

impl std::fmt::Debug for ApiExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiExecutor")
            .field("defaults", &self.defaults)
            .field("ledger_len", &self.ledger.len())
            .field("ledger_capacity", &self.ledger.capacity())
            .field("probes", &self.probes.len())
            .finish()
    }
}

/// Builder for [`ApiExecutor`]
pub struct ApiExecutorBuilder {
    registry: Arc<dyn IntegrationRegistry>,
    defaults: ExecutionDefaults,
    ledger_capacity: usize,
    http: Option<reqwest::Client>,
}

impl ApiExecutorBuilder {
    pub fn defaults(mut self, defaults: ExecutionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn ledger_capacity(mut self, capacity: usize) -> Self {
        self.ledger_capacity = capacity;
        self
    }

    /// Use a preconfigured HTTP client for fetch-style calls
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn build(self) -> Result<ApiExecutor> {
        let http = match self.http {
            Some(client) => client,
            None => reqwest::Client::builder().build()?,
        };

        info!(
            timeout_ms = self.defaults.timeout_ms,
            max_retries = self.defaults.max_retries,
            retry_delay_ms = self.defaults.retry_delay_ms,
            ledger_capacity = self.ledger_capacity,
            "🛡️ API executor initialized"
        );

        Ok(ApiExecutor {
            registry: self.registry,
            ledger: Arc::new(CallLedger::with_capacity(self.ledger_capacity)),
            defaults: self.defaults,
            http,
            probes: Arc::new(DashMap::new()),
        })
    }
}

impl ApiExecutor {
    pub fn builder(registry: Arc<dyn IntegrationRegistry>) -> ApiExecutorBuilder {
        let defaults = GatewayConfig::default();
        ApiExecutorBuilder {
            registry,
            defaults: defaults.execution,
            ledger_capacity: defaults.ledger.capacity,
            http: None,
        }
    }

    /// Executor with default options and ledger capacity
    pub fn new(registry: Arc<dyn IntegrationRegistry>) -> Result<Self> {
        Self::builder(registry).build()
    }

    /// Executor using the execution defaults and ledger capacity of a loaded configuration
    pub fn from_config(
        manager: &ConfigManager,
        registry: Arc<dyn IntegrationRegistry>,
    ) -> Result<Self> {
        let config = manager.config();
        Self::builder(registry)
            .defaults(config.execution.clone())
            .ledger_capacity(config.ledger.capacity)
            .build()
    }

    pub fn registry(&self) -> &Arc<dyn IntegrationRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<CallLedger> {
        &self.ledger
    }

    pub fn defaults(&self) -> &ExecutionDefaults {
        &self.defaults
    }

    pub fn is_integration_ready(&self, integration_id: &str) -> bool {
        registry::is_integration_ready(self.registry.as_ref(), integration_id)
    }

    pub fn integration_status(&self, integration_id: &str) -> IntegrationAvailability {
        registry::integration_status(self.registry.as_ref(), integration_id)
    }

    pub fn is_feature_available(&self, integration_id: &str) -> FeatureAvailability {
        registry::is_feature_available(self.registry.as_ref(), integration_id)
    }

    /// Ledger entries, newest first, optionally for one integration
    pub fn api_call_logs(&self, integration_id: Option<&str>) -> Vec<CallLogEntry> {
        self.ledger.entries(integration_id)
    }

    pub fn api_stats(&self) -> ApiStats {
        self.ledger.stats()
    }
}
