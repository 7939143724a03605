//! # Integration Health Checks
//!
//! Best-effort liveness probes. A probe runs only when the integration passes
//! the readiness gate, is bounded by the executor's default timeout, and never
//! writes to the ledger or the registry.

use super::ApiExecutor;
use crate::error::CallError;
use crate::registry::check_readiness;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Outcome of a health check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

impl HealthCheckResult {
    fn unhealthy(error: impl Into<String>, latency: Option<Duration>) -> Self {
        Self {
            healthy: false,
            latency_ms: latency.map(|l| l.as_millis() as u64),
            error: Some(error.into()),
        }
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency_ms.map(Duration::from_millis)
    }
}

/// Integration-specific lightweight operation used as a liveness signal
#[async_trait]
pub trait HealthProbe: Send + Sync + fmt::Debug {
    async fn probe(&self, integration_id: &str) -> Result<(), CallError>;
}

/// Probe used when none is registered: succeeds immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProbe;

#[async_trait]
impl HealthProbe for NoopProbe {
    async fn probe(&self, _integration_id: &str) -> Result<(), CallError> {
        Ok(())
    }
}

/// GETs a URL and treats any 2xx as healthy
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpHealthProbe {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self, _integration_id: &str) -> Result<(), CallError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CallError::HttpStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            })
        }
    }
}

impl ApiExecutor {
    /// Register the probe used by [`check_api_health`](Self::check_api_health) for one integration
    pub fn register_probe(&self, integration_id: &str, probe: Arc<dyn HealthProbe>) {
        self.probes.insert(integration_id.to_string(), probe);
    }

    /// Register an [`HttpHealthProbe`] sharing the executor's HTTP client
    pub fn register_http_probe(&self, integration_id: &str, url: &str) {
        self.register_probe(
            integration_id,
            Arc::new(HttpHealthProbe::new(self.http.clone(), url)),
        );
    }

    pub async fn check_api_health(&self, integration_id: &str) -> HealthCheckResult {
        let readiness = check_readiness(self.registry.as_ref(), integration_id);
        if !readiness.is_ready() {
            return HealthCheckResult::unhealthy(readiness.message(), None);
        }

        let probe: Arc<dyn HealthProbe> = self
            .probes
            .get(integration_id)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| Arc::new(NoopProbe) as Arc<dyn HealthProbe>);

        let timeout = self.defaults.timeout();
        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, probe.probe(integration_id)).await;
        let latency = started.elapsed();

        debug!(
            integration_id = %integration_id,
            latency_ms = latency.as_millis() as u64,
            "🩺 Health probe finished"
        );

        match outcome {
            Ok(Ok(())) => HealthCheckResult {
                healthy: true,
                latency_ms: Some(latency.as_millis() as u64),
                error: None,
            },
            Ok(Err(error)) => HealthCheckResult::unhealthy(error.to_string(), Some(latency)),
            Err(_) => HealthCheckResult::unhealthy(
                CallError::Timeout { after: timeout }.to_string(),
                Some(latency),
            ),
        }
    }
}
