//! # Structured Logging Module
//!
//! Environment-aware structured logging for the execution layer. Console output
//! by default, JSON lines when `GATEWAY_LOG_FORMAT=json`.

use crate::config::loader::detect_environment;
use crate::constants::{CallStatus, IntegrationStatus};
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let filter = std::env::var("RUST_LOG")
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var("GATEWAY_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        // A host application may already own the global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            json = json,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log one recorded call outcome
pub fn log_api_call(
    integration_id: &str,
    endpoint: &str,
    method: &str,
    status: CallStatus,
    duration: Duration,
    retry_count: u32,
    error: Option<&str>,
) {
    match status {
        CallStatus::Success => tracing::info!(
            integration_id = %integration_id,
            endpoint = %endpoint,
            method = %method,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            retry_count = retry_count,
            "🟢 API_CALL"
        ),
        CallStatus::Retry | CallStatus::Pending => tracing::warn!(
            integration_id = %integration_id,
            endpoint = %endpoint,
            method = %method,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            retry_count = retry_count,
            error = error,
            "🟡 API_CALL"
        ),
        CallStatus::Error | CallStatus::Timeout => tracing::error!(
            integration_id = %integration_id,
            endpoint = %endpoint,
            method = %method,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            retry_count = retry_count,
            error = error,
            "🔴 API_CALL"
        ),
    }
}

/// Log a registry status write-back
pub fn log_status_transition(integration_id: &str, status: IntegrationStatus, error: Option<&str>) {
    tracing::info!(
        integration_id = %integration_id,
        status = %status,
        error = error,
        "📚 INTEGRATION_STATUS"
    );
}
