#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! # Integration Core
//!
//! Central execution layer for a multi-vendor marketplace's external integrations.
//!
//! ## Overview
//!
//! Every call to an external dependency (payment gateway, KYC/biometric verification,
//! OAuth identity provider, object storage, SMS/OTP gateway, AI inference) passes
//! through one chokepoint. That chokepoint reasons about partial failure, retries,
//! per-attempt deadlines and the operational state of each integration, and hands
//! callers a uniform, typed result no matter which integration they invoked.
//!
//! ## Module Organization
//!
//! - [`registry`] - Integration registry contract, in-memory implementation, readiness gate
//! - [`executor`] - Retry/timeout orchestrator, fetch wrapper, gated functions, health checks
//! - [`ledger`] - Bounded call ledger and statistics
//! - [`config`] - YAML + environment configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//! - [`constants`] - Status enums, integration ids, user-facing messages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integration_core::executor::{ApiExecutor, ExecutionOptions};
//! use integration_core::registry::{InMemoryIntegrationRegistry, IntegrationRecord};
//! use integration_core::CallError;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(InMemoryIntegrationRegistry::new());
//! registry.upsert(IntegrationRecord::connected("termii"));
//!
//! let executor = ApiExecutor::new(registry)?;
//! let result = executor
//!     .execute_api(
//!         "termii",
//!         "send otp",
//!         || async { Ok::<_, CallError>("queued") },
//!         ExecutionOptions::new().with_max_retries(2),
//!     )
//!     .await;
//!
//! if let Some(error) = result.error() {
//!     println!("OTP not sent: {}", error.message);
//! }
//! println!("{:?}", executor.api_stats());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod logging;
pub mod registry;

pub use config::{ConfigManager, ExecutionDefaults, GatewayConfig, IntegrationSeed, LedgerConfig};
pub use constants::{integrations, messages, CallStatus, IntegrationEnvironment, IntegrationStatus};
pub use error::{CallError, ExecutionError, IntegrationError, Result};
pub use executor::{
    ApiExecutor, ExecutionOptions, ExecutionResult, FetchRequest, GatedFunction, GatedOutcome,
    HealthCheckResult, HealthProbe, HttpHealthProbe,
};
pub use ledger::{ApiStats, CallLedger, CallLogEntry, IntegrationStats};
pub use registry::{
    FeatureAvailability, InMemoryIntegrationRegistry, IntegrationAvailability, IntegrationRecord,
    IntegrationRegistry, Readiness,
};
