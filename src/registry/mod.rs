//! # Integration Registry
//!
//! The registry holds, per integration id, whether the integration is enabled,
//! fully configured, and its last known connectivity status plus credentials.
//! It is owned outside this crate (admin UI, credential store); the execution
//! layer only reads it and writes status transitions back.
//!
//! ## Architecture
//!
//! ```text
//! Registry
//! ├── IntegrationRegistry          (trait: read records, write status)
//! ├── InMemoryIntegrationRegistry  (concurrent map implementation)
//! └── readiness                    (gate + side-effect-free UI queries)
//! ```

pub mod in_memory;
pub mod readiness;

use crate::constants::{IntegrationEnvironment, IntegrationStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use in_memory::InMemoryIntegrationRegistry;
pub use readiness::{
    check_readiness, integration_status, readiness_of, is_feature_available, is_integration_ready,
    FeatureAvailability, IntegrationAvailability, Readiness,
};

/// Snapshot of one integration's registry state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationRecord {
    pub id: String,
    pub is_enabled: bool,
    pub is_configured: bool,
    pub status: IntegrationStatus,
    pub last_error: Option<String>,
    pub environment: IntegrationEnvironment,
    #[serde(default, skip_serializing)]
    pub credentials: HashMap<String, String>,
}

impl IntegrationRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_enabled: false,
            is_configured: false,
            status: IntegrationStatus::NotConfigured,
            last_error: None,
            environment: IntegrationEnvironment::default(),
            credentials: HashMap::new(),
        }
    }

    /// An enabled, configured, connected record
    pub fn connected(id: impl Into<String>) -> Self {
        Self {
            is_enabled: true,
            is_configured: true,
            status: IntegrationStatus::Connected,
            ..Self::new(id)
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.is_enabled = enabled;
        self
    }

    pub fn with_configured(mut self, configured: bool) -> Self {
        self.is_configured = configured;
        self
    }

    pub fn with_status(mut self, status: IntegrationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_environment(mut self, environment: IntegrationEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_credential(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.insert(key.into(), value.into());
        self
    }
}

/// Read/write contract between the execution layer and the integration registry.
///
/// Implementations must tolerate concurrent readers and writers; status writes
/// follow last-writer-wins semantics.
pub trait IntegrationRegistry: Send + Sync {
    /// Current record for `id`, if the integration exists
    fn get_integration(&self, id: &str) -> Option<IntegrationRecord>;

    /// A single credential value for `id`
    fn credential_value(&self, id: &str, key: &str) -> Option<String>;

    /// Replace the connectivity status of `id`
    fn update_status(&self, id: &str, status: IntegrationStatus, error_message: Option<&str>);
}
