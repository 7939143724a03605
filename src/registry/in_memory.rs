//! # In-Memory Integration Registry
//!
//! `DashMap`-backed registry used by tests, the config validator and
//! deployments that configure integrations from YAML instead of a database.

use super::{IntegrationRecord, IntegrationRegistry};
use crate::config::{GatewayConfig, IntegrationSeed};
use crate::constants::IntegrationStatus;
use crate::logging::log_status_transition;
use dashmap::DashMap;
use tracing::warn;

#[derive(Debug, Default)]
pub struct InMemoryIntegrationRegistry {
    integrations: DashMap<String, IntegrationRecord>,
}

impl InMemoryIntegrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry from the `integrations` section of the gateway config
    pub fn from_config(config: &GatewayConfig) -> Self {
        let registry = Self::new();
        for seed in &config.integrations {
            registry.upsert(IntegrationRecord::from(seed));
        }
        registry
    }

    /// Insert or replace a full record
    pub fn upsert(&self, record: IntegrationRecord) {
        self.integrations.insert(record.id.clone(), record);
    }

    pub fn remove(&self, id: &str) -> Option<IntegrationRecord> {
        self.integrations.remove(id).map(|(_, record)| record)
    }

    pub fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        self.integrations
            .get_mut(id)
            .map(|mut record| record.is_enabled = enabled)
            .is_some()
    }

    pub fn set_configured(&self, id: &str, configured: bool) -> bool {
        self.integrations
            .get_mut(id)
            .map(|mut record| record.is_configured = configured)
            .is_some()
    }

    /// Integration ids in sorted order
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.integrations.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }
}

impl From<&IntegrationSeed> for IntegrationRecord {
    fn from(seed: &IntegrationSeed) -> Self {
        Self {
            id: seed.id.clone(),
            is_enabled: seed.enabled,
            is_configured: seed.configured,
            status: seed.status,
            last_error: None,
            environment: seed.environment,
            credentials: seed.credentials.clone(),
        }
    }
}

impl IntegrationRegistry for InMemoryIntegrationRegistry {
    fn get_integration(&self, id: &str) -> Option<IntegrationRecord> {
        self.integrations.get(id).map(|record| record.clone())
    }

    fn credential_value(&self, id: &str, key: &str) -> Option<String> {
        self.integrations
            .get(id)
            .and_then(|record| record.credentials.get(key).cloned())
    }

    fn update_status(&self, id: &str, status: IntegrationStatus, error_message: Option<&str>) {
        let Some(mut record) = self.integrations.get_mut(id) else {
            warn!(integration_id = %id, status = %status, "Status update for unknown integration ignored");
            return;
        };

        record.status = status;
        record.last_error = match status {
            IntegrationStatus::Error => error_message.map(str::to_string),
            _ => None,
        };
        drop(record);

        log_status_transition(id, status, error_message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::IntegrationEnvironment;
    use std::collections::HashMap;

    #[test]
    fn test_update_status_records_last_error() {
        let registry = InMemoryIntegrationRegistry::new();
        registry.upsert(IntegrationRecord::connected("paystack"));

        registry.update_status("paystack", IntegrationStatus::Error, Some("HTTP 500"));
        let record = registry.get_integration("paystack").unwrap();
        assert_eq!(record.status, IntegrationStatus::Error);
        assert_eq!(record.last_error.as_deref(), Some("HTTP 500"));

        registry.update_status("paystack", IntegrationStatus::Connected, None);
        let record = registry.get_integration("paystack").unwrap();
        assert_eq!(record.status, IntegrationStatus::Connected);
        assert!(record.last_error.is_none());
    }

    #[test]
    fn test_update_unknown_integration_is_noop() {
        let registry = InMemoryIntegrationRegistry::new();
        registry.update_status("ghost", IntegrationStatus::Connected, None);
        assert!(registry.get_integration("ghost").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_credentials_lookup() {
        let registry = InMemoryIntegrationRegistry::new();
        registry.upsert(IntegrationRecord::connected("termii").with_credential("api_key", "tk_123"));

        assert_eq!(
            registry.credential_value("termii", "api_key").as_deref(),
            Some("tk_123")
        );
        assert!(registry.credential_value("termii", "sender_id").is_none());
        assert!(registry.credential_value("missing", "api_key").is_none());
    }

    #[test]
    fn test_from_config_seeds_records() {
        let config = GatewayConfig {
            integrations: vec![IntegrationSeed {
                id: "veriff".to_string(),
                enabled: true,
                configured: true,
                status: IntegrationStatus::Disconnected,
                environment: IntegrationEnvironment::Live,
                credentials: HashMap::from([("api_key".to_string(), "v".to_string())]),
            }],
            ..Default::default()
        };

        let registry = InMemoryIntegrationRegistry::from_config(&config);
        let record = registry.get_integration("veriff").unwrap();
        assert!(record.is_enabled);
        assert_eq!(record.status, IntegrationStatus::Disconnected);
        assert_eq!(record.environment, IntegrationEnvironment::Live);
        assert_eq!(registry.ids(), vec!["veriff".to_string()]);
    }

    #[test]
    fn test_toggle_flags() {
        let registry = InMemoryIntegrationRegistry::new();
        registry.upsert(IntegrationRecord::connected("openai"));

        assert!(registry.set_enabled("openai", false));
        assert!(registry.set_configured("openai", false));
        assert!(!registry.set_enabled("missing", true));

        let record = registry.get_integration("openai").unwrap();
        assert!(!record.is_enabled);
        assert!(!record.is_configured);
    }
}
