//! # Readiness Gate
//!
//! Derives whether an integration may be called right now. Checks run in a
//! fixed order and the first failing one decides both the verdict and the
//! message: exists, configured, enabled, connected. A missing integration is
//! reported exactly like an unconfigured one.
//!
//! Everything here is a pure read of registry state.

use super::{IntegrationRecord, IntegrationRegistry};
use crate::constants::{messages, IntegrationStatus};
use serde::{Deserialize, Serialize};

/// Outcome of the readiness gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotConfigured,
    Disabled,
    NotConnected(IntegrationStatus),
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }

    /// Stable user-facing message for this verdict
    pub fn message(&self) -> String {
        match self {
            Readiness::Ready => messages::READY.to_string(),
            Readiness::NotConfigured => messages::NOT_CONFIGURED.to_string(),
            Readiness::Disabled => messages::DISABLED.to_string(),
            Readiness::NotConnected(status) => messages::not_connected(*status),
        }
    }
}

/// Availability summary for UI gating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationAvailability {
    pub available: bool,
    pub status: IntegrationStatus,
    pub message: String,
}

/// Whether a feature backed by an integration can be offered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeatureAvailability {
    Available,
    Unavailable { reason: String },
}

impl FeatureAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, FeatureAvailability::Available)
    }
}

/// Evaluate the readiness gate for `id`
pub fn check_readiness(registry: &dyn IntegrationRegistry, id: &str) -> Readiness {
    readiness_of(registry.get_integration(id).as_ref())
}

/// Gate verdict for one record snapshot; `None` is a missing integration
pub fn readiness_of(record: Option<&IntegrationRecord>) -> Readiness {
    let Some(record) = record else {
        return Readiness::NotConfigured;
    };

    if !record.is_configured {
        Readiness::NotConfigured
    } else if !record.is_enabled {
        Readiness::Disabled
    } else if record.status != IntegrationStatus::Connected {
        Readiness::NotConnected(record.status)
    } else {
        Readiness::Ready
    }
}

pub fn is_integration_ready(registry: &dyn IntegrationRegistry, id: &str) -> bool {
    check_readiness(registry, id).is_ready()
}

pub fn integration_status(registry: &dyn IntegrationRegistry, id: &str) -> IntegrationAvailability {
    let record = registry.get_integration(id);
    let readiness = readiness_of(record.as_ref());
    let status = record
        .map(|record| record.status)
        .unwrap_or(IntegrationStatus::NotConfigured);

    IntegrationAvailability {
        available: readiness.is_ready(),
        status,
        message: readiness.message(),
    }
}

pub fn is_feature_available(registry: &dyn IntegrationRegistry, id: &str) -> FeatureAvailability {
    match check_readiness(registry, id) {
        Readiness::Ready => FeatureAvailability::Available,
        other => FeatureAvailability::Unavailable {
            reason: other.message(),
        },
    }
}
