//! # Call Ledger
//!
//! Bounded, in-process log of every execution attempt. Entries are appended at
//! the head and the oldest entry is dropped from the tail once the ledger holds
//! more than its capacity, so memory stays bounded regardless of call volume.
//! Nothing is persisted; the ledger lives as long as its owner.

pub mod stats;

use crate::constants::{CallStatus, DEFAULT_LEDGER_CAPACITY};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use uuid::Uuid;

pub use stats::{ApiStats, IntegrationStats};

/// Immutable record of one attempt or one terminal outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub id: Uuid,
    pub integration_id: String,
    pub endpoint: String,
    pub method: String,
    pub status: CallStatus,
    pub status_code: Option<u16>,
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    pub error: Option<String>,
    pub retry_count: u32,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl CallLogEntry {
    pub fn new(
        integration_id: impl Into<String>,
        endpoint: impl Into<String>,
        method: impl Into<String>,
        status: CallStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            integration_id: integration_id.into(),
            endpoint: endpoint.into(),
            method: method.into(),
            status,
            status_code: None,
            duration: Duration::ZERO,
            error: None,
            retry_count: 0,
            timestamp: Utc::now(),
            user_id: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_status_code(mut self, status_code: Option<u16>) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Capped, newest-first log of call attempts
#[derive(Debug)]
pub struct CallLedger {
    entries: RwLock<VecDeque<CallLogEntry>>,
    capacity: usize,
}

impl Default for CallLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CallLedger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LEDGER_CAPACITY)
    }

    /// A zero capacity is raised to one so the most recent entry is always visible
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append at the head, dropping from the tail past capacity
    pub fn append(&self, entry: CallLogEntry) {
        let mut entries = self.entries.write();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Snapshot of entries, newest first, optionally filtered by integration
    pub fn entries(&self, integration_id: Option<&str>) -> Vec<CallLogEntry> {
        let entries = self.entries.read();
        match integration_id {
            Some(id) => entries
                .iter()
                .filter(|entry| entry.integration_id == id)
                .cloned()
                .collect(),
            None => entries.iter().cloned().collect(),
        }
    }

    /// The `limit` most recent entries
    pub fn recent(&self, limit: usize) -> Vec<CallLogEntry> {
        self.entries.read().iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Aggregate statistics over the current contents
    pub fn stats(&self) -> ApiStats {
        ApiStats::from_entries(self.entries.read().iter())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
