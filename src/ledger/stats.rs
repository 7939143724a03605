//! # Call Statistics
//!
//! Success rate and latency figures derived from the call ledger on demand.
//! Rates are percentages (0-100) and every average is `0` for an empty input.

use super::CallLogEntry;
use crate::constants::CallStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Figures for one integration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationStats {
    pub total_calls: u64,
    pub success_rate: f64,
    pub average_duration_ms: f64,
}

/// Figures across the whole ledger plus a per-integration breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiStats {
    pub total_calls: u64,
    pub success_rate: f64,
    pub average_duration_ms: f64,
    pub by_integration: HashMap<String, IntegrationStats>,
}

#[derive(Default)]
struct Tally {
    total: u64,
    successes: u64,
    duration_ms: u128,
}

impl Tally {
    fn add(&mut self, entry: &CallLogEntry) {
        self.total += 1;
        if entry.status == CallStatus::Success {
            self.successes += 1;
        }
        self.duration_ms += entry.duration.as_millis();
    }

    fn finish(&self) -> IntegrationStats {
        if self.total == 0 {
            return IntegrationStats::default();
        }
        IntegrationStats {
            total_calls: self.total,
            success_rate: self.successes as f64 / self.total as f64 * 100.0,
            average_duration_ms: self.duration_ms as f64 / self.total as f64,
        }
    }
}

impl ApiStats {
    /// Fold ledger entries into aggregate statistics
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CallLogEntry>) -> Self {
        let mut overall = Tally::default();
        let mut per_integration: HashMap<&str, Tally> = HashMap::new();

        for entry in entries {
            overall.add(entry);
            per_integration
                .entry(entry.integration_id.as_str())
                .or_default()
                .add(entry);
        }

        let totals = overall.finish();
        Self {
            total_calls: totals.total_calls,
            success_rate: totals.success_rate,
            average_duration_ms: totals.average_duration_ms,
            by_integration: per_integration
                .into_iter()
                .map(|(id, tally)| (id.to_string(), tally.finish()))
                .collect(),
        }
    }

    pub fn integration(&self, id: &str) -> Option<&IntegrationStats> {
        self.by_integration.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(integration: &str, status: CallStatus, ms: u64) -> CallLogEntry {
        CallLogEntry::new(integration, "/op", "POST", status).with_duration(Duration::from_millis(ms))
    }

    #[test]
    fn test_empty_ledger_has_zero_rates() {
        let stats = ApiStats::from_entries(std::iter::empty());
        assert_eq!(stats.total_calls, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.average_duration_ms, 0.0);
        assert!(stats.by_integration.is_empty());
    }

    #[test]
    fn test_success_rate_is_percentage() {
        let entries = vec![
            entry("paystack", CallStatus::Success, 100),
            entry("paystack", CallStatus::Retry, 300),
            entry("paystack", CallStatus::Success, 200),
            entry("termii", CallStatus::Error, 400),
        ];

        let stats = ApiStats::from_entries(&entries);
        assert_eq!(stats.total_calls, 4);
        assert_eq!(stats.success_rate, 50.0);
        assert_eq!(stats.average_duration_ms, 250.0);

        let paystack = stats.integration("paystack").unwrap();
        assert_eq!(paystack.total_calls, 3);
        assert!((paystack.success_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(paystack.average_duration_ms, 200.0);

        let termii = stats.integration("termii").unwrap();
        assert_eq!(termii.success_rate, 0.0);
        assert_eq!(termii.average_duration_ms, 400.0);
    }
}
