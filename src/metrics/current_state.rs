//! Point-in-time state of the whole book
//!
//! Computed from unfiltered records, so it reads the same for every period.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::records::{Commission, Policy, PolicyStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    pub active_policies: usize,
    pub pending_policies: usize,
    pub total_policies: usize,
    pub total_clients: usize,
    /// Every pending advance, regardless of period
    pub pending_pipeline: f64,
    /// Active over total policies, in percent
    pub retention_rate: f64,
}

impl CurrentState {
    pub fn calculate(all_policies: &[Policy], all_commissions: &[Commission]) -> Self {
        let active_policies = all_policies.iter().filter(|p| p.status == PolicyStatus::Active).count();
        let total_policies = all_policies.len();
        let clients: HashSet<&str> = all_policies.iter().filter_map(Policy::client_name).collect();

        Self {
            active_policies,
            pending_policies: all_policies.iter().filter(|p| p.status == PolicyStatus::Pending).count(),
            total_policies,
            total_clients: clients.len(),
            pending_pipeline: all_commissions.iter().filter(|c| c.is_pending()).map(|c| c.amount).sum(),
            retention_rate: if total_policies > 0 {
                active_policies as f64 / total_policies as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{commission, date, policy};
    use approx::assert_relative_eq;

    #[test]
    fn test_current_state() {
        let policies = vec![
            policy("P1", date(2024, 1, 1), PolicyStatus::Active),
            policy("P2", date(2024, 6, 1), PolicyStatus::Pending),
            policy("P3", date(2025, 1, 1), PolicyStatus::Lapsed),
            policy("P4", date(2025, 2, 1), PolicyStatus::Active),
        ];
        let commissions = vec![
            commission("C1", "P1", 700.0),
            commission("C2", "P2", 300.0),
            commission("C3", "P3", 900.0).paid_on(date(2025, 1, 10)),
        ];

        let state = CurrentState::calculate(&policies, &commissions);
        assert_eq!(state.active_policies, 2);
        assert_eq!(state.pending_policies, 1);
        assert_eq!(state.total_policies, 4);
        assert_eq!(state.total_clients, 4);
        assert_relative_eq!(state.pending_pipeline, 1000.0);
        assert_relative_eq!(state.retention_rate, 50.0);
    }
}
