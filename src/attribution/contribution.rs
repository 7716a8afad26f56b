//! Volume / rate / mix decomposition of a commission change
//!
//! Effects are computed by sequential substitution and are not forced to sum
//! to the total change; no residual term is added.

use serde::{Deserialize, Serialize};

use super::{AttributionDecomposer, PeriodRecords};

/// Per-period inputs to the decomposition
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub policy_count: usize,
    pub total_commission: f64,
    /// Mean commission rate over the period's commissions (decimal)
    pub avg_rate: f64,
    /// Mean annual premium over the period's policies
    pub avg_premium: f64,
}

impl PeriodTotals {
    pub fn from_records(records: PeriodRecords<'_>) -> Self {
        let policy_count = records.policies.len();
        let commission_count = records.commissions.len();

        let total_commission = records.commissions.iter().map(|c| c.amount).sum();
        let avg_rate = if commission_count > 0 {
            records.commissions.iter().map(|c| c.commission_rate).sum::<f64>() / commission_count as f64
        } else {
            0.0
        };
        let avg_premium = if policy_count > 0 {
            records.policies.iter().map(|p| p.annual_premium).sum::<f64>() / policy_count as f64
        } else {
            0.0
        };

        Self {
            policy_count,
            total_commission,
            avg_rate,
            avg_premium,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub total_change: f64,
    pub volume_effect: f64,
    pub rate_effect: f64,
    pub mix_effect: f64,
    /// Effects as a signed percent of |total_change|
    pub volume_percent: f64,
    pub rate_percent: f64,
    pub mix_percent: f64,
}

impl AttributionDecomposer {
    /// Decompose the commission change from `previous` to `current`
    pub fn contribution(&self, current: PeriodRecords<'_>, previous: PeriodRecords<'_>) -> ContributionBreakdown {
        let cur = PeriodTotals::from_records(current);
        let prev = PeriodTotals::from_records(previous);

        let total_change = cur.total_commission - prev.total_commission;
        let count_change = cur.policy_count as f64 - prev.policy_count as f64;

        let volume_effect = count_change * prev.avg_premium * prev.avg_rate;
        let rate_effect = cur.policy_count as f64 * prev.avg_premium * (cur.avg_rate - prev.avg_rate);
        let mix_effect = cur.policy_count as f64 * (cur.avg_premium - prev.avg_premium) * cur.avg_rate;

        let share = |effect: f64| {
            if total_change != 0.0 {
                effect / total_change.abs() * 100.0
            } else {
                0.0
            }
        };

        ContributionBreakdown {
            current: cur,
            previous: prev,
            total_change,
            volume_effect,
            rate_effect,
            mix_effect,
            volume_percent: share(volume_effect),
            rate_percent: share(rate_effect),
            mix_percent: share(mix_effect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AttributionAssumptions;
    use crate::fixtures::{commission, date, policy};
    use crate::records::{Commission, Policy, PolicyStatus};
    use approx::assert_relative_eq;

    fn decomposer() -> AttributionDecomposer {
        AttributionDecomposer::new(AttributionAssumptions::default())
    }

    fn policies(n: usize, premium: f64) -> Vec<Policy> {
        (0..n)
            .map(|i| {
                let mut p = policy(&format!("P{i}"), date(2025, 5, 1), PolicyStatus::Active);
                p.annual_premium = premium;
                p
            })
            .collect()
    }

    fn commissions(n: usize, amount: f64, rate: f64) -> Vec<Commission> {
        (0..n)
            .map(|i| {
                let mut c = commission(&format!("C{i}"), &format!("P{i}"), amount);
                c.commission_rate = rate;
                c
            })
            .collect()
    }

    #[test]
    fn test_volume_only_change() {
        let prev_p = policies(2, 1000.0);
        let prev_c = commissions(2, 800.0, 0.8);
        let cur_p = policies(3, 1000.0);
        let cur_c = commissions(3, 800.0, 0.8);

        let b = decomposer().contribution(PeriodRecords::new(&cur_p, &cur_c), PeriodRecords::new(&prev_p, &prev_c));
        assert_relative_eq!(b.total_change, 800.0);
        assert_relative_eq!(b.volume_effect, 800.0);
        assert_relative_eq!(b.rate_effect, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.mix_effect, 0.0);
        assert_relative_eq!(b.volume_percent, 100.0);
    }

    #[test]
    fn test_effects_need_not_sum_to_total() {
        let prev_p = policies(2, 1000.0);
        let prev_c = commissions(2, 800.0, 0.8);
        let cur_p = policies(2, 1500.0);
        let cur_c = commissions(1, 900.0, 1.0);

        let b = decomposer().contribution(PeriodRecords::new(&cur_p, &cur_c), PeriodRecords::new(&prev_p, &prev_c));
        assert_relative_eq!(b.total_change, -700.0);
        assert_relative_eq!(b.volume_effect, 0.0);
        assert_relative_eq!(b.rate_effect, 2.0 * 1000.0 * 0.2, epsilon = 1e-9);
        assert_relative_eq!(b.mix_effect, 2.0 * 500.0 * 1.0);
        // Positive effects against a negative total keep their sign
        assert_relative_eq!(b.mix_percent, 1000.0 / 700.0 * 100.0);
    }

    #[test]
    fn test_empty_periods() {
        let b = decomposer().contribution(PeriodRecords::default(), PeriodRecords::default());
        assert_eq!(b, ContributionBreakdown::default());
    }
}
