//! Term renewals expected over the coming months

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assumptions::ForecastAssumptions;
use crate::calendar::{add_months, month_key, month_label};
use crate::records::{Policy, PolicyStatus};
use super::Confidence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalForecast {
    pub month: String,
    pub month_label: String,
    pub expected_renewals: usize,
    /// Estimated renewal commission: premium × rate × renewal multiplier
    pub expected_revenue: f64,
    pub policy_ids: Vec<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Default)]
pub struct RenewalForecaster {
    assumptions: ForecastAssumptions,
}

impl RenewalForecaster {
    pub fn new(assumptions: ForecastAssumptions) -> Self {
        Self { assumptions }
    }

    /// Month a term policy comes up for renewal, if it has a term
    fn renewal_month(policy: &Policy) -> Option<String> {
        let years = policy.term_length.filter(|&y| y > 0)?;
        let months = i32::try_from(years.saturating_mul(12)).ok()?;
        Some(month_key(add_months(policy.effective_date, months)))
    }

    /// Renewals of active term policies in each month after `as_of`
    pub fn forecast(&self, policies: &[Policy], as_of: NaiveDate) -> Vec<RenewalForecast> {
        let renewing: Vec<(String, &Policy)> = policies
            .iter()
            .filter(|p| p.status == PolicyStatus::Active)
            .filter_map(|p| Self::renewal_month(p).map(|month| (month, p)))
            .collect();

        (1..=self.assumptions.horizon_months)
            .map(|ahead| {
                let month = add_months(as_of, ahead as i32);
                let key = month_key(month);

                let due: Vec<&Policy> = renewing
                    .iter()
                    .filter(|(renews, _)| *renews == key)
                    .map(|(_, p)| *p)
                    .collect();

                let expected_revenue = due
                    .iter()
                    .map(|p| p.commissionable_value() * self.assumptions.renewal_rate_multiplier)
                    .sum();

                RenewalForecast {
                    month: key,
                    month_label: month_label(month),
                    expected_renewals: due.len(),
                    expected_revenue,
                    policy_ids: due.iter().map(|p| p.id.clone()).collect(),
                    confidence: Confidence::for_horizon(ahead, &self.assumptions),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{as_of, date, policy};
    use approx::assert_relative_eq;

    #[test]
    fn test_term_policies_renew_on_anniversary() {
        let policies = vec![
            policy("P1", date(2015, 8, 3), PolicyStatus::Active).with_term_length(10),
            policy("P2", date(2016, 1, 20), PolicyStatus::Active).with_term_length(10),
            policy("P3", date(2015, 8, 9), PolicyStatus::Lapsed).with_term_length(10),
            policy("P4", date(2024, 8, 9), PolicyStatus::Active),
        ];
        let rows = RenewalForecaster::new(ForecastAssumptions::default()).forecast(&policies, as_of());
        assert_eq!(rows.len(), 12);

        let august = &rows[1];
        assert_eq!(august.month, "2025-08");
        assert_eq!(august.expected_renewals, 1);
        assert_eq!(august.policy_ids, vec!["P1".to_string()]);
        assert_relative_eq!(august.expected_revenue, 1200.0 * 0.95 * 0.25);
        assert_eq!(august.confidence, Confidence::High);

        let january = &rows[6];
        assert_eq!(january.month, "2026-01");
        assert_eq!(january.expected_renewals, 1);
        assert_eq!(january.confidence, Confidence::Low);

        let total: usize = rows.iter().map(|r| r.expected_renewals).sum();
        assert_eq!(total, 2);
    }
}
