//! Trailing-average growth projection

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::assumptions::ForecastAssumptions;
use crate::calendar::{add_months, month_key, month_label};
use crate::records::{Commission, Policy};
use super::Confidence;

/// Activity in one trailing calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    /// Bucket key, e.g. "2025-01"
    pub month: String,
    /// Policies effective in the month
    pub policies: usize,
    /// Annual premium of those policies
    pub revenue: f64,
    /// Commission amounts created in the month
    pub commission: f64,
}

/// One projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub period: String,
    pub period_label: String,
    pub projected_policies: u32,
    pub projected_revenue: f64,
    pub projected_commission: f64,
    pub confidence: Confidence,
    /// Average month-over-month policy growth in percent; the same on every row
    pub growth_rate: f64,
}

/// Projects policy, premium, and commission volume forward from trailing history
#[derive(Debug, Clone, Default)]
pub struct GrowthProjector {
    assumptions: ForecastAssumptions,
}

impl GrowthProjector {
    pub fn new(assumptions: ForecastAssumptions) -> Self {
        Self { assumptions }
    }

    /// Calendar months before `as_of`'s month, oldest first
    ///
    /// Policies are bucketed by effective month and commissions by creation month.
    pub fn trailing_history(
        &self,
        policies: &[Policy],
        commissions: &[Commission],
        as_of: NaiveDate,
    ) -> Vec<MonthlyActivity> {
        let mut by_month: HashMap<String, MonthlyActivity> = (1..=self.assumptions.trailing_months as i32)
            .map(|back| {
                let key = month_key(add_months(as_of, -back));
                let bucket = MonthlyActivity {
                    month: key.clone(),
                    policies: 0,
                    revenue: 0.0,
                    commission: 0.0,
                };
                (key, bucket)
            })
            .collect();

        for policy in policies {
            if let Some(bucket) = by_month.get_mut(&month_key(policy.effective_date)) {
                bucket.policies += 1;
                bucket.revenue += policy.annual_premium;
            }
        }
        for commission in commissions {
            if let Some(bucket) = by_month.get_mut(&month_key(commission.created_at.date_naive())) {
                bucket.commission += commission.amount;
            }
        }

        let mut history: Vec<MonthlyActivity> = by_month.into_values().collect();
        history.sort_by(|a, b| a.month.cmp(&b.month));
        history
    }

    /// Mean month-over-month growth in policy counts, in percent
    ///
    /// Pairs whose earlier month had no policies are skipped. Falls back to the
    /// default rate when no pair qualifies.
    pub fn average_growth_rate(&self, history: &[MonthlyActivity]) -> f64 {
        let rates: Vec<f64> = history
            .windows(2)
            .filter(|pair| pair[0].policies > 0)
            .map(|pair| {
                let previous = pair[0].policies as f64;
                (pair[1].policies as f64 - previous) / previous * 100.0
            })
            .collect();

        if rates.is_empty() {
            self.assumptions.default_growth_rate_percent
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        }
    }

    /// Compound the trailing averages forward over the projection horizon
    pub fn project(&self, policies: &[Policy], commissions: &[Commission], as_of: NaiveDate) -> Vec<GrowthProjection> {
        let history = self.trailing_history(policies, commissions, as_of);
        let months = history.len().max(1) as f64;

        let avg_policies = history.iter().map(|m| m.policies as f64).sum::<f64>() / months;
        let avg_revenue = history.iter().map(|m| m.revenue).sum::<f64>() / months;
        let avg_commission = history.iter().map(|m| m.commission).sum::<f64>() / months;

        let growth_rate = self.average_growth_rate(&history);
        let multiplier = 1.0 + growth_rate / 100.0;
        debug!("Projecting growth at {:.2}% per month from {} trailing months", growth_rate, history.len());

        (1..=self.assumptions.horizon_months)
            .map(|ahead| {
                let month = add_months(as_of, ahead as i32);
                let compound = multiplier.powi(ahead as i32);

                GrowthProjection {
                    period: month_key(month),
                    period_label: month_label(month),
                    projected_policies: (avg_policies * compound).round().max(0.0) as u32,
                    projected_revenue: (avg_revenue * compound).round(),
                    projected_commission: (avg_commission * compound).round(),
                    confidence: Confidence::for_horizon(ahead, &self.assumptions),
                    growth_rate,
                }
            })
            .collect()
    }
}
