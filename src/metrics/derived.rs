//! Averages and rates derived from the period's records

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::records::{ClientSnapshot, Commission, Policy};
use super::{ActualTotals, CurrentState};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub average_premium: f64,
    /// Mean commission rate of the period's commissions (decimal)
    pub average_commission_rate: f64,
    pub average_commission_amount: f64,
    pub average_expense_amount: f64,
    /// Lapsed over new policies, in percent
    pub lapsed_rate: f64,
    /// Cancelled over new policies, in percent
    pub cancellation_rate: f64,
    pub avg_client_value: f64,
    /// Mean age over distinct period clients with a known age
    pub avg_client_age: f64,
    /// Net income over commission earned, in percent
    pub profit_margin: f64,
    /// Whole-book policies per client
    pub policies_per_client: f64,
    pub avg_commission_per_policy: f64,
}

impl DerivedMetrics {
    pub fn calculate(
        totals: &ActualTotals,
        state: &CurrentState,
        period_commissions: &[Commission],
        period_policies: &[Policy],
    ) -> Self {
        let new_policies = totals.new_policies_count as f64;

        let average_premium = ratio(totals.premium_written, new_policies);
        let average_commission_rate = ratio(
            period_commissions.iter().map(|c| c.commission_rate).sum(),
            totals.commission_count as f64,
        );
        let average_commission_amount = ratio(
            period_commissions.iter().map(|c| c.amount).sum(),
            totals.commission_count as f64,
        );

        // First snapshot seen per client name
        let mut clients: HashMap<&str, &ClientSnapshot> = HashMap::new();
        for policy in period_policies {
            if let (Some(name), Some(client)) = (policy.client_name(), policy.client.as_ref()) {
                clients.entry(name).or_insert(client);
            }
        }
        let ages: Vec<u32> = clients.values().filter_map(|c| c.age).filter(|&age| age > 0).collect();
        let avg_client_age = ratio(ages.iter().map(|&a| a as f64).sum(), ages.len() as f64);

        let avg_commission_per_policy = if totals.new_policies_count > 0 {
            totals.commission_earned / new_policies
        } else {
            average_premium * (average_commission_rate / 100.0)
        };

        Self {
            average_premium,
            average_commission_rate,
            average_commission_amount,
            average_expense_amount: ratio(totals.total_expenses, totals.expense_count as f64),
            lapsed_rate: ratio(totals.lapsed_count as f64, new_policies) * 100.0,
            cancellation_rate: ratio(totals.cancelled_count as f64, new_policies) * 100.0,
            avg_client_value: ratio(totals.client_total_value, totals.new_clients_count as f64),
            avg_client_age,
            profit_margin: if totals.commission_earned > 0.0 {
                totals.net_income / totals.commission_earned * 100.0
            } else {
                0.0
            },
            policies_per_client: ratio(state.total_policies as f64, state.total_clients as f64),
            avg_commission_per_policy,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
