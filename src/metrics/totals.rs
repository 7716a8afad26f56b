//! Actual totals for the selected period
//!
//! Plain sums over the period-filtered records. Nothing here is scaled to the
//! period length; the date-range filter already selected the right records.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::records::{Commission, Expense, Policy, PolicyStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualTotals {
    /// Paid advance amounts
    pub commission_earned: f64,
    /// Pending advance amounts
    pub commission_pending: f64,
    pub commission_count: usize,

    pub total_expenses: f64,
    pub expense_count: usize,
    pub recurring_expenses: f64,
    pub one_time_expenses: f64,
    pub tax_deductible_expenses: f64,

    /// Commission earned less expenses
    pub net_income: f64,

    pub premium_written: f64,
    /// Σ premium × commission rate
    pub commissionable_value: f64,
    pub new_policies_count: usize,
    pub cancelled_count: usize,
    pub lapsed_count: usize,

    /// Distinct client names on the period's policies
    pub new_clients_count: usize,
    pub client_total_value: f64,
}

impl ActualTotals {
    pub fn calculate(commissions: &[Commission], expenses: &[Expense], policies: &[Policy]) -> Self {
        let commission_earned = commissions.iter().filter(|c| c.is_paid()).map(|c| c.amount).sum();
        let commission_pending = commissions.iter().filter(|c| c.is_pending()).map(|c| c.amount).sum();

        let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
        let recurring_expenses: f64 = expenses.iter().filter(|e| e.is_recurring).map(|e| e.amount).sum();
        let tax_deductible_expenses = expenses.iter().filter(|e| e.is_tax_deductible).map(|e| e.amount).sum();

        let premium_written: f64 = policies.iter().map(|p| p.annual_premium).sum();
        let clients: HashSet<&str> = policies.iter().filter_map(Policy::client_name).collect();

        Self {
            commission_earned,
            commission_pending,
            commission_count: commissions.len(),
            total_expenses,
            expense_count: expenses.len(),
            recurring_expenses,
            one_time_expenses: total_expenses - recurring_expenses,
            tax_deductible_expenses,
            net_income: commission_earned - total_expenses,
            premium_written,
            commissionable_value: policies.iter().map(Policy::commissionable_value).sum(),
            new_policies_count: policies.len(),
            cancelled_count: policies.iter().filter(|p| p.status == PolicyStatus::Cancelled).count(),
            lapsed_count: policies.iter().filter(|p| p.status == PolicyStatus::Lapsed).count(),
            new_clients_count: clients.len(),
            client_total_value: premium_written,
        }
    }
}
