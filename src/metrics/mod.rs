//! Dashboard metrics for a reporting period
//!
//! Four families, each with its own rule about which records it may see:
//! - actual totals: period records, never scaled
//! - current state: all records, independent of the period
//! - derived: averages and rates over period records
//! - pace: forward-looking targets over the time left in the period
//!
//! Grouped breakdowns of the period totals ride along.

mod totals;
mod current_state;
mod derived;
mod pace;
mod grouped;

pub use totals::ActualTotals;
pub use current_state::CurrentState;
pub use derived::DerivedMetrics;
pub use pace::PaceMetrics;
pub use grouped::GroupedMetrics;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::period::{commissions_in_range, expenses_in_range, policies_in_range, DateRange, TimePeriod};
use crate::records::{Commission, Expense, Policy};

/// Records for one metrics calculation, already split into all-time and period slices
#[derive(Debug, Clone, Copy)]
pub struct MetricsInput<'a> {
    pub all_policies: &'a [Policy],
    pub period_policies: &'a [Policy],
    pub all_commissions: &'a [Commission],
    pub period_commissions: &'a [Commission],
    pub period_expenses: &'a [Expense],
    pub time_period: TimePeriod,
    pub date_range: DateRange,
    /// Reference instant for time remaining
    pub now: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub actual_totals: ActualTotals,
    pub current_state: CurrentState,
    pub derived: DerivedMetrics,
    pub pace: PaceMetrics,
    pub grouped: GroupedMetrics,
    pub time_period: TimePeriod,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsAggregator;

impl MetricsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Compute every metric family from pre-split input
    pub fn calculate(&self, input: &MetricsInput<'_>) -> DashboardMetrics {
        let actual_totals = ActualTotals::calculate(input.period_commissions, input.period_expenses, input.period_policies);
        let current_state = CurrentState::calculate(input.all_policies, input.all_commissions);
        let derived = DerivedMetrics::calculate(&actual_totals, &current_state, input.period_commissions, input.period_policies);
        let pace = PaceMetrics::calculate(&actual_totals, &derived, input.time_period, input.now);
        let grouped = GroupedMetrics::calculate(input.period_commissions, input.period_expenses, input.period_policies);

        DashboardMetrics {
            actual_totals,
            current_state,
            derived,
            pace,
            grouped,
            time_period: input.time_period,
            date_range: input.date_range,
        }
    }

    /// Filter unfiltered records to the period at `offset` and compute its metrics
    pub fn for_period(
        &self,
        policies: &[Policy],
        commissions: &[Commission],
        expenses: &[Expense],
        time_period: TimePeriod,
        now: NaiveDateTime,
        offset: i32,
    ) -> DashboardMetrics {
        let date_range = DateRange::for_period(time_period, now, offset);
        let period_policies = policies_in_range(policies, &date_range);
        let period_commissions = commissions_in_range(commissions, &date_range);
        let period_expenses = expenses_in_range(expenses, &date_range);

        debug!(
            "{} metrics over {} policies, {} commissions, {} expenses in range",
            time_period.label(),
            period_policies.len(),
            period_commissions.len(),
            period_expenses.len()
        );

        self.calculate(&MetricsInput {
            all_policies: policies,
            period_policies: &period_policies,
            all_commissions: commissions,
            period_commissions: &period_commissions,
            period_expenses: &period_expenses,
            time_period,
            date_range,
            now,
        })
    }
}
