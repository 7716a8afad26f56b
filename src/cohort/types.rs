//! Cohort output rows
//!
//! Per-month series are vectors indexed by months elapsed since the cohort
//! month, starting at 0. They stop at the earlier of the reference date and
//! the contestability window.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Retention curve for one effective-month cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRetention {
    /// Bucket key, e.g. "2025-01"
    pub cohort_month: String,
    /// Display label, e.g. "Jan 2025"
    pub cohort_label: String,
    pub total_policies: usize,

    /// Percent of the cohort active at each month
    pub retention_by_month: Vec<f64>,
    pub active_count: Vec<usize>,
    /// Policies whose lapse was recorded in exactly that month
    pub lapsed_count: Vec<usize>,
    /// Policies whose cancellation was recorded in exactly that month
    pub cancelled_count: Vec<usize>,
}

impl CohortRetention {
    /// Retention at `month`, if the cohort has been tracked that long
    pub fn retention_at(&self, month: u32) -> Option<f64> {
        self.retention_by_month.get(month as usize).copied()
    }

    pub fn months_tracked(&self) -> usize {
        self.retention_by_month.len()
    }
}

/// Chargeback exposure of one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortChargebacks {
    pub cohort_month: String,
    pub cohort_label: String,
    /// Distinct policies with at least one commission
    pub total_policies: usize,
    pub total_commission: f64,
    pub chargeback_amount: f64,
    /// chargeback_amount / total_commission × 100
    pub chargeback_rate: f64,
    pub avg_months_to_chargeback: f64,
    /// Chargeback counts keyed by months from effective date to chargeback
    pub chargebacks_by_month: BTreeMap<i32, usize>,
}

/// Straight-line earning of a cohort's advances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortEarningProgress {
    pub cohort_month: String,
    pub cohort_label: String,
    pub total_advance: f64,
    pub total_earned: f64,
    pub total_unearned: f64,
    /// total_earned / total_advance × 100
    pub earning_rate: f64,
    /// Percent of the advance earned at each month; month 0 is always 0
    pub progress_by_month: Vec<f64>,
}

/// Headline figures across all cohorts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub total_cohorts: usize,
    /// Mean retention at the milestone month over cohorts tracked that long
    pub avg_milestone_retention: f64,
    pub avg_chargeback_rate: f64,
    pub avg_earning_rate: f64,
    /// Label of the cohort with the highest milestone retention
    pub best_cohort: Option<String>,
    /// Label of the cohort with the lowest milestone retention
    pub worst_cohort: Option<String>,
}

/// Everything the cohort analyzer produces in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortReport {
    pub retention: Vec<CohortRetention>,
    pub chargebacks: Vec<CohortChargebacks>,
    pub earning: Vec<CohortEarningProgress>,
    pub summary: CohortSummary,
}
