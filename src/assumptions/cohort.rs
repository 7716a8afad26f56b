//! Cohort window and milestone

use serde::{Deserialize, Serialize};

/// Contestability window: retention is tracked for at most this many months
pub const CONTESTABILITY_WINDOW_MONTHS: u32 = 24;

/// Month used to rank cohorts and summarise retention (the advance period)
pub const RETENTION_MILESTONE_MONTH: u32 = 9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortAssumptions {
    pub window_months: u32,
    pub milestone_month: u32,
}

impl Default for CohortAssumptions {
    fn default() -> Self {
        Self {
            window_months: CONTESTABILITY_WINDOW_MONTHS,
            milestone_month: RETENTION_MILESTONE_MONTH,
        }
    }
}
