//! Cohort analysis: policies grouped by the month they became effective
//!
//! Tracks retention, chargeback exposure, and advance earning over the months
//! since each cohort started.

mod types;
mod analyzer;

pub use types::{CohortChargebacks, CohortEarningProgress, CohortReport, CohortRetention, CohortSummary};
pub use analyzer::CohortAnalyzer;
