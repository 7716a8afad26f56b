//! Commission Analytics - Forecasting and cohort-analytics engine for insurance agencies
//!
//! This library provides:
//! - Cohort retention, chargeback, and earning-progress curves
//! - Chargeback risk scoring with recommended actions
//! - Growth projections, seasonality indices, and renewal forecasts
//! - Period-over-period attribution, carrier ROI, and top movers
//! - Period dashboard metrics (totals, current state, derived, pace)
//!
//! Every analyzer is a pure function of the records it is given and an
//! explicit reference date.

pub mod error;
pub mod calendar;
pub mod period;
pub mod records;
pub mod assumptions;
pub mod cohort;
pub mod risk;
pub mod forecast;
pub mod attribution;
pub mod metrics;
pub mod runner;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use error::{AnalyticsError, Result};
pub use period::{DateRange, TimePeriod};
pub use records::{Carrier, Commission, Expense, Policy, PolicyStatus, ProductType};
pub use assumptions::Assumptions;
pub use cohort::CohortAnalyzer;
pub use risk::ChargebackRiskScorer;
pub use forecast::{GrowthProjector, RenewalForecaster, SeasonalityDetector};
pub use attribution::AttributionDecomposer;
pub use metrics::MetricsAggregator;
pub use runner::{AgencySnapshot, AnalyticsRunner, DashboardRequest};
