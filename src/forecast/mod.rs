//! Forward-looking analytics: growth, seasonality, and renewals

mod growth;
mod seasonality;
mod renewals;
mod summary;

pub use growth::{GrowthProjection, GrowthProjector, MonthlyActivity};
pub use seasonality::{SeasonalTrend, SeasonalityDetector, SeasonalityPattern};
pub use renewals::{RenewalForecast, RenewalForecaster};
pub use summary::{ForecastReport, ForecastSummary, GrowthOutlook, RenewalOutlook, RiskOutlook, SeasonalOutlook};

use serde::{Deserialize, Serialize};

use crate::assumptions::ForecastAssumptions;

/// Confidence in a forward-looking figure, falling with distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Confidence for a month `ahead` months out (1 = next month)
    pub fn for_horizon(ahead: u32, assumptions: &ForecastAssumptions) -> Self {
        if ahead <= assumptions.high_confidence_months {
            Confidence::High
        } else if ahead <= assumptions.medium_confidence_months {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}
