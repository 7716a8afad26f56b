//! Growth, renewal, and seasonality parameters

use serde::{Deserialize, Serialize};

/// Months of history averaged into the growth baseline
pub const TRAILING_MONTHS: u32 = 12;

/// Months projected forward
pub const PROJECTION_HORIZON: u32 = 12;

/// Month-over-month growth, in percent, assumed when history gives no rate
pub const DEFAULT_GROWTH_RATE_PERCENT: f64 = 5.0;

/// Projections up to this many months out are high confidence
pub const HIGH_CONFIDENCE_MONTHS: u32 = 3;
/// ...and up to this many are medium
pub const MEDIUM_CONFIDENCE_MONTHS: u32 = 6;

/// Share of first-year commission expected back on renewal
pub const RENEWAL_RATE_MULTIPLIER: f64 = 0.25;

pub const PEAK_INDEX: f64 = 1.3;
pub const ABOVE_AVERAGE_INDEX: f64 = 1.1;
pub const AVERAGE_INDEX: f64 = 0.9;
pub const BELOW_AVERAGE_INDEX: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastAssumptions {
    pub trailing_months: u32,
    pub horizon_months: u32,
    pub default_growth_rate_percent: f64,
    pub high_confidence_months: u32,
    pub medium_confidence_months: u32,
    pub renewal_rate_multiplier: f64,
    pub peak_index: f64,
    pub above_average_index: f64,
    pub average_index: f64,
    pub below_average_index: f64,
}

impl Default for ForecastAssumptions {
    fn default() -> Self {
        Self {
            trailing_months: TRAILING_MONTHS,
            horizon_months: PROJECTION_HORIZON,
            default_growth_rate_percent: DEFAULT_GROWTH_RATE_PERCENT,
            high_confidence_months: HIGH_CONFIDENCE_MONTHS,
            medium_confidence_months: MEDIUM_CONFIDENCE_MONTHS,
            renewal_rate_multiplier: RENEWAL_RATE_MULTIPLIER,
            peak_index: PEAK_INDEX,
            above_average_index: ABOVE_AVERAGE_INDEX,
            average_index: AVERAGE_INDEX,
            below_average_index: BELOW_AVERAGE_INDEX,
        }
    }
}
