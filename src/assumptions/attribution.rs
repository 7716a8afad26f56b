//! Mover thresholds and carrier trend windows

use serde::{Deserialize, Serialize};

/// Changes at or below this many dollars are not reported as movers
pub const SIGNIFICANCE_THRESHOLD: f64 = 100.0;
pub const HIGH_IMPACT_THRESHOLD: f64 = 1_000.0;
pub const MEDIUM_IMPACT_THRESHOLD: f64 = 500.0;
pub const TOP_MOVERS: usize = 10;

/// Ratio of recent to prior commission above which a carrier is improving
pub const IMPROVING_RATIO: f64 = 1.10;
/// ...and below which it is declining
pub const DECLINING_RATIO: f64 = 0.90;
pub const TREND_WINDOW_MONTHS: u32 = 3;

/// Calendar months covered by product-mix evolution
pub const MIX_WINDOW_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionAssumptions {
    pub significance_threshold: f64,
    pub high_impact_threshold: f64,
    pub medium_impact_threshold: f64,
    pub top_movers: usize,
    pub improving_ratio: f64,
    pub declining_ratio: f64,
    pub trend_window_months: u32,
    pub mix_window_months: u32,
}

impl Default for AttributionAssumptions {
    fn default() -> Self {
        Self {
            significance_threshold: SIGNIFICANCE_THRESHOLD,
            high_impact_threshold: HIGH_IMPACT_THRESHOLD,
            medium_impact_threshold: MEDIUM_IMPACT_THRESHOLD,
            top_movers: TOP_MOVERS,
            improving_ratio: IMPROVING_RATIO,
            declining_ratio: DECLINING_RATIO,
            trend_window_months: TREND_WINDOW_MONTHS,
            mix_window_months: MIX_WINDOW_MONTHS,
        }
    }
}
