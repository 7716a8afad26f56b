//! Headline forecast figures composed from the individual forecasts

use serde::{Deserialize, Serialize};

use crate::risk::{RiskLevel, RiskScore};
use super::{GrowthProjection, RenewalForecast, SeasonalityPattern};

/// Near-term window used by the summary, in months
const NEAR_TERM_MONTHS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenewalOutlook {
    pub next_3_months: usize,
    pub next_3_months_revenue: f64,
    pub total_12_months: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskOutlook {
    /// High and critical policies
    pub high_risk_policies: usize,
    pub critical_policies: usize,
    pub total_unearned: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthOutlook {
    pub avg_growth_rate: f64,
    pub next_3_months_projection: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonalOutlook {
    pub peak_month: Option<String>,
    pub peak_index: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub renewals: RenewalOutlook,
    pub risk: RiskOutlook,
    pub growth: GrowthOutlook,
    pub seasonality: SeasonalOutlook,
}

impl ForecastSummary {
    pub fn from_parts(
        renewals: &[RenewalForecast],
        risks: &[RiskScore],
        growth: &[GrowthProjection],
        seasonality: &[SeasonalityPattern],
    ) -> Self {
        let near_renewals = &renewals[..renewals.len().min(NEAR_TERM_MONTHS)];
        let near_growth = &growth[..growth.len().min(NEAR_TERM_MONTHS)];

        // First month holding the highest index
        let peak = seasonality.iter().fold(None::<&SeasonalityPattern>, |peak, month| match peak {
            Some(p) if month.seasonal_index <= p.seasonal_index => Some(p),
            _ => Some(month),
        });

        Self {
            renewals: RenewalOutlook {
                next_3_months: near_renewals.iter().map(|r| r.expected_renewals).sum(),
                next_3_months_revenue: near_renewals.iter().map(|r| r.expected_revenue).sum(),
                total_12_months: renewals.iter().map(|r| r.expected_renewals).sum(),
            },
            risk: RiskOutlook {
                high_risk_policies: risks.iter().filter(|r| r.risk_level.is_elevated()).count(),
                critical_policies: risks.iter().filter(|r| r.risk_level == RiskLevel::Critical).count(),
                total_unearned: risks.iter().map(|r| r.unearned_amount).sum(),
            },
            growth: GrowthOutlook {
                avg_growth_rate: near_growth.iter().map(|g| g.growth_rate).sum::<f64>()
                    / near_growth.len().max(1) as f64,
                next_3_months_projection: near_growth.iter().map(|g| g.projected_commission).sum(),
            },
            seasonality: SeasonalOutlook {
                peak_month: peak.map(|p| p.month_name.clone()),
                peak_index: peak.map_or(0.0, |p| p.seasonal_index),
            },
        }
    }
}

/// Every forecast for one reference date, plus their summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub renewals: Vec<RenewalForecast>,
    pub risks: Vec<RiskScore>,
    pub growth: Vec<GrowthProjection>,
    pub seasonality: Vec<SeasonalityPattern>,
    pub summary: ForecastSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::ForecastAssumptions;
    use crate::forecast::{GrowthProjector, SeasonalityDetector};
    use crate::fixtures::as_of;

    #[test]
    fn test_empty_summary() {
        let assumptions = ForecastAssumptions::default();
        let growth = GrowthProjector::new(assumptions.clone()).project(&[], &[], as_of());
        let seasonality = SeasonalityDetector::new(assumptions).detect(&[]);
        let summary = ForecastSummary::from_parts(&[], &[], &growth, &seasonality);

        assert_eq!(summary.renewals, RenewalOutlook::default());
        assert_eq!(summary.risk, RiskOutlook::default());
        assert_eq!(summary.growth.avg_growth_rate, 5.0);
        assert_eq!(summary.growth.next_3_months_projection, 0.0);
        // All months tie at 1.0, so January wins
        assert_eq!(summary.seasonality.peak_month.as_deref(), Some("January"));
        assert_eq!(summary.seasonality.peak_index, 1.0);
    }
}
