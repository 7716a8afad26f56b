//! Calendar-month seasonality over all years of data

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::assumptions::ForecastAssumptions;
use crate::calendar::month_name;
use crate::records::Policy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalTrend {
    Peak,
    AboveAverage,
    Average,
    BelowAverage,
    Trough,
}

/// Seasonal pattern of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityPattern {
    /// 1 = January
    pub month: u32,
    pub month_name: String,
    /// Policies effective in this calendar month across all years
    pub policies: usize,
    /// Annual premium of those policies
    pub revenue: f64,
    /// Month count over the all-month average; 1.0 means no seasonality
    pub seasonal_index: f64,
    pub trend: SeasonalTrend,
}

#[derive(Debug, Clone, Default)]
pub struct SeasonalityDetector {
    assumptions: ForecastAssumptions,
}

impl SeasonalityDetector {
    pub fn new(assumptions: ForecastAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn classify(&self, seasonal_index: f64) -> SeasonalTrend {
        let a = &self.assumptions;
        if seasonal_index >= a.peak_index {
            SeasonalTrend::Peak
        } else if seasonal_index >= a.above_average_index {
            SeasonalTrend::AboveAverage
        } else if seasonal_index >= a.average_index {
            SeasonalTrend::Average
        } else if seasonal_index >= a.below_average_index {
            SeasonalTrend::BelowAverage
        } else {
            SeasonalTrend::Trough
        }
    }

    /// Twelve rows, January to December
    pub fn detect(&self, policies: &[Policy]) -> Vec<SeasonalityPattern> {
        let mut counts = [0usize; 12];
        let mut revenue = [0.0f64; 12];
        for policy in policies {
            let slot = policy.effective_date.month0() as usize;
            counts[slot] += 1;
            revenue[slot] += policy.annual_premium;
        }

        let monthly_average = policies.len() as f64 / 12.0;

        (0..12)
            .map(|slot| {
                let seasonal_index = if monthly_average > 0.0 {
                    counts[slot] as f64 / monthly_average
                } else {
                    1.0
                };
                let month = slot as u32 + 1;

                SeasonalityPattern {
                    month,
                    month_name: month_name(month).to_string(),
                    policies: counts[slot],
                    revenue: revenue[slot],
                    seasonal_index,
                    trend: self.classify(seasonal_index),
                }
            })
            .collect()
    }
}
