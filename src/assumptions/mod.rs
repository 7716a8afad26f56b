//! Analytics assumptions: thresholds, windows, and multipliers for every analyzer

mod cohort;
mod risk;
mod forecast;
mod attribution;

pub use cohort::*;
pub use risk::*;
pub use forecast::*;
pub use attribution::*;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Container for all analytics assumptions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub cohort: CohortAssumptions,
    pub risk: RiskAssumptions,
    pub forecast: ForecastAssumptions,
    pub attribution: AttributionAssumptions,
}

impl Assumptions {
    /// Standard agency assumptions
    pub fn standard() -> Self {
        Self::default()
    }

    /// Load overrides from a JSON file; omitted fields keep their standard values
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let assumptions = serde_json::from_str(json)?;
        Ok(assumptions)
    }
}
