//! Policy records as supplied by the data-access layer

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::{month_start, months_between, start_of_day};
use crate::error::AnalyticsError;

/// Lifecycle status of a policy
///
/// Transitions run pending -> active -> {lapsed, cancelled, matured}; the last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Pending,
    Active,
    Lapsed,
    Cancelled,
    Matured,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "pending",
            PolicyStatus::Active => "active",
            PolicyStatus::Lapsed => "lapsed",
            PolicyStatus::Cancelled => "cancelled",
            PolicyStatus::Matured => "matured",
        }
    }

    /// Lapsed or cancelled, i.e. ended before maturity
    pub fn is_terminated(&self) -> bool {
        matches!(self, PolicyStatus::Lapsed | PolicyStatus::Cancelled)
    }
}

impl FromStr for PolicyStatus {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PolicyStatus::Pending),
            "active" => Ok(PolicyStatus::Active),
            "lapsed" => Ok(PolicyStatus::Lapsed),
            "cancelled" | "canceled" => Ok(PolicyStatus::Cancelled),
            "matured" => Ok(PolicyStatus::Matured),
            _ => Err(AnalyticsError::UnknownVariant {
                kind: "policy status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product line written under a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    TermLife,
    WholeLife,
    UniversalLife,
    VariableLife,
    Health,
    Disability,
    Annuity,
    IndexedUniversalLife,
    ParticipatingWholeLife,
}

impl ProductType {
    /// Database label, e.g. "term_life"
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::TermLife => "term_life",
            ProductType::WholeLife => "whole_life",
            ProductType::UniversalLife => "universal_life",
            ProductType::VariableLife => "variable_life",
            ProductType::Health => "health",
            ProductType::Disability => "disability",
            ProductType::Annuity => "annuity",
            ProductType::IndexedUniversalLife => "indexed_universal_life",
            ProductType::ParticipatingWholeLife => "participating_whole_life",
        }
    }

    /// Human-readable name, e.g. "Term Life"
    pub fn display_name(&self) -> &'static str {
        match self {
            ProductType::TermLife => "Term Life",
            ProductType::WholeLife => "Whole Life",
            ProductType::UniversalLife => "Universal Life",
            ProductType::VariableLife => "Variable Life",
            ProductType::Health => "Health",
            ProductType::Disability => "Disability",
            ProductType::Annuity => "Annuity",
            ProductType::IndexedUniversalLife => "Indexed Universal Life",
            ProductType::ParticipatingWholeLife => "Participating Whole Life",
        }
    }
}

impl FromStr for ProductType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "term_life" | "term" => Ok(ProductType::TermLife),
            "whole_life" => Ok(ProductType::WholeLife),
            "universal_life" => Ok(ProductType::UniversalLife),
            "variable_life" => Ok(ProductType::VariableLife),
            "health" => Ok(ProductType::Health),
            "disability" => Ok(ProductType::Disability),
            "annuity" => Ok(ProductType::Annuity),
            "indexed_universal_life" => Ok(ProductType::IndexedUniversalLife),
            "participating_whole_life" => Ok(ProductType::ParticipatingWholeLife),
            _ => Err(AnalyticsError::UnknownVariant {
                kind: "product type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Client details captured on the policy at time of writing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub name: String,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub age: Option<u32>,
}

impl ClientSnapshot {
    pub fn new(name: impl Into<String>, state: Option<&str>, age: Option<u32>) -> Self {
        Self {
            name: name.into(),
            state: state.map(str::to_string),
            age,
        }
    }

    /// Client name when non-blank; blank names do not identify a client
    pub fn key(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Residence state, "Unknown" when missing
    pub fn state_or_unknown(&self) -> &str {
        self.state
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN)
    }
}

/// Placeholder for missing names and states
pub const UNKNOWN: &str = "Unknown";

/// A single policy record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Unique policy identifier
    pub id: String,

    /// Carrier-issued policy number
    pub policy_number: String,

    pub status: PolicyStatus,

    /// Date coverage began; defines the policy's cohort
    pub effective_date: NaiveDate,

    /// Term in years (None for permanent products)
    #[serde(default)]
    pub term_length: Option<u32>,

    pub annual_premium: f64,

    /// Commission rate as a decimal (0.95 = 95%)
    pub commission_percentage: f64,

    pub carrier_id: String,

    pub product: ProductType,

    #[serde(default)]
    pub client: Option<ClientSnapshot>,

    pub created_at: DateTime<Utc>,

    /// Time of the most recent status change
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Create a policy whose timestamps both sit at midnight on the effective date
    pub fn new(
        id: impl Into<String>,
        policy_number: impl Into<String>,
        status: PolicyStatus,
        effective_date: NaiveDate,
        annual_premium: f64,
        commission_percentage: f64,
        carrier_id: impl Into<String>,
        product: ProductType,
    ) -> Self {
        let stamp = Utc.from_utc_datetime(&start_of_day(effective_date));
        Self {
            id: id.into(),
            policy_number: policy_number.into(),
            status,
            effective_date,
            term_length: None,
            annual_premium,
            commission_percentage,
            carrier_id: carrier_id.into(),
            product,
            client: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    pub fn with_client(mut self, client: ClientSnapshot) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_term_length(mut self, years: u32) -> Self {
        self.term_length = Some(years);
        self
    }

    /// Record the status change as happening on `date`
    pub fn updated_on(mut self, date: NaiveDate) -> Self {
        self.updated_at = Utc.from_utc_datetime(&start_of_day(date));
        self
    }

    /// First day of the policy's cohort month
    pub fn cohort_month(&self) -> NaiveDate {
        month_start(self.effective_date)
    }

    /// Months from the effective date to the last status change
    ///
    /// `updated_at` is the only record of when a status changed, so this is
    /// exact only when nothing else touched the policy afterwards.
    pub fn status_change_month(&self) -> i32 {
        months_between(self.updated_at.date_naive(), self.effective_date)
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client.as_ref().and_then(ClientSnapshot::key)
    }

    pub fn client_state(&self) -> &str {
        self.client
            .as_ref()
            .map(ClientSnapshot::state_or_unknown)
            .unwrap_or(UNKNOWN)
    }

    /// Expected first-year commission (premium × rate)
    pub fn commissionable_value(&self) -> f64 {
        self.annual_premium * self.commission_percentage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Active".parse::<PolicyStatus>().unwrap(), PolicyStatus::Active);
        assert_eq!("canceled".parse::<PolicyStatus>().unwrap(), PolicyStatus::Cancelled);
        assert!("open".parse::<PolicyStatus>().is_err());
        assert!(PolicyStatus::Lapsed.is_terminated());
        assert!(!PolicyStatus::Matured.is_terminated());
    }

    #[test]
    fn test_product_names() {
        let product: ProductType = "indexed_universal_life".parse().unwrap();
        assert_eq!(product.display_name(), "Indexed Universal Life");
        assert_eq!(product.as_str(), "indexed_universal_life");
        assert!("pet_insurance".parse::<ProductType>().is_err());
    }

    #[test]
    fn test_status_change_month() {
        let policy = Policy::new(
            "P2", "POL-002", PolicyStatus::Lapsed, d(2025, 1, 20),
            1200.0, 0.95, "carrier-1", ProductType::TermLife,
        )
        .updated_on(d(2025, 5, 15));

        assert_eq!(policy.cohort_month(), d(2025, 1, 1));
        assert_eq!(policy.status_change_month(), 4);
    }

    #[test]
    fn test_client_fallbacks() {
        let policy = Policy::new(
            "P1", "POL-001", PolicyStatus::Active, d(2025, 1, 15),
            1000.0, 0.8, "carrier-1", ProductType::WholeLife,
        );
        assert_eq!(policy.client_name(), None);
        assert_eq!(policy.client_state(), "Unknown");

        let policy = policy.with_client(ClientSnapshot::new("  ", Some(""), Some(40)));
        assert_eq!(policy.client_name(), None);
        assert_eq!(policy.client_state(), "Unknown");
        assert!((policy.commissionable_value() - 800.0).abs() < 1e-9);
    }
}
