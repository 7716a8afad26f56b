//! Advance commission records

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::policy::{ClientSnapshot, ProductType, UNKNOWN};
use crate::calendar::start_of_day;
use crate::error::AnalyticsError;

/// Advance period used when a commission carries none
pub const DEFAULT_ADVANCE_MONTHS: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Pending,
    Paid,
}

impl CommissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionStatus::Pending => "pending",
            CommissionStatus::Paid => "paid",
        }
    }
}

impl FromStr for CommissionStatus {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(CommissionStatus::Pending),
            "paid" => Ok(CommissionStatus::Paid),
            _ => Err(AnalyticsError::UnknownVariant {
                kind: "commission status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An advance commission paid at issue and earned back month by month
///
/// `earned_amount + unearned_amount` is expected to be close to `amount`, and
/// `months_paid` should not exceed the advance period. Neither is enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commission {
    pub id: String,

    /// Policy this commission was paid on; resolved through a `PolicyIndex`
    #[serde(default)]
    pub policy_id: Option<String>,

    pub carrier_id: String,

    pub product: ProductType,

    /// Advance amount (lump sum paid at issue)
    pub amount: f64,

    /// Rate as a decimal (0.95 = 95%)
    pub commission_rate: f64,

    pub status: CommissionStatus,

    #[serde(default)]
    pub advance_months: Option<u32>,

    #[serde(default)]
    pub months_paid: Option<u32>,

    #[serde(default)]
    pub earned_amount: Option<f64>,

    #[serde(default)]
    pub unearned_amount: Option<f64>,

    #[serde(default)]
    pub chargeback_amount: Option<f64>,

    #[serde(default)]
    pub chargeback_date: Option<NaiveDate>,

    #[serde(default)]
    pub chargeback_reason: Option<String>,

    #[serde(default)]
    pub last_payment_date: Option<NaiveDate>,

    /// Date the carrier paid the advance
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub client: Option<ClientSnapshot>,
}

impl Commission {
    /// Create a pending advance with no earning progress, created on `created`
    pub fn advance(
        id: impl Into<String>,
        policy_id: impl Into<String>,
        carrier_id: impl Into<String>,
        product: ProductType,
        amount: f64,
        commission_rate: f64,
        created: NaiveDate,
    ) -> Self {
        let stamp = Utc.from_utc_datetime(&start_of_day(created));
        Self {
            id: id.into(),
            policy_id: Some(policy_id.into()),
            carrier_id: carrier_id.into(),
            product,
            amount,
            commission_rate,
            status: CommissionStatus::Pending,
            advance_months: Some(DEFAULT_ADVANCE_MONTHS),
            months_paid: Some(0),
            earned_amount: Some(0.0),
            unearned_amount: Some(amount),
            chargeback_amount: None,
            chargeback_date: None,
            chargeback_reason: None,
            last_payment_date: None,
            payment_date: None,
            created_at: stamp,
            updated_at: stamp,
            client: None,
        }
    }

    pub fn with_progress(mut self, months_paid: u32, earned: f64, unearned: f64) -> Self {
        self.months_paid = Some(months_paid);
        self.earned_amount = Some(earned);
        self.unearned_amount = Some(unearned);
        self
    }

    pub fn with_advance_months(mut self, months: u32) -> Self {
        self.advance_months = Some(months);
        self
    }

    pub fn with_chargeback(mut self, amount: f64, date: NaiveDate, reason: impl Into<String>) -> Self {
        self.chargeback_amount = Some(amount);
        self.chargeback_date = Some(date);
        self.chargeback_reason = Some(reason.into());
        self
    }

    pub fn with_last_payment(mut self, date: NaiveDate) -> Self {
        self.last_payment_date = Some(date);
        self
    }

    pub fn with_client(mut self, client: ClientSnapshot) -> Self {
        self.client = Some(client);
        self
    }

    pub fn paid_on(mut self, date: NaiveDate) -> Self {
        self.status = CommissionStatus::Paid;
        self.payment_date = Some(date);
        self
    }

    /// Advance period in months; missing or zero means [`DEFAULT_ADVANCE_MONTHS`]
    pub fn advance_period(&self) -> u32 {
        self.advance_months
            .filter(|&months| months > 0)
            .unwrap_or(DEFAULT_ADVANCE_MONTHS)
    }

    /// Months of premium paid so far; missing means 0
    pub fn months_paid_or_zero(&self) -> u32 {
        self.months_paid.unwrap_or(0)
    }

    /// Earned portion of the advance; missing means 0
    pub fn earned_or_zero(&self) -> f64 {
        self.earned_amount.unwrap_or(0.0)
    }

    /// Unearned portion still at risk; missing means 0
    pub fn unearned_or_zero(&self) -> f64 {
        self.unearned_amount.unwrap_or(0.0)
    }

    /// Amount clawed back; missing means 0
    pub fn chargeback_or_zero(&self) -> f64 {
        self.chargeback_amount.unwrap_or(0.0)
    }

    pub fn has_chargeback(&self) -> bool {
        self.chargeback_or_zero() > 0.0
    }

    /// Straight-line monthly earning of the advance
    pub fn monthly_earning(&self) -> f64 {
        self.amount / self.advance_period() as f64
    }

    pub fn is_paid(&self) -> bool {
        self.status == CommissionStatus::Paid
    }

    pub fn is_pending(&self) -> bool {
        self.status == CommissionStatus::Pending
    }

    /// Date used to place the commission in a reporting period:
    /// the payment date once paid, otherwise the creation date
    pub fn activity_date(&self) -> NaiveDate {
        match (self.status, self.payment_date) {
            (CommissionStatus::Paid, Some(paid)) => paid,
            _ => self.created_at.date_naive(),
        }
    }

    pub fn client_state(&self) -> &str {
        self.client
            .as_ref()
            .map(ClientSnapshot::state_or_unknown)
            .unwrap_or(UNKNOWN)
    }
}
