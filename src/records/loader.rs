//! Load records from CSV exports
//!
//! Dates are ISO-8601 (`2025-01-15`); timestamps may be RFC 3339 or a plain date.
//! Unparseable dates are rejected here so the analyzers only ever see valid values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::Reader;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::{Carrier, ClientSnapshot, Commission, Expense, Policy};
use crate::calendar::start_of_day;
use crate::error::{AnalyticsError, Result};

/// Raw CSV row of a policy export
#[derive(Debug, Deserialize)]
struct PolicyRow {
    id: String,
    policy_number: String,
    status: String,
    effective_date: String,
    term_length: Option<u32>,
    annual_premium: f64,
    commission_percentage: f64,
    carrier_id: String,
    product: String,
    client_name: Option<String>,
    client_state: Option<String>,
    client_age: Option<u32>,
    created_at: String,
    updated_at: String,
}

impl PolicyRow {
    fn into_policy(self) -> Result<Policy> {
        let client = client_snapshot(self.client_name, self.client_state, self.client_age);
        Ok(Policy {
            status: self.status.parse()?,
            effective_date: parse_date("effective_date", &self.effective_date)?,
            product: self.product.parse()?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
            id: self.id,
            policy_number: self.policy_number,
            term_length: self.term_length,
            annual_premium: self.annual_premium,
            commission_percentage: self.commission_percentage,
            carrier_id: self.carrier_id,
            client,
        })
    }
}

/// Raw CSV row of a commission export
#[derive(Debug, Deserialize)]
struct CommissionRow {
    id: String,
    policy_id: Option<String>,
    carrier_id: String,
    product: String,
    amount: f64,
    commission_rate: f64,
    status: String,
    advance_months: Option<u32>,
    months_paid: Option<u32>,
    earned_amount: Option<f64>,
    unearned_amount: Option<f64>,
    chargeback_amount: Option<f64>,
    chargeback_date: Option<String>,
    chargeback_reason: Option<String>,
    last_payment_date: Option<String>,
    payment_date: Option<String>,
    created_at: String,
    updated_at: String,
    client_name: Option<String>,
    client_state: Option<String>,
    client_age: Option<u32>,
}

impl CommissionRow {
    fn into_commission(self) -> Result<Commission> {
        let client = client_snapshot(self.client_name, self.client_state, self.client_age);
        Ok(Commission {
            product: self.product.parse()?,
            status: self.status.parse()?,
            chargeback_date: parse_optional_date("chargeback_date", self.chargeback_date)?,
            last_payment_date: parse_optional_date("last_payment_date", self.last_payment_date)?,
            payment_date: parse_optional_date("payment_date", self.payment_date)?,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
            id: self.id,
            policy_id: non_blank(self.policy_id),
            carrier_id: self.carrier_id,
            amount: self.amount,
            commission_rate: self.commission_rate,
            advance_months: self.advance_months,
            months_paid: self.months_paid,
            earned_amount: self.earned_amount,
            unearned_amount: self.unearned_amount,
            chargeback_amount: self.chargeback_amount,
            chargeback_reason: non_blank(self.chargeback_reason),
            client,
        })
    }
}

/// Raw CSV row of an expense export
#[derive(Debug, Deserialize)]
struct ExpenseRow {
    id: String,
    name: String,
    amount: f64,
    category: Option<String>,
    date: String,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default)]
    is_tax_deductible: bool,
}

impl ExpenseRow {
    fn into_expense(self) -> Result<Expense> {
        Ok(Expense {
            date: parse_date("date", &self.date)?,
            id: self.id,
            name: self.name,
            amount: self.amount,
            category: non_blank(self.category),
            is_recurring: self.is_recurring,
            is_tax_deductible: self.is_tax_deductible,
        })
    }
}

/// Load policies from a CSV file
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<Policy>> {
    let rows: Vec<PolicyRow> = read_rows(Reader::from_path(path)?)?;
    rows.into_iter().map(PolicyRow::into_policy).collect()
}

/// Load policies from any reader (e.g., string buffer, network stream)
pub fn load_policies_from_reader<R: Read>(reader: R) -> Result<Vec<Policy>> {
    let rows: Vec<PolicyRow> = read_rows(Reader::from_reader(reader))?;
    rows.into_iter().map(PolicyRow::into_policy).collect()
}

/// Load commissions from a CSV file
pub fn load_commissions<P: AsRef<Path>>(path: P) -> Result<Vec<Commission>> {
    let rows: Vec<CommissionRow> = read_rows(Reader::from_path(path)?)?;
    rows.into_iter().map(CommissionRow::into_commission).collect()
}

pub fn load_commissions_from_reader<R: Read>(reader: R) -> Result<Vec<Commission>> {
    let rows: Vec<CommissionRow> = read_rows(Reader::from_reader(reader))?;
    rows.into_iter().map(CommissionRow::into_commission).collect()
}

/// Load expenses from a CSV file
pub fn load_expenses<P: AsRef<Path>>(path: P) -> Result<Vec<Expense>> {
    let rows: Vec<ExpenseRow> = read_rows(Reader::from_path(path)?)?;
    rows.into_iter().map(ExpenseRow::into_expense).collect()
}

pub fn load_expenses_from_reader<R: Read>(reader: R) -> Result<Vec<Expense>> {
    let rows: Vec<ExpenseRow> = read_rows(Reader::from_reader(reader))?;
    rows.into_iter().map(ExpenseRow::into_expense).collect()
}

/// Load the carrier directory (`id,name`) from a CSV file
pub fn load_carriers<P: AsRef<Path>>(path: P) -> Result<Vec<Carrier>> {
    read_rows(Reader::from_path(path)?)
}

fn read_rows<R: Read, T: DeserializeOwned>(mut reader: Reader<R>) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn client_snapshot(
    name: Option<String>,
    state: Option<String>,
    age: Option<u32>,
) -> Option<ClientSnapshot> {
    let name = non_blank(name)?;
    Some(ClientSnapshot {
        name,
        state: non_blank(state),
        age,
    })
}

/// Parse an ISO-8601 calendar date; a timestamp's date part is accepted too
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| AnalyticsError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_optional_date(field: &'static str, value: Option<String>) -> Result<Option<NaiveDate>> {
    non_blank(value).map(|v| parse_date(field, &v)).transpose()
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DD[T ]HH:MM:SS` (taken as UTC), or a bare date
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| Utc.from_utc_datetime(&start_of_day(date)))
        .map_err(|_| AnalyticsError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CommissionStatus, PolicyStatus, ProductType};
    use chrono::{Datelike, Timelike};

    const POLICIES: &str = "\
id,policy_number,status,effective_date,term_length,annual_premium,commission_percentage,carrier_id,product,client_name,client_state,client_age,created_at,updated_at
P1,POL-001,active,2025-01-15,20,1200,0.95,carrier-1,term_life,John Doe,CA,45,2025-01-15T10:30:00Z,2025-01-15T10:30:00Z
P2,POL-002,lapsed,2025-01-20,,2400.50,0.8,carrier-2,whole_life,,,,2025-01-20,2025-05-15 08:00:00
";

    const COMMISSIONS: &str = "\
id,policy_id,carrier_id,product,amount,commission_rate,status,advance_months,months_paid,earned_amount,unearned_amount,chargeback_amount,chargeback_date,chargeback_reason,last_payment_date,payment_date,created_at,updated_at,client_name,client_state,client_age
C1,P1,carrier-1,term_life,4750,0.95,paid,9,5,2638.89,2111.11,,,,2025-05-01,2025-01-20,2025-01-15,2025-05-01,John Doe,CA,45
C2,,carrier-2,whole_life,1920,0.8,pending,,,,,500,2025-05-20,lapse,,,2025-01-20,2025-05-20,,,
";

    #[test]
    fn test_load_policies_from_reader() {
        let policies = load_policies_from_reader(POLICIES.as_bytes()).unwrap();
        assert_eq!(policies.len(), 2);

        let p1 = &policies[0];
        assert_eq!(p1.status, PolicyStatus::Active);
        assert_eq!(p1.term_length, Some(20));
        assert_eq!(p1.client_name(), Some("John Doe"));
        assert_eq!(p1.created_at.hour(), 10);

        let p2 = &policies[1];
        assert_eq!(p2.product, ProductType::WholeLife);
        assert_eq!(p2.term_length, None);
        assert!(p2.client.is_none());
        assert_eq!(p2.updated_at.date_naive().month(), 5);
        assert_eq!(p2.status_change_month(), 4);
    }

    #[test]
    fn test_load_commissions_from_reader() {
        let commissions = load_commissions_from_reader(COMMISSIONS.as_bytes()).unwrap();
        assert_eq!(commissions.len(), 2);

        let c1 = &commissions[0];
        assert_eq!(c1.status, CommissionStatus::Paid);
        assert_eq!(c1.months_paid_or_zero(), 5);
        assert_eq!(c1.payment_date, NaiveDate::from_ymd_opt(2025, 1, 20));
        assert_eq!(c1.client_state(), "CA");

        let c2 = &commissions[1];
        assert!(c2.policy_id.is_none());
        assert_eq!(c2.advance_period(), 9);
        assert!(c2.has_chargeback());
        assert_eq!(c2.chargeback_reason.as_deref(), Some("lapse"));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let csv = POLICIES.replace("2025-01-15,20", "2025-13-45,20");
        let err = load_policies_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDate { field: "effective_date", .. }));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let csv = POLICIES.replace("P1,POL-001,active", "P1,POL-001,dormant");
        let err = load_policies_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownVariant { kind: "policy status", .. }));
    }

    #[test]
    fn test_load_expenses_from_reader() {
        let csv = "\
id,name,amount,category,date,is_recurring,is_tax_deductible
E1,CRM subscription,99,Software,2025-06-01,true,true
E2,Lunch,45.5,,2025-06-03,false,false
";
        let expenses = load_expenses_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 2);
        assert!(expenses[0].is_recurring);
        assert_eq!(expenses[1].category_or_default(), "Uncategorized");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("t", "2025-05-15T08:00:00-05:00").unwrap();
        assert_eq!(rfc.hour(), 13);
        let naive = parse_timestamp("t", "2025-05-15T08:00:00.250").unwrap();
        assert_eq!(naive.hour(), 8);
        let bare = parse_timestamp("t", "2025-05-15").unwrap();
        assert_eq!(bare.hour(), 0);
        assert!(parse_timestamp("t", "yesterday").is_err());
    }
}
