//! Shared record builders for unit tests

use chrono::NaiveDate;

use crate::records::{ClientSnapshot, Commission, Policy, PolicyStatus, ProductType};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reference date used across tests
pub fn as_of() -> NaiveDate {
    date(2025, 6, 15)
}

/// $1,200/yr term policy at a 95% rate with carrier-1, client in TX
pub fn policy(id: &str, effective: NaiveDate, status: PolicyStatus) -> Policy {
    Policy::new(
        id,
        format!("POL-{id}"),
        status,
        effective,
        1200.0,
        0.95,
        "carrier-1",
        ProductType::TermLife,
    )
    .with_client(ClientSnapshot::new(format!("Client {id}"), Some("TX"), Some(45)))
}

/// Pending term-life advance on `policy_id`, created 2025-01-15
pub fn commission(id: &str, policy_id: &str, amount: f64) -> Commission {
    Commission::advance(id, policy_id, "carrier-1", ProductType::TermLife, amount, 0.95, date(2025, 1, 15))
}
