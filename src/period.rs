//! Reporting periods, their date ranges, and record filtering
//!
//! Ranges are inclusive on both ends. The weekly window is the seven days up to
//! the reference instant; the other periods follow calendar boundaries.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::{add_months, end_of_day, month_end, month_start, start_of_day};
use crate::error::AnalyticsError;
use crate::records::{Commission, Expense, Policy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "MTD")]
    MonthToDate,
    #[serde(rename = "yearly")]
    Yearly,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Daily => "daily",
            TimePeriod::Weekly => "weekly",
            TimePeriod::Monthly => "monthly",
            TimePeriod::MonthToDate => "MTD",
            TimePeriod::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::Daily => "Daily",
            TimePeriod::Weekly => "Weekly",
            TimePeriod::Monthly => "Monthly",
            TimePeriod::MonthToDate => "Month to Date",
            TimePeriod::Yearly => "Yearly",
        }
    }
}

impl FromStr for TimePeriod {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(TimePeriod::Daily),
            "weekly" | "week" => Ok(TimePeriod::Weekly),
            "monthly" | "month" => Ok(TimePeriod::Monthly),
            "mtd" => Ok(TimePeriod::MonthToDate),
            "yearly" | "year" => Ok(TimePeriod::Yearly),
            _ => Err(AnalyticsError::UnknownVariant {
                kind: "time period",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date-time range of a reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Range of `period` around `now`, shifted by `offset` periods (0 = current, -1 = previous)
    pub fn for_period(period: TimePeriod, now: NaiveDateTime, offset: i32) -> Self {
        let today = now.date();
        match period {
            TimePeriod::Daily => {
                let day = today + Duration::days(offset as i64);
                Self::new(start_of_day(day), end_of_day(day))
            }
            TimePeriod::Weekly => {
                let reference = now + Duration::days(7 * offset as i64);
                let start = start_of_day((reference - Duration::days(7)).date());
                Self::new(start, reference)
            }
            TimePeriod::Monthly => {
                let reference = add_months(today, offset);
                Self::new(start_of_day(month_start(reference)), end_of_day(month_end(reference)))
            }
            TimePeriod::MonthToDate => {
                let reference = add_months(today, offset);
                let end = if offset == 0 { today } else { month_end(reference) };
                Self::new(start_of_day(month_start(reference)), end_of_day(end))
            }
            TimePeriod::Yearly => {
                let year = today.year() + offset;
                let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today);
                let last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(today);
                Self::new(start_of_day(first), end_of_day(last))
            }
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// A calendar date counts from its midnight
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(start_of_day(date))
    }
}

/// Whole days and hours left before a period closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
}

impl TimeRemaining {
    /// Fractional days remaining, never less than one
    pub fn effective_days(&self) -> f64 {
        (self.days as f64 + self.hours as f64 / 24.0).max(1.0)
    }
}

/// Time left in the current `period` as of `now`
///
/// The weekly window ends at `now`, so nothing remains in it.
pub fn time_remaining(period: TimePeriod, now: NaiveDateTime) -> TimeRemaining {
    let today = now.date();
    let end = match period {
        TimePeriod::Daily => end_of_day(today),
        TimePeriod::Weekly => now,
        TimePeriod::Monthly | TimePeriod::MonthToDate => end_of_day(month_end(today)),
        TimePeriod::Yearly => {
            end_of_day(NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today))
        }
    };

    const MS_PER_HOUR: i64 = 60 * 60 * 1000;
    const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

    let remaining = (end - now).num_milliseconds().max(0);
    TimeRemaining {
        days: remaining / MS_PER_DAY,
        hours: (remaining % MS_PER_DAY) / MS_PER_HOUR,
    }
}

/// Policies whose effective date falls in the range
pub fn policies_in_range(policies: &[Policy], range: &DateRange) -> Vec<Policy> {
    policies
        .iter()
        .filter(|p| range.contains_date(p.effective_date))
        .cloned()
        .collect()
}

/// Commissions placed in the range by payment date (paid) or creation date
pub fn commissions_in_range(commissions: &[Commission], range: &DateRange) -> Vec<Commission> {
    commissions
        .iter()
        .filter(|c| range.contains_date(c.activity_date()))
        .cloned()
        .collect()
}

pub fn expenses_in_range(expenses: &[Expense], range: &DateRange) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| range.contains_date(e.date))
        .cloned()
        .collect()
}
