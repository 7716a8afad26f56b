//! Calendar-month helpers
//!
//! Month buckets are labelled `yyyy-MM` and compared by label, never by a
//! rolling 30-day window. Month differences are taken between those buckets,
//! except where a count of whole elapsed months is asked for.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Full month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Bucket key for a date, e.g. "2025-01"
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Display label for a month, e.g. "Jan 2025"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    add_months(month_start(date), 1) - Duration::days(1)
}

/// Shift a date by whole calendar months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Number of calendar months from `earlier` to `later` (negative when `later` precedes it)
///
/// Only the year and month take part: 2025-01-31 to 2025-02-01 is one month.
pub fn months_between(later: NaiveDate, earlier: NaiveDate) -> i32 {
    (later.year() - earlier.year()) * 12 + later.month() as i32 - earlier.month() as i32
}

/// Whole months elapsed from `earlier` to `later` (negative when `later` precedes it)
///
/// A month only counts once its day of month is reached again, or the
/// later date is the last day of a shorter month: 2025-03-31 to 2025-06-01
/// is two months, 2025-01-31 to 2025-02-28 is one.
pub fn whole_months_between(later: NaiveDate, earlier: NaiveDate) -> i32 {
    if later < earlier {
        return -whole_months_between(earlier, later);
    }
    let months = months_between(later, earlier);
    if later.day() < earlier.day() && later != month_end(later) {
        months - 1
    } else {
        months
    }
}

/// 00:00:00.000 on `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `date`
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Full month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("Unknown")
}
