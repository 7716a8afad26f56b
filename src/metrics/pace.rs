//! Pace metrics: what it takes to break even before the period closes
//!
//! This is the only place figures are scaled by time, and only forward.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::period::{time_remaining, TimePeriod};
use super::{ActualTotals, DerivedMetrics};

const DAYS_PER_WEEK: f64 = 7.0;
const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;
const WEEKS_PER_MONTH: f64 = 4.33;
const WEEKS_PER_YEAR: f64 = 52.0;
const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaceMetrics {
    /// Net income for the period; negative is a deficit
    pub surplus_deficit: f64,
    pub breakeven_needed: f64,
    pub policies_needed: u64,
    pub policies_per_day_needed: f64,
    pub daily_target: u64,
    pub weekly_target: u64,
    pub monthly_target: u64,
    pub breakeven_per_day: f64,
    pub breakeven_per_week: f64,
    pub breakeven_per_month: f64,
    pub days_remaining: i64,
    pub hours_remaining: i64,
}

impl PaceMetrics {
    pub fn calculate(totals: &ActualTotals, derived: &DerivedMetrics, period: TimePeriod, now: NaiveDateTime) -> Self {
        let surplus_deficit = totals.net_income;
        let breakeven_needed = if surplus_deficit < 0.0 { surplus_deficit.abs() } else { 0.0 };

        let per_policy = derived.avg_commission_per_policy;
        let policies_needed = if per_policy > 0.0 {
            (breakeven_needed / per_policy).ceil() as u64
        } else {
            0
        };

        let remaining = time_remaining(period, now);
        let mut pace = Self {
            surplus_deficit,
            breakeven_needed,
            policies_needed,
            days_remaining: remaining.days,
            hours_remaining: remaining.hours,
            ..Self::default()
        };

        if policies_needed == 0 {
            return pace;
        }

        let needed = policies_needed as f64;
        let b = breakeven_needed;
        pace.policies_per_day_needed = needed / remaining.effective_days();
        pace.daily_target = pace.policies_per_day_needed.ceil() as u64;

        match period {
            TimePeriod::Daily => {
                pace.daily_target = policies_needed;
                pace.breakeven_per_day = b;
                pace.breakeven_per_week = b * DAYS_PER_WEEK;
                pace.breakeven_per_month = b * DAYS_PER_MONTH;
            }
            TimePeriod::Weekly => {
                pace.weekly_target = policies_needed;
                pace.breakeven_per_week = b;
                pace.breakeven_per_day = b / DAYS_PER_WEEK;
                pace.breakeven_per_month = b * WEEKS_PER_MONTH;
            }
            TimePeriod::Monthly => {
                pace.weekly_target = (pace.policies_per_day_needed * DAYS_PER_WEEK).ceil() as u64;
                pace.monthly_target = policies_needed;
                pace.breakeven_per_month = b;
                pace.breakeven_per_week = b / WEEKS_PER_MONTH;
                pace.breakeven_per_day = b / DAYS_PER_MONTH;
            }
            // Only the daily pace applies to a partial month
            TimePeriod::MonthToDate => {}
            TimePeriod::Yearly => {
                let months_remaining = (MONTHS_PER_YEAR - now.month0() as f64).max(1.0);
                pace.weekly_target = (pace.policies_per_day_needed * DAYS_PER_WEEK).ceil() as u64;
                pace.monthly_target = (needed / months_remaining).ceil() as u64;
                pace.breakeven_per_month = b / MONTHS_PER_YEAR;
                pace.breakeven_per_week = b / WEEKS_PER_YEAR;
                pace.breakeven_per_day = b / DAYS_PER_YEAR;
            }
        }

        pace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::date;
    use approx::assert_relative_eq;
    use chrono::NaiveTime;

    fn deficit(net_income: f64, per_policy: f64) -> (ActualTotals, DerivedMetrics) {
        let totals = ActualTotals {
            net_income,
            ..ActualTotals::default()
        };
        let derived = DerivedMetrics {
            avg_commission_per_policy: per_policy,
            ..DerivedMetrics::default()
        };
        (totals, derived)
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn test_surplus_needs_nothing() {
        let (totals, derived) = deficit(2500.0, 500.0);
        let pace = PaceMetrics::calculate(&totals, &derived, TimePeriod::Monthly, noon(2025, 6, 15));
        assert_eq!(pace.policies_needed, 0);
        assert_eq!(pace.daily_target, 0);
        assert_relative_eq!(pace.breakeven_needed, 0.0);
        assert_eq!(pace.days_remaining, 15);
    }

    #[test]
    fn test_monthly_pace() {
        let (totals, derived) = deficit(-3100.0, 500.0);
        let pace = PaceMetrics::calculate(&totals, &derived, TimePeriod::Monthly, noon(2025, 6, 15));

        assert_eq!(pace.policies_needed, 7);
        // 15 days 11 hours remain
        let days = 15.0 + 11.0 / 24.0;
        assert_relative_eq!(pace.policies_per_day_needed, 7.0 / days);
        assert_eq!(pace.daily_target, 1);
        assert_eq!(pace.weekly_target, 4);
        assert_eq!(pace.monthly_target, 7);
        assert_relative_eq!(pace.breakeven_per_month, 3100.0);
        assert_relative_eq!(pace.breakeven_per_day, 3100.0 / 30.0);
    }

    #[test]
    fn test_month_to_date_sets_daily_pace_only() {
        let (totals, derived) = deficit(-3100.0, 500.0);
        let pace = PaceMetrics::calculate(&totals, &derived, TimePeriod::MonthToDate, noon(2025, 6, 15));

        assert_eq!(pace.policies_needed, 7);
        assert_eq!(pace.days_remaining, 15);
        assert_relative_eq!(pace.policies_per_day_needed, 7.0 / (15.0 + 11.0 / 24.0));
        assert_eq!(pace.daily_target, 1);
        assert_eq!(pace.weekly_target, 0);
        assert_eq!(pace.monthly_target, 0);
        assert_relative_eq!(pace.breakeven_per_day, 0.0);
        assert_relative_eq!(pace.breakeven_per_week, 0.0);
        assert_relative_eq!(pace.breakeven_per_month, 0.0);
    }

    #[test]
    fn test_daily_and_weekly_pace() {
        let (totals, derived) = deficit(-1000.0, 400.0);
        let daily = PaceMetrics::calculate(&totals, &derived, TimePeriod::Daily, noon(2025, 6, 15));
        assert_eq!(daily.daily_target, 3);
        assert_relative_eq!(daily.breakeven_per_week, 7000.0);

        let weekly = PaceMetrics::calculate(&totals, &derived, TimePeriod::Weekly, noon(2025, 6, 15));
        assert_eq!(weekly.days_remaining, 0);
        assert_relative_eq!(weekly.policies_per_day_needed, 3.0);
        assert_eq!(weekly.weekly_target, 3);
        assert_relative_eq!(weekly.breakeven_per_month, 4330.0);
    }

    #[test]
    fn test_yearly_pace_spreads_over_remaining_months() {
        let (totals, derived) = deficit(-10_000.0, 500.0);
        let pace = PaceMetrics::calculate(&totals, &derived, TimePeriod::Yearly, noon(2025, 10, 1));
        assert_eq!(pace.policies_needed, 20);
        // October leaves three months
        assert_eq!(pace.monthly_target, 7);
        assert_relative_eq!(pace.breakeven_per_week, 10_000.0 / 52.0);
    }
}
