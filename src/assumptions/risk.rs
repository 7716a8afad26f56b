//! Chargeback risk scoring weights and level boundaries
//!
//! Every factor adds points independently; the total is capped at
//! [`MAX_RISK_SCORE`]. Progress fractions are months paid over advance months.

use serde::{Deserialize, Serialize};

pub const LOW_PROGRESS_THRESHOLD: f64 = 0.50;
pub const LOW_PROGRESS_POINTS: f64 = 40.0;
pub const PARTIAL_PROGRESS_THRESHOLD: f64 = 0.75;
pub const PARTIAL_PROGRESS_POINTS: f64 = 20.0;

pub const PENDING_POINTS: f64 = 30.0;
pub const LAPSED_POINTS: f64 = 60.0;
pub const CANCELLED_POINTS: f64 = 80.0;

pub const HIGH_UNEARNED_THRESHOLD: f64 = 5_000.0;
pub const HIGH_UNEARNED_POINTS: f64 = 20.0;
pub const MODERATE_UNEARNED_THRESHOLD: f64 = 2_000.0;
pub const MODERATE_UNEARNED_POINTS: f64 = 10.0;

/// A last payment more than this many months before the reference date is stale
pub const STALE_PAYMENT_MONTHS: i32 = 2;
pub const STALE_PAYMENT_POINTS: f64 = 15.0;

pub const CRITICAL_RISK_SCORE: f64 = 75.0;
pub const HIGH_RISK_SCORE: f64 = 50.0;
pub const MEDIUM_RISK_SCORE: f64 = 25.0;
pub const MAX_RISK_SCORE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssumptions {
    pub low_progress_threshold: f64,
    pub low_progress_points: f64,
    pub partial_progress_threshold: f64,
    pub partial_progress_points: f64,

    pub pending_points: f64,
    pub lapsed_points: f64,
    pub cancelled_points: f64,

    pub high_unearned_threshold: f64,
    pub high_unearned_points: f64,
    pub moderate_unearned_threshold: f64,
    pub moderate_unearned_points: f64,

    pub stale_payment_months: i32,
    pub stale_payment_points: f64,

    pub critical_score: f64,
    pub high_score: f64,
    pub medium_score: f64,
    pub max_score: f64,
}

impl Default for RiskAssumptions {
    fn default() -> Self {
        Self {
            low_progress_threshold: LOW_PROGRESS_THRESHOLD,
            low_progress_points: LOW_PROGRESS_POINTS,
            partial_progress_threshold: PARTIAL_PROGRESS_THRESHOLD,
            partial_progress_points: PARTIAL_PROGRESS_POINTS,
            pending_points: PENDING_POINTS,
            lapsed_points: LAPSED_POINTS,
            cancelled_points: CANCELLED_POINTS,
            high_unearned_threshold: HIGH_UNEARNED_THRESHOLD,
            high_unearned_points: HIGH_UNEARNED_POINTS,
            moderate_unearned_threshold: MODERATE_UNEARNED_THRESHOLD,
            moderate_unearned_points: MODERATE_UNEARNED_POINTS,
            stale_payment_months: STALE_PAYMENT_MONTHS,
            stale_payment_points: STALE_PAYMENT_POINTS,
            critical_score: CRITICAL_RISK_SCORE,
            high_score: HIGH_RISK_SCORE,
            medium_score: MEDIUM_RISK_SCORE,
            max_score: MAX_RISK_SCORE,
        }
    }
}
