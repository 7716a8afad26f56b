//! Chargeback risk scoring
//!
//! Each policy with a commission gets an additive heuristic score built from
//! independent factors: payment progress, policy status, unearned exposure,
//! and time since the last premium payment. Every factor that fires records a
//! reason string so the score can be explained to the agent.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assumptions::RiskAssumptions;
use crate::calendar::whole_months_between;
use crate::records::{Commission, CommissionIndex, Policy, PolicyStatus, UNKNOWN};

/// Severity band of a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// What the agent should do about a policy at this level
    pub fn recommended_action(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "Urgent: Contact client immediately to prevent lapse",
            RiskLevel::High => "High priority: Reach out to client this week",
            RiskLevel::Medium => "Follow up with client within 2 weeks",
            RiskLevel::Low => "Monitor normally",
        }
    }

    /// High or critical
    pub fn is_elevated(&self) -> bool {
        *self >= RiskLevel::High
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk assessment of one policy's advance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub policy_id: String,
    pub policy_number: String,
    pub client_name: String,
    /// 0 to 100, higher is riskier
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Reasons contributing to the score, in factor order
    pub factors: Vec<String>,
    pub months_paid: u32,
    pub unearned_amount: f64,
    pub recommended_action: String,
}

/// Scores chargeback risk for policies with an outstanding advance
#[derive(Debug, Clone, Default)]
pub struct ChargebackRiskScorer {
    assumptions: RiskAssumptions,
}

impl ChargebackRiskScorer {
    pub fn new(assumptions: RiskAssumptions) -> Self {
        Self { assumptions }
    }

    /// Map a raw score onto a level
    pub fn level_for(&self, score: f64) -> RiskLevel {
        let a = &self.assumptions;
        if score >= a.critical_score {
            RiskLevel::Critical
        } else if score >= a.high_score {
            RiskLevel::High
        } else if score >= a.medium_score {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Score every policy that has a commission, riskiest first
    ///
    /// Policies without a commission are skipped; a policy with several is
    /// scored on the last one listed. Ties keep input order.
    pub fn score(&self, policies: &[Policy], commissions: &[Commission], as_of: NaiveDate) -> Vec<RiskScore> {
        let index = CommissionIndex::build_latest(commissions);

        let mut scores: Vec<RiskScore> = policies
            .iter()
            .filter_map(|policy| {
                index
                    .for_policy(&policy.id)
                    .map(|commission| self.score_policy(policy, commission, as_of))
            })
            .collect();

        debug!("Scored {} of {} policies for chargeback risk", scores.len(), policies.len());

        scores.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        scores
    }

    /// Score a single policy against its commission
    pub fn score_policy(&self, policy: &Policy, commission: &Commission, as_of: NaiveDate) -> RiskScore {
        let a = &self.assumptions;
        let mut factors = Vec::new();
        let mut score = 0.0;

        // Payment progress
        let months_paid = commission.months_paid_or_zero();
        let advance_months = commission.advance_period();
        let progress = months_paid as f64 / advance_months as f64;
        if progress < a.low_progress_threshold {
            score += a.low_progress_points;
            factors.push(format!("Only {months_paid}/{advance_months} months paid"));
        } else if progress < a.partial_progress_threshold {
            score += a.partial_progress_points;
            factors.push(format!("{months_paid}/{advance_months} months paid"));
        }

        // Policy status
        match policy.status {
            PolicyStatus::Pending => {
                score += a.pending_points;
                factors.push("Policy still pending".to_string());
            }
            PolicyStatus::Lapsed => {
                score += a.lapsed_points;
                factors.push("Policy has lapsed".to_string());
            }
            PolicyStatus::Cancelled => {
                score += a.cancelled_points;
                factors.push("Policy cancelled".to_string());
            }
            PolicyStatus::Active | PolicyStatus::Matured => {}
        }

        // Unearned exposure
        let unearned = commission.unearned_or_zero();
        if unearned > a.high_unearned_threshold {
            score += a.high_unearned_points;
            factors.push(format!("High unearned amount: ${unearned:.0}"));
        } else if unearned > a.moderate_unearned_threshold {
            score += a.moderate_unearned_points;
            factors.push(format!("Moderate unearned amount: ${unearned:.0}"));
        }

        // Payment recency
        if let Some(last_payment) = commission.last_payment_date {
            let months_since = whole_months_between(as_of, last_payment);
            if months_since > a.stale_payment_months {
                score += a.stale_payment_points;
                factors.push(format!("{months_since} months since last payment"));
            }
        }

        let risk_level = self.level_for(score);

        RiskScore {
            policy_id: policy.id.clone(),
            policy_number: policy.policy_number.clone(),
            client_name: policy.client_name().unwrap_or(UNKNOWN).to_string(),
            risk_score: score.clamp(0.0, a.max_score),
            risk_level,
            factors,
            months_paid,
            unearned_amount: unearned,
            recommended_action: risk_level.recommended_action().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{as_of, commission, date, policy};
    use approx::assert_relative_eq;

    fn scorer() -> ChargebackRiskScorer {
        ChargebackRiskScorer::new(RiskAssumptions::default())
    }

    #[test]
    fn test_partial_progress_bracket() {
        let p = policy("P1", date(2025, 1, 15), PolicyStatus::Active);
        let c = commission("C1", "P1", 4750.0).with_progress(5, 2638.89, 2111.11);
        let result = scorer().score_policy(&p, &c, as_of());

        assert_relative_eq!(result.risk_score, 30.0);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(
            result.factors,
            vec!["5/9 months paid".to_string(), "Moderate unearned amount: $2111".to_string()]
        );
        assert_eq!(result.recommended_action, "Follow up with client within 2 weeks");
    }

    #[test]
    fn test_score_is_clamped() {
        let p = policy("P1", date(2025, 1, 15), PolicyStatus::Cancelled);
        let c = commission("C1", "P1", 9000.0)
            .with_progress(1, 1000.0, 8000.0)
            .with_last_payment(date(2025, 2, 1));
        let result = scorer().score_policy(&p, &c, as_of());

        // 40 + 80 + 20 + 15 before clamping
        assert_relative_eq!(result.risk_score, 100.0);
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert_eq!(result.factors.len(), 4);
        assert_eq!(result.factors[3], "4 months since last payment");
    }

    #[test]
    fn test_level_boundaries() {
        let s = scorer();
        assert_eq!(s.level_for(24.9), RiskLevel::Low);
        assert_eq!(s.level_for(25.0), RiskLevel::Medium);
        assert_eq!(s.level_for(50.0), RiskLevel::High);
        assert_eq!(s.level_for(75.0), RiskLevel::Critical);
        assert!(RiskLevel::High.is_elevated());
        assert!(!RiskLevel::Medium.is_elevated());
    }

    #[test]
    fn test_recent_payment_adds_nothing() {
        let p = policy("P1", date(2025, 1, 15), PolicyStatus::Active);
        let c = commission("C1", "P1", 900.0)
            .with_progress(8, 800.0, 100.0)
            .with_last_payment(date(2025, 4, 30));
        let result = scorer().score_policy(&p, &c, as_of());
        assert_relative_eq!(result.risk_score, 0.0);
        assert!(result.factors.is_empty());
        assert_eq!(result.recommended_action, "Monitor normally");
    }

    #[test]
    fn test_sorted_riskiest_first() {
        let policies = vec![
            policy("P1", date(2025, 1, 15), PolicyStatus::Active),
            policy("P2", date(2025, 1, 15), PolicyStatus::Lapsed),
            policy("P3", date(2025, 1, 15), PolicyStatus::Pending),
            policy("P4", date(2025, 1, 15), PolicyStatus::Active),
        ];
        let commissions = vec![
            commission("C1", "P1", 900.0).with_progress(9, 900.0, 0.0),
            commission("C2", "P2", 900.0).with_progress(9, 900.0, 0.0),
            commission("C3", "P3", 900.0).with_progress(9, 900.0, 0.0),
        ];
        let results = scorer().score(&policies, &commissions, as_of());

        let ids: Vec<&str> = results.iter().map(|r| r.policy_id.as_str()).collect();
        assert_eq!(ids, vec!["P2", "P3", "P1"]);
        assert_eq!(results[0].client_name, "Client P2");
    }

    #[test]
    fn test_last_commission_on_a_policy_is_scored() {
        let policies = vec![policy("P1", date(2025, 1, 15), PolicyStatus::Active)];
        let commissions = vec![
            commission("C-old", "P1", 900.0).with_progress(9, 900.0, 0.0),
            commission("C-new", "P1", 9000.0).with_progress(1, 1000.0, 8000.0),
        ];
        let results = scorer().score(&policies, &commissions, as_of());

        assert_eq!(results.len(), 1);
        assert_relative_eq!(results[0].risk_score, 60.0);
        assert_eq!(results[0].risk_level, RiskLevel::High);
        assert_relative_eq!(results[0].unearned_amount, 8000.0);
        assert_eq!(
            results[0].factors,
            vec!["Only 1/9 months paid".to_string(), "High unearned amount: $8000".to_string()]
        );
    }

    #[test]
    fn test_stale_payment_counts_whole_months() {
        let p = policy("P1", date(2025, 1, 15), PolicyStatus::Active);
        let base = commission("C1", "P1", 900.0).with_progress(8, 800.0, 100.0);
        let june_first = date(2025, 6, 1);

        let short = scorer().score_policy(&p, &base.clone().with_last_payment(date(2025, 3, 31)), june_first);
        assert_relative_eq!(short.risk_score, 0.0);
        assert!(short.factors.is_empty());

        let stale = scorer().score_policy(&p, &base.with_last_payment(date(2025, 3, 1)), june_first);
        assert_relative_eq!(stale.risk_score, 15.0);
        assert_eq!(stale.factors, vec!["3 months since last payment".to_string()]);
    }

    #[test]
    fn test_empty_input() {
        assert!(scorer().score(&[], &[], as_of()).is_empty());
    }
}
