//! Cohort analyzer: retention, chargeback, and earning curves by effective month

use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::{BTreeMap, HashSet};

use crate::assumptions::CohortAssumptions;
use crate::calendar::{month_key, month_label, months_between};
use crate::records::{Commission, Policy, PolicyIndex, PolicyStatus};
use super::types::{
    CohortChargebacks, CohortEarningProgress, CohortReport, CohortRetention, CohortSummary,
};

/// Groups policies into effective-month cohorts and tracks them over elapsed months
#[derive(Debug, Clone, Default)]
pub struct CohortAnalyzer {
    assumptions: CohortAssumptions,
}

impl CohortAnalyzer {
    pub fn new(assumptions: CohortAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &CohortAssumptions {
        &self.assumptions
    }

    /// Last month index tracked for a cohort, or None when the cohort starts after `as_of`
    fn last_tracked_month(&self, cohort_start: NaiveDate, as_of: NaiveDate) -> Option<usize> {
        let elapsed = months_between(as_of, cohort_start);
        if elapsed < 0 {
            return None;
        }
        Some((elapsed as u32).min(self.assumptions.window_months) as usize)
    }

    /// Retention curves, newest cohort first
    ///
    /// An active policy counts as active at every month. A lapsed or cancelled
    /// policy counts only at months strictly before its status-change month.
    /// Pending and matured policies never count as active.
    pub fn retention(&self, policies: &[Policy], as_of: NaiveDate) -> Vec<CohortRetention> {
        let cohorts = group_by_cohort(policies.iter());
        debug!("Retention over {} policies in {} cohorts", policies.len(), cohorts.len());

        cohorts
            .into_iter()
            .rev()
            .map(|(cohort_start, members)| {
                let total = members.len();
                let months = self
                    .last_tracked_month(cohort_start, as_of)
                    .map_or(0, |last| last + 1);

                let mut row = CohortRetention {
                    cohort_month: month_key(cohort_start),
                    cohort_label: month_label(cohort_start),
                    total_policies: total,
                    retention_by_month: Vec::with_capacity(months),
                    active_count: Vec::with_capacity(months),
                    lapsed_count: Vec::with_capacity(months),
                    cancelled_count: Vec::with_capacity(months),
                };

                for elapsed in 0..months as i32 {
                    let mut active = 0;
                    let mut lapsed = 0;
                    let mut cancelled = 0;

                    for policy in &members {
                        match policy.status {
                            PolicyStatus::Active => active += 1,
                            PolicyStatus::Lapsed | PolicyStatus::Cancelled => {
                                let change = policy.status_change_month();
                                if change > elapsed {
                                    active += 1;
                                } else if change == elapsed {
                                    if policy.status == PolicyStatus::Lapsed {
                                        lapsed += 1;
                                    } else {
                                        cancelled += 1;
                                    }
                                }
                            }
                            _ => {}
                        }
                    }

                    row.active_count.push(active);
                    row.lapsed_count.push(lapsed);
                    row.cancelled_count.push(cancelled);
                    row.retention_by_month.push(percent(active as f64, total as f64));
                }

                row
            })
            .collect()
    }

    /// Chargeback totals per cohort, newest first
    ///
    /// Commissions are placed in the cohort of their policy; commissions with
    /// no resolvable policy are skipped.
    pub fn chargebacks(&self, policies: &[Policy], commissions: &[Commission]) -> Vec<CohortChargebacks> {
        let index = PolicyIndex::build(policies);
        let cohorts = group_commissions(&index, commissions);

        cohorts
            .into_iter()
            .rev()
            .map(|(cohort_start, members)| {
                let policy_ids: HashSet<&str> = members.iter().map(|(p, _)| p.id.as_str()).collect();
                let total_commission: f64 = members.iter().map(|(_, c)| c.amount).sum();

                let charged: Vec<_> = members.iter().filter(|(_, c)| c.has_chargeback()).collect();
                let chargeback_amount: f64 = charged.iter().map(|(_, c)| c.chargeback_or_zero()).sum();

                let mut chargebacks_by_month = BTreeMap::new();
                let mut total_months = 0i64;
                for (policy, commission) in &charged {
                    if let Some(charged_on) = commission.chargeback_date {
                        let months = months_between(charged_on, policy.effective_date);
                        total_months += months as i64;
                        *chargebacks_by_month.entry(months).or_insert(0) += 1;
                    }
                }

                // Averaged over every chargeback, dated or not
                let avg_months_to_chargeback = if charged.is_empty() {
                    0.0
                } else {
                    total_months as f64 / charged.len() as f64
                };

                CohortChargebacks {
                    cohort_month: month_key(cohort_start),
                    cohort_label: month_label(cohort_start),
                    total_policies: policy_ids.len(),
                    total_commission,
                    chargeback_amount,
                    chargeback_rate: percent(chargeback_amount, total_commission),
                    avg_months_to_chargeback,
                    chargebacks_by_month,
                }
            })
            .collect()
    }

    /// Straight-line earning progress per cohort, newest first
    ///
    /// At month m a commission contributes `amount / advance_months × m` when it
    /// has at least m months paid, and nothing otherwise.
    pub fn earning_progress(
        &self,
        policies: &[Policy],
        commissions: &[Commission],
        as_of: NaiveDate,
    ) -> Vec<CohortEarningProgress> {
        let index = PolicyIndex::build(policies);
        let cohorts = group_commissions(&index, commissions);

        cohorts
            .into_iter()
            .rev()
            .map(|(cohort_start, members)| {
                let total_advance: f64 = members.iter().map(|(_, c)| c.amount).sum();
                let total_earned: f64 = members.iter().map(|(_, c)| c.earned_or_zero()).sum();
                let total_unearned: f64 = members.iter().map(|(_, c)| c.unearned_or_zero()).sum();

                let months = self
                    .last_tracked_month(cohort_start, as_of)
                    .map_or(0, |last| last + 1);

                let progress_by_month = (0..months as u32)
                    .map(|elapsed| {
                        let earned: f64 = members
                            .iter()
                            .map(|(_, c)| {
                                let paid = c.months_paid_or_zero();
                                if paid >= elapsed {
                                    c.monthly_earning() * elapsed.min(paid) as f64
                                } else {
                                    0.0
                                }
                            })
                            .sum();
                        percent(earned, total_advance)
                    })
                    .collect();

                CohortEarningProgress {
                    cohort_month: month_key(cohort_start),
                    cohort_label: month_label(cohort_start),
                    total_advance,
                    total_earned,
                    total_unearned,
                    earning_rate: percent(total_earned, total_advance),
                    progress_by_month,
                }
            })
            .collect()
    }

    /// Averages and best/worst cohorts across the three cohort views
    pub fn summary(
        &self,
        retention: &[CohortRetention],
        chargebacks: &[CohortChargebacks],
        earning: &[CohortEarningProgress],
    ) -> CohortSummary {
        let milestone = self.assumptions.milestone_month;

        let reached: Vec<f64> = retention.iter().filter_map(|c| c.retention_at(milestone)).collect();
        let avg_milestone_retention = mean(&reached);

        let rates: Vec<f64> = chargebacks.iter().map(|c| c.chargeback_rate).collect();
        let earning_rates: Vec<f64> = earning.iter().map(|c| c.earning_rate).collect();

        // Cohorts not yet at the milestone rank as 0%; ties keep the newer cohort
        let at_milestone = |c: &CohortRetention| c.retention_at(milestone).unwrap_or(0.0);
        let mut best: Option<&CohortRetention> = None;
        let mut worst: Option<&CohortRetention> = None;
        for cohort in retention {
            if best.map_or(true, |b| at_milestone(cohort) > at_milestone(b)) {
                best = Some(cohort);
            }
            if worst.map_or(true, |w| at_milestone(cohort) < at_milestone(w)) {
                worst = Some(cohort);
            }
        }

        CohortSummary {
            total_cohorts: retention.len(),
            avg_milestone_retention,
            avg_chargeback_rate: mean(&rates),
            avg_earning_rate: mean(&earning_rates),
            best_cohort: best.map(|c| c.cohort_label.clone()),
            worst_cohort: worst.map(|c| c.cohort_label.clone()),
        }
    }

    /// Run every cohort view and summarise them
    pub fn analyze(&self, policies: &[Policy], commissions: &[Commission], as_of: NaiveDate) -> CohortReport {
        let retention = self.retention(policies, as_of);
        let chargebacks = self.chargebacks(policies, commissions);
        let earning = self.earning_progress(policies, commissions, as_of);
        let summary = self.summary(&retention, &chargebacks, &earning);

        CohortReport {
            retention,
            chargebacks,
            earning,
            summary,
        }
    }
}

/// Policies keyed by the first day of their effective month, oldest first
fn group_by_cohort<'a>(policies: impl Iterator<Item = &'a Policy>) -> BTreeMap<NaiveDate, Vec<&'a Policy>> {
    let mut cohorts: BTreeMap<NaiveDate, Vec<&Policy>> = BTreeMap::new();
    for policy in policies {
        cohorts.entry(policy.cohort_month()).or_default().push(policy);
    }
    cohorts
}

/// Commissions paired with their policy, keyed by the policy's cohort month
fn group_commissions<'a>(
    index: &PolicyIndex<'a>,
    commissions: &'a [Commission],
) -> BTreeMap<NaiveDate, Vec<(&'a Policy, &'a Commission)>> {
    let mut cohorts: BTreeMap<NaiveDate, Vec<_>> = BTreeMap::new();
    for commission in commissions {
        let Some(policy_id) = commission.policy_id.as_deref() else {
            continue;
        };
        match index.get(policy_id) {
            Some(policy) => cohorts.entry(policy.cohort_month()).or_default().push((policy, commission)),
            None => warn!("Commission {} references unknown policy {}", commission.id, policy_id),
        }
    }
    cohorts
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len().max(1) as f64
}
