//! Analytics runner for report and dashboard batches
//!
//! Holds assumptions loaded once and builds the analyzers from them per call.
//! Independent dashboard requests fan out across threads.

use chrono::NaiveDateTime;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::assumptions::Assumptions;
use crate::attribution::{AttributionDecomposer, AttributionReport, PeriodRecords};
use crate::cohort::{CohortAnalyzer, CohortReport, CohortSummary};
use crate::error::Result;
use crate::forecast::{
    ForecastReport, ForecastSummary, GrowthProjector, RenewalForecaster, SeasonalityDetector,
};
use crate::metrics::{DashboardMetrics, MetricsAggregator};
use crate::period::{commissions_in_range, policies_in_range, DateRange, TimePeriod};
use crate::records::{Carrier, Commission, Expense, Policy};
use crate::risk::{ChargebackRiskScorer, RiskScore};

/// Read-only view of an agency's records
#[derive(Debug, Clone, Copy, Default)]
pub struct AgencySnapshot<'a> {
    pub policies: &'a [Policy],
    pub commissions: &'a [Commission],
    pub expenses: &'a [Expense],
    pub carriers: &'a [Carrier],
}

impl<'a> AgencySnapshot<'a> {
    pub fn new(policies: &'a [Policy], commissions: &'a [Commission]) -> Self {
        Self {
            policies,
            commissions,
            ..Self::default()
        }
    }

    pub fn with_expenses(mut self, expenses: &'a [Expense]) -> Self {
        self.expenses = expenses;
        self
    }

    pub fn with_carriers(mut self, carriers: &'a [Carrier]) -> Self {
        self.carriers = carriers;
        self
    }
}

/// One dashboard to compute: a period kind, its offset, and the reference instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub time_period: TimePeriod,
    pub now: NaiveDateTime,
    /// 0 = current period, -1 = previous, ...
    #[serde(default)]
    pub offset: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub metrics: DashboardMetrics,
    pub cohorts: CohortSummary,
    pub forecast: ForecastSummary,
}

#[derive(Debug, Clone)]
pub struct AnalyticsRunner {
    assumptions: Assumptions,
}

impl AnalyticsRunner {
    /// Runner with standard assumptions
    pub fn new() -> Self {
        Self {
            assumptions: Assumptions::standard(),
        }
    }

    /// Runner with assumptions overridden from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            assumptions: Assumptions::from_json_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn cohort_analyzer(&self) -> CohortAnalyzer {
        CohortAnalyzer::new(self.assumptions.cohort.clone())
    }

    pub fn risk_scorer(&self) -> ChargebackRiskScorer {
        ChargebackRiskScorer::new(self.assumptions.risk.clone())
    }

    pub fn attribution(&self) -> AttributionDecomposer {
        AttributionDecomposer::new(self.assumptions.attribution.clone())
    }

    pub fn cohort_report(&self, snapshot: AgencySnapshot<'_>, now: NaiveDateTime) -> CohortReport {
        self.cohort_analyzer()
            .analyze(snapshot.policies, snapshot.commissions, now.date())
    }

    pub fn risk_scores(&self, snapshot: AgencySnapshot<'_>, now: NaiveDateTime) -> Vec<RiskScore> {
        self.risk_scorer()
            .score(snapshot.policies, snapshot.commissions, now.date())
    }

    pub fn forecast_report(&self, snapshot: AgencySnapshot<'_>, now: NaiveDateTime) -> ForecastReport {
        let as_of = now.date();
        let forecast = &self.assumptions.forecast;

        let renewals = RenewalForecaster::new(forecast.clone()).forecast(snapshot.policies, as_of);
        let risks = self.risk_scores(snapshot, now);
        let growth = GrowthProjector::new(forecast.clone()).project(snapshot.policies, snapshot.commissions, as_of);
        let seasonality = SeasonalityDetector::new(forecast.clone()).detect(snapshot.policies);
        let summary = ForecastSummary::from_parts(&renewals, &risks, &growth, &seasonality);

        ForecastReport {
            renewals,
            risks,
            growth,
            seasonality,
            summary,
        }
    }

    /// Attribution of the current `time_period` against the one before it
    pub fn attribution_report(
        &self,
        snapshot: AgencySnapshot<'_>,
        time_period: TimePeriod,
        now: NaiveDateTime,
    ) -> AttributionReport {
        let current_range = DateRange::for_period(time_period, now, 0);
        let previous_range = DateRange::for_period(time_period, now, -1);

        let current_policies = policies_in_range(snapshot.policies, &current_range);
        let current_commissions = commissions_in_range(snapshot.commissions, &current_range);
        let previous_policies = policies_in_range(snapshot.policies, &previous_range);
        let previous_commissions = commissions_in_range(snapshot.commissions, &previous_range);

        self.attribution().analyze(
            PeriodRecords::new(snapshot.policies, snapshot.commissions),
            PeriodRecords::new(&current_policies, &current_commissions),
            PeriodRecords::new(&previous_policies, &previous_commissions),
            snapshot.carriers,
            now.date(),
        )
    }

    pub fn metrics(&self, snapshot: AgencySnapshot<'_>, request: DashboardRequest) -> DashboardMetrics {
        MetricsAggregator::new().for_period(
            snapshot.policies,
            snapshot.commissions,
            snapshot.expenses,
            request.time_period,
            request.now,
            request.offset,
        )
    }

    /// Period metrics with the cohort and forecast headlines
    pub fn dashboard(&self, snapshot: AgencySnapshot<'_>, request: DashboardRequest) -> Dashboard {
        Dashboard {
            metrics: self.metrics(snapshot, request),
            cohorts: self.cohort_report(snapshot, request.now).summary,
            forecast: self.forecast_report(snapshot, request.now).summary,
        }
    }

    /// Compute many dashboards over the same records in parallel, in request order
    pub fn run_batch(&self, snapshot: AgencySnapshot<'_>, requests: &[DashboardRequest]) -> Vec<Dashboard> {
        info!("Running {} dashboard requests over {} policies", requests.len(), snapshot.policies.len());
        requests
            .par_iter()
            .map(|request| self.dashboard(snapshot, *request))
            .collect()
    }
}

impl Default for AnalyticsRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{commission, date, policy};
    use crate::records::PolicyStatus;
    use chrono::NaiveTime;

    fn noon() -> NaiveDateTime {
        date(2025, 6, 15).and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let policies = vec![
            policy("P1", date(2025, 5, 10), PolicyStatus::Active),
            policy("P2", date(2025, 6, 2), PolicyStatus::Lapsed).updated_on(date(2025, 6, 10)),
        ];
        let commissions = vec![
            commission("C1", "P1", 1000.0).paid_on(date(2025, 5, 20)),
            commission("C2", "P2", 1100.0).with_progress(1, 120.0, 980.0),
        ];
        let snapshot = AgencySnapshot::new(&policies, &commissions);
        let runner = AnalyticsRunner::new();

        let requests: Vec<DashboardRequest> = [TimePeriod::Daily, TimePeriod::Monthly, TimePeriod::Yearly]
            .into_iter()
            .map(|time_period| DashboardRequest { time_period, now: noon(), offset: 0 })
            .collect();
        let batch = runner.run_batch(snapshot, &requests);

        assert_eq!(batch.len(), 3);
        for (dashboard, request) in batch.iter().zip(&requests) {
            assert_eq!(*dashboard, runner.dashboard(snapshot, *request));
        }
        assert_eq!(batch[1].metrics.time_period, TimePeriod::Monthly);
        assert_eq!(batch[0].cohorts.total_cohorts, 2);
        // P2 lapsed one month in: 40 + 60 points
        assert_eq!(batch[0].forecast.risk.critical_policies, 1);
        assert_eq!(batch[0].forecast.risk.high_risk_policies, 1);
    }

    #[test]
    fn test_attribution_uses_previous_period() {
        let policies = vec![
            policy("P1", date(2025, 5, 10), PolicyStatus::Active),
            policy("P2", date(2025, 6, 2), PolicyStatus::Active),
            policy("P3", date(2025, 6, 3), PolicyStatus::Active),
        ];
        let commissions = vec![
            commission("C1", "P1", 1140.0).paid_on(date(2025, 5, 20)),
            commission("C2", "P2", 1140.0).paid_on(date(2025, 6, 5)),
            commission("C3", "P3", 1140.0).paid_on(date(2025, 6, 6)),
        ];
        let report = AnalyticsRunner::new().attribution_report(
            AgencySnapshot::new(&policies, &commissions),
            TimePeriod::Monthly,
            noon(),
        );

        assert_eq!(report.contribution.current.policy_count, 2);
        assert_eq!(report.contribution.previous.policy_count, 1);
        assert_eq!(report.contribution.total_change, 1140.0);
        assert_eq!(report.product_mix.len(), 12);
        assert_eq!(report.carrier_roi.len(), 1);
        assert_eq!(report.top_movers.len(), 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let runner = AnalyticsRunner::default();
        let request = DashboardRequest {
            time_period: TimePeriod::MonthToDate,
            now: noon(),
            offset: 0,
        };
        let dashboard = runner.dashboard(AgencySnapshot::default(), request);
        assert_eq!(dashboard.cohorts, CohortSummary::default());
        assert_eq!(dashboard.metrics.actual_totals.net_income, 0.0);
        assert!(runner.run_batch(AgencySnapshot::default(), &[]).is_empty());
    }
}
