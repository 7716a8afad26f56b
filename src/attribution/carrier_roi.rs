//! Commission return per carrier

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{add_months, month_start};
use crate::records::{Carrier, CarrierDirectory, Commission, Policy};
use super::AttributionDecomposer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierRoi {
    pub carrier_id: String,
    pub carrier_name: String,
    pub total_policies: usize,
    pub total_premium: f64,
    pub avg_premium: f64,
    pub total_commission: f64,
    /// Mean commission rate over the carrier's commissions, in percent
    pub avg_commission_rate: f64,
    /// Commission over premium, in percent
    pub roi: f64,
    /// Commission per policy
    pub efficiency: f64,
    pub trend: CarrierTrend,
}

#[derive(Default)]
struct CarrierBook<'a> {
    policies: Vec<&'a Policy>,
    commissions: Vec<&'a Commission>,
}

impl AttributionDecomposer {
    /// ROI per carrier seen on any policy or commission, highest ROI first
    ///
    /// The trend compares commission created since the start of the month
    /// three months before `as_of` against the three months before that.
    pub fn carrier_roi(
        &self,
        policies: &[Policy],
        commissions: &[Commission],
        carriers: &[Carrier],
        as_of: NaiveDate,
    ) -> Vec<CarrierRoi> {
        let directory = CarrierDirectory::build(carriers);
        let window = self.assumptions.trend_window_months as i32;
        let recent_start = add_months(month_start(as_of), -window);
        let prior_start = add_months(month_start(as_of), -2 * window);

        let mut books: BTreeMap<&str, CarrierBook> = BTreeMap::new();
        for policy in policies {
            books.entry(policy.carrier_id.as_str()).or_default().policies.push(policy);
        }
        for commission in commissions {
            books.entry(commission.carrier_id.as_str()).or_default().commissions.push(commission);
        }

        let mut rows: Vec<CarrierRoi> = books
            .into_iter()
            .map(|(carrier_id, book)| {
                let total_policies = book.policies.len();
                let total_premium: f64 = book.policies.iter().map(|p| p.annual_premium).sum();
                let total_commission: f64 = book.commissions.iter().map(|c| c.amount).sum();
                let commission_count = book.commissions.len();

                let avg_premium = ratio(total_premium, total_policies as f64);
                let avg_commission_rate = ratio(
                    book.commissions.iter().map(|c| c.commission_rate).sum(),
                    commission_count as f64,
                ) * 100.0;

                let mut recent = 0.0;
                let mut prior = 0.0;
                for commission in &book.commissions {
                    let created = commission.created_at.date_naive();
                    if created >= recent_start {
                        recent += commission.amount;
                    } else if created >= prior_start {
                        prior += commission.amount;
                    }
                }

                CarrierRoi {
                    carrier_id: carrier_id.to_string(),
                    carrier_name: directory.name_of(carrier_id).to_string(),
                    total_policies,
                    total_premium,
                    avg_premium,
                    total_commission,
                    avg_commission_rate,
                    roi: ratio(total_commission, total_premium) * 100.0,
                    efficiency: ratio(total_commission, total_policies as f64),
                    trend: self.trend(recent, prior),
                }
            })
            .collect();

        rows.sort_by(|a, b| b.roi.total_cmp(&a.roi));
        rows
    }

    fn trend(&self, recent: f64, prior: f64) -> CarrierTrend {
        if recent > prior * self.assumptions.improving_ratio {
            CarrierTrend::Improving
        } else if recent < prior * self.assumptions.declining_ratio {
            CarrierTrend::Declining
        } else {
            CarrierTrend::Stable
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
