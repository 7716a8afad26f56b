//! Largest period-over-period commission changes by carrier, product, and state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::records::{Carrier, CarrierDirectory, CommissionIndex};
use super::{AttributionDecomposer, PeriodRecords};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoverKind {
    Carrier,
    Product,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMover {
    #[serde(rename = "type")]
    pub kind: MoverKind,
    pub name: String,
    pub current_value: f64,
    pub previous_value: f64,
    pub change: f64,
    /// Change over the previous value in percent; 0 when there was no previous value
    pub change_percent: f64,
    pub direction: Direction,
    pub impact: Impact,
}

/// Commission totals per name in the current and previous period
type Totals = BTreeMap<String, (f64, f64)>;

impl AttributionDecomposer {
    /// Significant movers across carriers, products, and client states, biggest first
    ///
    /// State totals follow each period's policies to the first commission paid
    /// on them in the same period.
    pub fn top_movers(
        &self,
        current: PeriodRecords<'_>,
        previous: PeriodRecords<'_>,
        carriers: &[Carrier],
    ) -> Vec<TopMover> {
        let directory = CarrierDirectory::build(carriers);

        let mut by_carrier = Totals::new();
        let mut by_product: BTreeMap<_, (f64, f64)> = BTreeMap::new();
        for (records, is_current) in [(current, true), (previous, false)] {
            for commission in records.commissions {
                add(by_carrier.entry(commission.carrier_id.clone()).or_default(), commission.amount, is_current);
                add(by_product.entry(commission.product).or_default(), commission.amount, is_current);
            }
        }

        let mut by_state = Totals::new();
        for (records, is_current) in [(current, true), (previous, false)] {
            let index = CommissionIndex::build(records.commissions);
            for policy in records.policies {
                if let Some(commission) = index.for_policy(&policy.id) {
                    add(by_state.entry(policy.client_state().to_string()).or_default(), commission.amount, is_current);
                }
            }
        }

        let mut movers = Vec::new();
        for (carrier_id, totals) in &by_carrier {
            self.push_mover(&mut movers, MoverKind::Carrier, directory.name_of(carrier_id), *totals);
        }
        for (product, totals) in &by_product {
            self.push_mover(&mut movers, MoverKind::Product, product.display_name(), *totals);
        }
        for (state, totals) in &by_state {
            self.push_mover(&mut movers, MoverKind::State, state, *totals);
        }

        movers.sort_by(|a, b| b.change.abs().total_cmp(&a.change.abs()));
        movers.truncate(self.assumptions.top_movers);
        movers
    }

    fn push_mover(&self, movers: &mut Vec<TopMover>, kind: MoverKind, name: &str, (current, previous): (f64, f64)) {
        let a = &self.assumptions;
        let change = current - previous;
        let magnitude = change.abs();
        if magnitude <= a.significance_threshold {
            return;
        }

        let impact = if magnitude > a.high_impact_threshold {
            Impact::High
        } else if magnitude > a.medium_impact_threshold {
            Impact::Medium
        } else {
            Impact::Low
        };

        movers.push(TopMover {
            kind,
            name: name.to_string(),
            current_value: current,
            previous_value: previous,
            change,
            change_percent: if previous > 0.0 { change / previous * 100.0 } else { 0.0 },
            direction: if change > 0.0 { Direction::Up } else { Direction::Down },
            impact,
        });
    }
}

fn add(slot: &mut (f64, f64), amount: f64, is_current: bool) {
    if is_current {
        slot.0 += amount;
    } else {
        slot.1 += amount;
    }
}
