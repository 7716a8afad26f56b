//! Period totals broken down by carrier, product, state, and expense category

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::records::{Commission, Expense, Policy, ProductType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedMetrics {
    /// Keyed by carrier id
    pub commission_by_carrier: BTreeMap<String, f64>,
    pub commission_by_product: BTreeMap<ProductType, f64>,
    /// Keyed by the commission's client state
    pub commission_by_state: BTreeMap<String, f64>,
    pub expenses_by_category: BTreeMap<String, f64>,
    /// Distinct period clients per state
    pub clients_by_state: BTreeMap<String, usize>,
}

impl GroupedMetrics {
    pub fn calculate(commissions: &[Commission], expenses: &[Expense], policies: &[Policy]) -> Self {
        let mut grouped = Self::default();

        for c in commissions {
            if !c.carrier_id.is_empty() {
                *grouped.commission_by_carrier.entry(c.carrier_id.clone()).or_default() += c.amount;
            }
            *grouped.commission_by_product.entry(c.product).or_default() += c.amount;
            *grouped.commission_by_state.entry(c.client_state().to_string()).or_default() += c.amount;
        }

        for e in expenses {
            *grouped.expenses_by_category.entry(e.category_or_default().to_string()).or_default() += e.amount;
        }

        let mut seen = HashSet::new();
        for p in policies {
            if let Some(name) = p.client_name() {
                if seen.insert(name) {
                    *grouped.clients_by_state.entry(p.client_state().to_string()).or_default() += 1;
                }
            }
        }

        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{commission, date, policy};
    use crate::records::{ClientSnapshot, PolicyStatus};
    use approx::assert_relative_eq;

    #[test]
    fn test_grouping_and_fallback_labels() {
        let commissions = vec![
            commission("C1", "P1", 500.0).with_client(ClientSnapshot::new("Ann", Some("TX"), None)),
            commission("C2", "P2", 300.0),
            Commission::advance("C3", "P3", "carrier-2", ProductType::Annuity, 200.0, 0.05, date(2025, 6, 1)),
        ];
        let expenses = vec![
            Expense::new("E1", "Leads", 100.0, date(2025, 6, 1)).in_category("Marketing"),
            Expense::new("E2", "Coffee", 20.0, date(2025, 6, 2)),
        ];
        let policies = vec![
            policy("P1", date(2025, 6, 1), PolicyStatus::Active),
            policy("P2", date(2025, 6, 2), PolicyStatus::Active)
                .with_client(ClientSnapshot::new("Client P1", Some("OK"), None)),
            policy("P3", date(2025, 6, 3), PolicyStatus::Active)
                .with_client(ClientSnapshot::new("Dee", None, None)),
        ];

        let g = GroupedMetrics::calculate(&commissions, &expenses, &policies);
        assert_relative_eq!(g.commission_by_carrier["carrier-1"], 800.0);
        assert_relative_eq!(g.commission_by_carrier["carrier-2"], 200.0);
        assert_relative_eq!(g.commission_by_product[&ProductType::TermLife], 800.0);
        assert_relative_eq!(g.commission_by_state["TX"], 500.0);
        assert_relative_eq!(g.commission_by_state["Unknown"], 500.0);
        assert_relative_eq!(g.expenses_by_category["Marketing"], 100.0);
        assert_relative_eq!(g.expenses_by_category["Uncategorized"], 20.0);
        // The second "Client P1" is the same client and keeps the first state
        assert_eq!(g.clients_by_state.get("TX"), Some(&1));
        assert_eq!(g.clients_by_state.get("OK"), None);
        assert_eq!(g.clients_by_state.get("Unknown"), Some(&1));
    }
}
