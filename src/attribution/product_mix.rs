//! Product mix of new business, month by month

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::{add_months, month_key, month_label, month_start};
use crate::records::{Policy, ProductType};
use super::AttributionDecomposer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductShare {
    pub product: ProductType,
    pub count: usize,
    /// Share of the month's policies, in percent
    pub percentage: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMixEvolution {
    pub period: String,
    pub period_label: String,
    /// Products present in the month, in product order
    pub product_breakdown: Vec<ProductShare>,
    pub total_policies: usize,
    pub total_revenue: f64,
}

impl AttributionDecomposer {
    /// Product breakdown for the trailing window of calendar months ending with `as_of`'s month, oldest first
    pub fn product_mix(&self, policies: &[Policy], as_of: NaiveDate) -> Vec<ProductMixEvolution> {
        let window = self.assumptions.mix_window_months as i32;
        let current = month_start(as_of);

        (0..window)
            .rev()
            .map(|back| {
                let month = add_months(current, -back);
                let key = month_key(month);

                let mut by_product: BTreeMap<ProductType, (usize, f64)> = BTreeMap::new();
                let mut total_policies = 0;
                let mut total_revenue = 0.0;
                for policy in policies.iter().filter(|p| month_key(p.effective_date) == key) {
                    let entry = by_product.entry(policy.product).or_insert((0, 0.0));
                    entry.0 += 1;
                    entry.1 += policy.annual_premium;
                    total_policies += 1;
                    total_revenue += policy.annual_premium;
                }

                let product_breakdown = by_product
                    .into_iter()
                    .map(|(product, (count, revenue))| ProductShare {
                        product,
                        count,
                        percentage: count as f64 / total_policies as f64 * 100.0,
                        revenue,
                    })
                    .collect();

                ProductMixEvolution {
                    period: key,
                    period_label: month_label(month),
                    product_breakdown,
                    total_policies,
                    total_revenue,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AttributionAssumptions;
    use crate::fixtures::{as_of, date, policy};
    use crate::records::PolicyStatus;
    use approx::assert_relative_eq;

    #[test]
    fn test_mix_window_and_shares() {
        let mut annuity = policy("P3", date(2025, 6, 2), PolicyStatus::Active);
        annuity.product = ProductType::Annuity;
        annuity.annual_premium = 10_000.0;
        let policies = vec![
            policy("P1", date(2025, 6, 1), PolicyStatus::Active),
            policy("P2", date(2025, 6, 14), PolicyStatus::Pending),
            annuity,
            policy("P4", date(2024, 6, 30), PolicyStatus::Active),
        ];

        let rows = AttributionDecomposer::new(AttributionAssumptions::default()).product_mix(&policies, as_of());
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].period, "2024-07");
        assert_eq!(rows[0].total_policies, 0);
        assert!(rows[0].product_breakdown.is_empty());

        let june = &rows[11];
        assert_eq!(june.period_label, "Jun 2025");
        assert_eq!(june.total_policies, 3);
        assert_relative_eq!(june.total_revenue, 12_400.0);
        assert_eq!(june.product_breakdown.len(), 2);
        assert_eq!(june.product_breakdown[0].product, ProductType::TermLife);
        assert_eq!(june.product_breakdown[0].count, 2);
        assert_relative_eq!(june.product_breakdown[0].percentage, 200.0 / 3.0);
        assert_eq!(june.product_breakdown[1].product, ProductType::Annuity);
    }
}
