//! Revenue attribution: what drove the change between two periods
//!
//! Commission change is split into volume, rate, and mix effects. Carrier
//! ROI, product-mix history, and the largest carrier/product/state movers
//! round out the picture.

mod contribution;
mod product_mix;
mod carrier_roi;
mod movers;

pub use contribution::{ContributionBreakdown, PeriodTotals};
pub use product_mix::{ProductMixEvolution, ProductShare};
pub use carrier_roi::{CarrierRoi, CarrierTrend};
pub use movers::{Direction, Impact, MoverKind, TopMover};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assumptions::AttributionAssumptions;
use crate::records::{Carrier, Commission, Policy};

/// Policies and commissions that fall inside one reporting period
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodRecords<'a> {
    pub policies: &'a [Policy],
    pub commissions: &'a [Commission],
}

impl<'a> PeriodRecords<'a> {
    pub fn new(policies: &'a [Policy], commissions: &'a [Commission]) -> Self {
        Self { policies, commissions }
    }
}

/// Full attribution output for a current/previous period pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionReport {
    pub contribution: ContributionBreakdown,
    pub product_mix: Vec<ProductMixEvolution>,
    pub carrier_roi: Vec<CarrierRoi>,
    pub top_movers: Vec<TopMover>,
}

#[derive(Debug, Clone, Default)]
pub struct AttributionDecomposer {
    assumptions: AttributionAssumptions,
}

impl AttributionDecomposer {
    pub fn new(assumptions: AttributionAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &AttributionAssumptions {
        &self.assumptions
    }

    /// Run every attribution view
    ///
    /// Product mix and carrier ROI look at the unfiltered `all` records; the
    /// decomposition and movers compare `current` against `previous`.
    pub fn analyze(
        &self,
        all: PeriodRecords<'_>,
        current: PeriodRecords<'_>,
        previous: PeriodRecords<'_>,
        carriers: &[Carrier],
        as_of: NaiveDate,
    ) -> AttributionReport {
        AttributionReport {
            contribution: self.contribution(current, previous),
            product_mix: self.product_mix(all.policies, as_of),
            carrier_roi: self.carrier_roi(all.policies, all.commissions, carriers, as_of),
            top_movers: self.top_movers(current, previous, carriers),
        }
    }
}
