//! Foreign-key lookups built once per analytics call

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::commission::Commission;
use super::policy::{Policy, UNKNOWN};

/// Carrier reference data used to label carrier rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: String,
    pub name: String,
}

impl Carrier {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Policy lookup by id
///
/// Later duplicates of an id replace earlier ones.
#[derive(Debug, Default)]
pub struct PolicyIndex<'a> {
    by_id: HashMap<&'a str, &'a Policy>,
}

impl<'a> PolicyIndex<'a> {
    pub fn build(policies: &'a [Policy]) -> Self {
        let by_id = policies.iter().map(|p| (p.id.as_str(), p)).collect();
        Self { by_id }
    }

    pub fn get(&self, policy_id: &str) -> Option<&'a Policy> {
        self.by_id.get(policy_id).copied()
    }

    /// Policy a commission was paid on, if it has one and it is present
    pub fn resolve(&self, commission: &Commission) -> Option<&'a Policy> {
        commission.policy_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Commission lookup by policy id
///
/// `build` keeps the first commission seen for a policy, `build_latest`
/// the last one.
#[derive(Debug, Default)]
pub struct CommissionIndex<'a> {
    by_policy: HashMap<&'a str, &'a Commission>,
}

impl<'a> CommissionIndex<'a> {
    pub fn build(commissions: &'a [Commission]) -> Self {
        let mut by_policy = HashMap::with_capacity(commissions.len());
        for commission in commissions {
            if let Some(policy_id) = commission.policy_id.as_deref() {
                by_policy.entry(policy_id).or_insert(commission);
            }
        }
        Self { by_policy }
    }

    pub fn build_latest(commissions: &'a [Commission]) -> Self {
        let by_policy = commissions
            .iter()
            .filter_map(|c| c.policy_id.as_deref().map(|policy_id| (policy_id, c)))
            .collect();
        Self { by_policy }
    }

    pub fn for_policy(&self, policy_id: &str) -> Option<&'a Commission> {
        self.by_policy.get(policy_id).copied()
    }
}

/// Carrier names by id
#[derive(Debug, Default)]
pub struct CarrierDirectory<'a> {
    names: HashMap<&'a str, &'a str>,
}

impl<'a> CarrierDirectory<'a> {
    pub fn build(carriers: &'a [Carrier]) -> Self {
        let names = carriers
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();
        Self { names }
    }

    /// Carrier name, "Unknown" for ids missing from the directory
    pub fn name_of(&self, carrier_id: &str) -> &'a str {
        self.names.get(carrier_id).copied().unwrap_or(UNKNOWN)
    }
}
