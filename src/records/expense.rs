//! Agency expense records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category used when an expense has none
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,

    pub name: String,

    pub amount: f64,

    #[serde(default)]
    pub category: Option<String>,

    /// Date the expense was incurred
    pub date: NaiveDate,

    #[serde(default)]
    pub is_recurring: bool,

    #[serde(default)]
    pub is_tax_deductible: bool,
}

impl Expense {
    pub fn new(id: impl Into<String>, name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            category: None,
            date,
            is_recurring: false,
            is_tax_deductible: false,
        }
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn tax_deductible(mut self) -> Self {
        self.is_tax_deductible = true;
        self
    }

    pub fn category_or_default(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNCATEGORIZED)
    }
}
