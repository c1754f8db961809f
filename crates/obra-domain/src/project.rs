//! Construction projects and their contractual payment plans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{CategoryKey, Identifiable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    /// Join key matched against income/expense project tags.
    pub category: CategoryKey,
    pub client: String,
    /// Contracted total in pesos.
    pub contract_total: i64,
    /// Contractual milestones. A payment type may appear more than once;
    /// percentages accumulate. Entries may name a type no longer in the
    /// configured list; they are kept as-is, never repaired.
    #[serde(default)]
    pub payment_plan: Vec<PaymentPlanEntry>,
}

impl Project {
    pub fn new(name: impl Into<String>, category: impl Into<CategoryKey>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            client: String::new(),
            contract_total: 0,
            payment_plan: Vec::new(),
        }
    }
}

impl Identifiable for Project {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPlanEntry {
    /// Payment-type label ("Anticipo", "Hito 1", ...).
    #[serde(rename = "type")]
    pub payment_type: String,
    /// Share of the contract total, in percent.
    pub pct: f64,
}
