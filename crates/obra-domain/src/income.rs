//! Project incomes (invoiced milestones and their collection state).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{CategoryKey, Identifiable};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IncomeStatus {
    Pagado,
    Pendiente,
    #[serde(rename = "Pago parcial")]
    PagoParcial,
}

impl fmt::Display for IncomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IncomeStatus::Pagado => "Pagado",
            IncomeStatus::Pendiente => "Pendiente",
            IncomeStatus::PagoParcial => "Pago parcial",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Project join key; free text, see [`CategoryKey`].
    pub category: CategoryKey,
    /// Milestone / payment-type label matched against the project plan.
    pub payment_type: String,
    pub status: IncomeStatus,
    pub date_invoice: Option<NaiveDate>,
    pub date_paid: Option<NaiveDate>,
    /// Invoiced/contracted figure. Stays intact under partial payment so
    /// milestone tracking keeps seeing the agreed amount.
    pub amount: i64,
    /// Portion actually collected when `status` is `Pago parcial`.
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Income {
    pub fn new(account_id: Uuid, category: impl Into<CategoryKey>, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            category: category.into(),
            payment_type: String::new(),
            status: IncomeStatus::Pendiente,
            date_invoice: None,
            date_paid: None,
            amount,
            amount_paid: 0,
            note: None,
        }
    }

    /// True once any money has come in (full or partial).
    pub fn is_collected(&self) -> bool {
        matches!(self.status, IncomeStatus::Pagado | IncomeStatus::PagoParcial)
    }

    /// Amount this income contributes to cash: the full invoice when paid,
    /// the collected portion when partial, nothing while pending.
    pub fn cash_amount(&self) -> i64 {
        match self.status {
            IncomeStatus::Pagado => self.amount,
            IncomeStatus::PagoParcial => self.amount_paid,
            IncomeStatus::Pendiente => 0,
        }
    }
}

impl Identifiable for Income {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_income_contributes_collected_portion() {
        let mut income = Income::new(Uuid::new_v4(), "Casa Lo Barnechea", 1_000_000);
        income.status = IncomeStatus::PagoParcial;
        income.amount_paid = 400_000;
        assert_eq!(income.cash_amount(), 400_000);
        assert_eq!(income.amount, 1_000_000);
    }

    #[test]
    fn pending_income_contributes_nothing() {
        let income = Income::new(Uuid::new_v4(), "Casa Lo Barnechea", 1_000_000);
        assert_eq!(income.cash_amount(), 0);
        assert!(!income.is_collected());
    }

    #[test]
    fn partial_status_serializes_with_spanish_label() {
        let json = serde_json::to_string(&IncomeStatus::PagoParcial).unwrap();
        assert_eq!(json, "\"Pago parcial\"");
    }
}
