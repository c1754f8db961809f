//! Expenses, payment methods and attached tax-document metadata.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{CategoryKey, Identifiable};

/// Project bucket used for office overhead (expenses with no project).
pub const OFFICE_BUCKET: &str = "Oficina";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseScope {
    Oficina,
    Proyecto,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Transferencia,
    #[serde(rename = "Débito")]
    Debito,
    Efectivo,
    #[serde(rename = "Tarjeta Crédito")]
    TarjetaCredito,
}

impl PaymentMethod {
    /// Card purchases defer their cash impact to the card payment.
    pub fn is_card(&self) -> bool {
        matches!(self, PaymentMethod::TarjetaCredito)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Transferencia => "Transferencia",
            PaymentMethod::Debito => "Débito",
            PaymentMethod::Efectivo => "Efectivo",
            PaymentMethod::TarjetaCredito => "Tarjeta Crédito",
        };
        f.write_str(label)
    }
}

/// DTE class of the supporting document, as extracted upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    FacturaAfecta,
    FacturaExenta,
    Boleta,
    NotaCredito,
    Otro,
}

/// Tax-document fields attached to an expense. The core only consumes
/// these; scanning/extraction happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxDocument {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub account_id: Uuid,
    pub scope: ExpenseScope,
    /// Set iff `scope` is `Proyecto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_category: Option<CategoryKey>,
    pub category: String,
    pub method: PaymentMethod,
    pub date_paid: Option<NaiveDate>,
    pub vendor: String,
    /// Negative amounts are refunds/returns and must net into totals.
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<TaxDocument>,
}

impl Expense {
    pub fn new(account_id: Uuid, category: impl Into<String>, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            scope: ExpenseScope::Oficina,
            project_category: None,
            category: category.into(),
            method: PaymentMethod::Transferencia,
            date_paid: None,
            vendor: String::new(),
            amount,
            note: None,
            document: None,
        }
    }

    /// Project bucket for reporting: the tagged project, or the office
    /// bucket for overhead.
    pub fn project_bucket(&self) -> CategoryKey {
        match (&self.scope, &self.project_category) {
            (ExpenseScope::Proyecto, Some(key)) => key.clone(),
            _ => CategoryKey::from(OFFICE_BUCKET),
        }
    }

    /// Whether this expense moves cash on its own date. Card purchases do
    /// not; their cash impact arrives with the card payment.
    pub fn hits_cash(&self) -> bool {
        !self.method.is_card()
    }

    /// Month bucket for the purchase ledger: document issue date when
    /// present, payment date otherwise.
    pub fn document_date(&self) -> Option<NaiveDate> {
        self.document
            .as_ref()
            .and_then(|doc| doc.issued_at)
            .or(self.date_paid)
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_method_does_not_hit_cash() {
        let mut expense = Expense::new(Uuid::new_v4(), "Materiales", 150_000);
        assert!(expense.hits_cash());
        expense.method = PaymentMethod::TarjetaCredito;
        assert!(!expense.hits_cash());
    }

    #[test]
    fn office_expense_falls_into_office_bucket() {
        let expense = Expense::new(Uuid::new_v4(), "Arriendo", 500_000);
        assert_eq!(expense.project_bucket().as_str(), OFFICE_BUCKET);
    }

    #[test]
    fn method_labels_keep_accents() {
        let json = serde_json::to_string(&PaymentMethod::TarjetaCredito).unwrap();
        assert_eq!(json, "\"Tarjeta Crédito\"");
        let back: PaymentMethod = serde_json::from_str("\"Débito\"").unwrap();
        assert_eq!(back, PaymentMethod::Debito);
    }
}
