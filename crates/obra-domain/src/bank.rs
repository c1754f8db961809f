//! Imported bank-statement lines and their reconciliation metadata.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BankLineKind {
    Credit,
    Debit,
}

impl fmt::Display for BankLineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BankLineKind::Credit => "Abono",
            BankLineKind::Debit => "Cargo",
        };
        f.write_str(label)
    }
}

/// What kind of ledger record a bank line was matched to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Income,
    Expense,
}

/// Link from a bank line to the ledger record it was reconciled with.
/// The id and the kind are only meaningful together, so they travel as
/// one optional value on the line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconciliationLink {
    pub target_id: Uuid,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankStatementLine {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    /// Always non-negative; direction is carried by `kind`.
    pub amount: i64,
    pub kind: BankLineKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Reconciliation is one-directional bookkeeping on the line only;
    /// the matched income/expense is never touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconciled: Option<ReconciliationLink>,
}

impl BankStatementLine {
    pub fn new(date: NaiveDate, kind: BankLineKind, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: String::new(),
            amount,
            kind,
            balance: None,
            doc_number: None,
            source: None,
            reconciled: None,
        }
    }

    pub fn is_reconciled(&self) -> bool {
        self.reconciled.is_some()
    }
}

impl Identifiable for BankStatementLine {
    fn id(&self) -> Uuid {
        self.id
    }
}
