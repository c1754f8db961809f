//! The full ledger snapshot: every record collection plus the manually
//! entered opening balances, (de)serializable as one JSON blob.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::{Account, UNKNOWN_ACCOUNT};
use crate::bank::BankStatementLine;
use crate::card::{CreditCardPayment, CreditCardPurchase};
use crate::common::{CategoryKey, MonthKey};
use crate::expense::Expense;
use crate::income::Income;
use crate::project::Project;
use crate::transfer::Transfer;

/// Read-only snapshot handed to every derivation; the host owns the
/// canonical copy and re-invokes the core after each mutation. The one
/// write path through the core is the expense/card-purchase mirror.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub card_purchases: Vec<CreditCardPurchase>,
    #[serde(default)]
    pub card_payments: Vec<CreditCardPayment>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
    #[serde(default)]
    pub bank_lines: Vec<BankStatementLine>,
    /// Manually entered starting balances. Only the entry for the first
    /// month of a filtered timeline is honored; later months derive their
    /// opening from the prior closing.
    #[serde(default)]
    pub opening_balances: BTreeMap<MonthKey, i64>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account name, or the unknown sentinel for a dangling id. Dangling
    /// ids keep summing correctly as their own bucket.
    pub fn account_name(&self, id: Uuid) -> &str {
        self.accounts
            .iter()
            .find(|account| account.id == id)
            .map(|account| account.name.as_str())
            .unwrap_or(UNKNOWN_ACCOUNT)
    }

    pub fn project_by_category(&self, key: &CategoryKey) -> Option<&Project> {
        self.projects.iter().find(|project| &project.category == key)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: Uuid) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn bank_line_mut(&mut self, id: Uuid) -> Option<&mut BankStatementLine> {
        self.bank_lines.iter_mut().find(|line| line.id == id)
    }

    pub fn purchase_for_expense(&self, expense_id: Uuid) -> Option<&CreditCardPurchase> {
        self.card_purchases
            .iter()
            .find(|purchase| purchase.source_expense_id == expense_id)
    }
}
