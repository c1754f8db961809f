//! Monthly cashflow table with running opening/closing balances.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use uuid::Uuid;

use obra_domain::MonthKey;

use crate::projector::{CashKind, CashTransaction};

/// Account selection for cashflow and KPI views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountFilter {
    Consolidated,
    Account(Uuid),
}

impl AccountFilter {
    pub fn matches(&self, account_id: Uuid) -> bool {
        match self {
            AccountFilter::Consolidated => true,
            AccountFilter::Account(id) => *id == account_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyCashflowRow {
    pub month: MonthKey,
    pub opening: i64,
    pub incomes: i64,
    pub expenses: i64,
    pub net: i64,
    pub closing: i64,
}

/// Builds the monthly cashflow table from projected transactions.
pub struct CashflowService;

impl CashflowService {
    /// Folds transactions and opening balances into one row per month,
    /// ascending.
    ///
    /// The stored opening balance is honored only for the first month of
    /// the resulting sequence; every later month opens at the prior
    /// month's computed closing, even if a stored entry exists for it. A
    /// stray opening balance typed into a later month therefore goes
    /// silently unused once an earlier month is present. No months at
    /// all yields an empty table, which consumers read as balance 0.
    pub fn monthly_table(
        transactions: &[CashTransaction],
        opening_balances: &BTreeMap<MonthKey, i64>,
        filter: AccountFilter,
    ) -> Vec<MonthlyCashflowRow> {
        let selected: Vec<&CashTransaction> = transactions
            .iter()
            .filter(|txn| filter.matches(txn.account_id))
            .collect();

        let mut months: BTreeSet<MonthKey> = selected
            .iter()
            .map(|txn| MonthKey::from_date(txn.date))
            .collect();
        months.extend(opening_balances.keys().copied());

        let mut rows = Vec::with_capacity(months.len());
        let mut carry: Option<i64> = None;
        for month in months {
            let mut incomes = 0i64;
            let mut expenses = 0i64;
            for txn in selected
                .iter()
                .filter(|txn| MonthKey::from_date(txn.date) == month)
            {
                match txn.kind {
                    CashKind::Ingreso => incomes += txn.amount,
                    CashKind::Egreso => expenses += txn.amount,
                }
            }
            let net = incomes - expenses;
            let opening = match carry {
                Some(previous_closing) => previous_closing,
                None => opening_balances.get(&month).copied().unwrap_or(0),
            };
            let closing = opening + net;
            carry = Some(closing);
            rows.push(MonthlyCashflowRow {
                month,
                opening,
                incomes,
                expenses,
                net,
                closing,
            });
        }
        rows
    }
}
