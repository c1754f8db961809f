//! Headline figures and category breakdowns for a selected period.

use serde::Serialize;

use obra_domain::{CreditCardPurchase, MonthKey};

use crate::cashflow::MonthlyCashflowRow;
use crate::projector::{CashKind, CashTransaction};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KpiSet {
    pub total_income: i64,
    pub total_expense: i64,
    pub net: i64,
    /// Sum of unpaid card purchases. Always consolidated: the account
    /// filter deliberately does not apply here.
    pub card_outstanding: i64,
    /// Closing balance of the selected month's cashflow row, the last
    /// row when no month is selected, or 0 with no rows at all.
    pub cash_balance: i64,
    pub expense_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
}

/// Aggregates headline figures and category breakdowns.
pub struct KpiService;

impl KpiService {
    /// Computes the KPI set for an already period-filtered transaction
    /// list.
    ///
    /// `selected_month` of `None` means the "ALL" view.
    pub fn compute(
        transactions: &[CashTransaction],
        card_purchases: &[CreditCardPurchase],
        cashflow_rows: &[MonthlyCashflowRow],
        selected_month: Option<MonthKey>,
    ) -> KpiSet {
        let total_income: i64 = transactions
            .iter()
            .filter(|txn| txn.kind == CashKind::Ingreso)
            .map(|txn| txn.amount)
            .sum();
        let total_expense: i64 = transactions
            .iter()
            .filter(|txn| txn.kind == CashKind::Egreso)
            .map(|txn| txn.amount)
            .sum();

        let card_outstanding = card_purchases
            .iter()
            .filter(|purchase| !purchase.is_paid)
            .map(|purchase| purchase.amount)
            .sum();

        let cash_balance = match selected_month {
            Some(month) => cashflow_rows
                .iter()
                .find(|row| row.month == month)
                .map(|row| row.closing)
                .unwrap_or(0),
            None => cashflow_rows.last().map(|row| row.closing).unwrap_or(0),
        };

        KpiSet {
            total_income,
            total_expense,
            net: total_income - total_expense,
            card_outstanding,
            cash_balance,
            expense_by_category: Self::category_totals(transactions, CashKind::Egreso),
            income_by_category: Self::category_totals(transactions, CashKind::Ingreso),
        }
    }

    /// Per-category sums for one side of the ledger, descending by
    /// total. Ties keep first-encountered order (the sort is stable and
    /// the list is built in encounter order); no secondary key is
    /// defined on purpose.
    pub fn category_totals(
        transactions: &[CashTransaction],
        kind: CashKind,
    ) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for txn in transactions.iter().filter(|txn| txn.kind == kind) {
            match totals.iter_mut().find(|entry| entry.category == txn.category) {
                Some(entry) => entry.total += txn.amount,
                None => totals.push(CategoryTotal {
                    category: txn.category.clone(),
                    total: txn.amount,
                }),
            }
        }
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        totals
    }
}
