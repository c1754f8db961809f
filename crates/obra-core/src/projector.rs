//! Cash-transaction projection.
//!
//! Flattens the four mutable ledgers (incomes, expenses, card payments,
//! transfers) into one normalized list of cash-affecting movements.
//! Pure over its inputs and cheap enough to re-run on every read.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use obra_domain::{CategoryKey, LedgerState, OFFICE_BUCKET};

/// Fixed category for card pay-downs.
pub const CARD_PAYMENT_CATEGORY: &str = "Pago Tarjeta Crédito";
/// Fixed category for both legs of a transfer.
pub const TRANSFER_CATEGORY: &str = "Transferencia";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum CashKind {
    Ingreso,
    Egreso,
}

impl fmt::Display for CashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CashKind::Ingreso => "Ingreso",
            CashKind::Egreso => "Egreso",
        };
        f.write_str(label)
    }
}

/// Which ledger a cash transaction was projected from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum CashSource {
    Income,
    Expense,
    CardPayment,
    Transfer,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashTransaction {
    pub kind: CashKind,
    pub source: CashSource,
    pub source_id: Uuid,
    pub date: NaiveDate,
    /// Non-negative except for expense refunds, which keep their negative
    /// amount under `Egreso` so they net correctly downstream.
    pub amount: i64,
    pub category: String,
    /// Project bucket; `None` only for transfer legs.
    pub project: Option<CategoryKey>,
    pub account_id: Uuid,
    pub note: Option<String>,
}

/// Projects the current snapshot into the flat cash-transaction list.
///
/// Inclusion rules:
/// - incomes: only paid/partial with a payment date; partial contributes
///   the collected portion,
/// - expenses: only non-card methods, amount sign preserved,
/// - card payments: always an outflow,
/// - transfers: two legs sharing the transfer id, netting to zero across
///   accounts.
///
/// Records with no date are left out entirely. Output order is stable
/// for identical input: collection order, incomes then expenses then
/// card payments then transfer pairs.
pub fn project_cash_transactions(state: &LedgerState) -> Vec<CashTransaction> {
    let mut out = Vec::new();

    for income in &state.incomes {
        if !income.is_collected() {
            continue;
        }
        let Some(date) = income.date_paid else {
            continue;
        };
        out.push(CashTransaction {
            kind: CashKind::Ingreso,
            source: CashSource::Income,
            source_id: income.id,
            date,
            amount: income.cash_amount(),
            category: income.category.to_string(),
            project: Some(income.category.clone()),
            account_id: income.account_id,
            note: income.note.clone(),
        });
    }

    for expense in &state.expenses {
        if !expense.hits_cash() {
            continue;
        }
        let Some(date) = expense.date_paid else {
            continue;
        };
        out.push(CashTransaction {
            kind: CashKind::Egreso,
            source: CashSource::Expense,
            source_id: expense.id,
            date,
            amount: expense.amount,
            category: expense.category.clone(),
            project: Some(expense.project_bucket()),
            account_id: expense.account_id,
            note: expense.note.clone(),
        });
    }

    for payment in &state.card_payments {
        let Some(date) = payment.date_paid else {
            continue;
        };
        out.push(CashTransaction {
            kind: CashKind::Egreso,
            source: CashSource::CardPayment,
            source_id: payment.id,
            date,
            amount: payment.amount,
            category: CARD_PAYMENT_CATEGORY.to_string(),
            project: Some(CategoryKey::from(OFFICE_BUCKET)),
            account_id: payment.account_id,
            note: Some(format!("Pago {}", payment.card_name)),
        });
    }

    for transfer in &state.transfers {
        let Some(date) = transfer.date else {
            continue;
        };
        let note = Some(format!(
            "{} → {}",
            state.account_name(transfer.from_account),
            state.account_name(transfer.to_account)
        ));
        out.push(CashTransaction {
            kind: CashKind::Egreso,
            source: CashSource::Transfer,
            source_id: transfer.id,
            date,
            amount: transfer.amount,
            category: TRANSFER_CATEGORY.to_string(),
            project: None,
            account_id: transfer.from_account,
            note: note.clone(),
        });
        out.push(CashTransaction {
            kind: CashKind::Ingreso,
            source: CashSource::Transfer,
            source_id: transfer.id,
            date,
            amount: transfer.amount,
            category: TRANSFER_CATEGORY.to_string(),
            project: None,
            account_id: transfer.to_account,
            note,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use obra_domain::{
        Account, CreditCardPayment, Expense, Income, IncomeStatus, PaymentMethod, Transfer,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state_with_account() -> (LedgerState, Uuid) {
        let mut state = LedgerState::new();
        let account = Account::new("Cuenta Corriente");
        let id = account.id;
        state.accounts.push(account);
        (state, id)
    }

    #[test]
    fn pending_and_undated_incomes_are_excluded() {
        let (mut state, account) = state_with_account();

        let pending = Income::new(account, "Obra A", 800_000);
        state.incomes.push(pending);

        let mut paid_no_date = Income::new(account, "Obra A", 500_000);
        paid_no_date.status = IncomeStatus::Pagado;
        state.incomes.push(paid_no_date);

        assert!(project_cash_transactions(&state).is_empty());
    }

    #[test]
    fn partial_income_projects_collected_portion() {
        let (mut state, account) = state_with_account();
        let mut income = Income::new(account, "Obra A", 1_000_000);
        income.status = IncomeStatus::PagoParcial;
        income.amount_paid = 400_000;
        income.date_paid = Some(date(2025, 2, 10));
        state.incomes.push(income);

        let txns = project_cash_transactions(&state);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].kind, CashKind::Ingreso);
        assert_eq!(txns[0].amount, 400_000);
    }

    #[test]
    fn card_expense_never_projects() {
        let (mut state, account) = state_with_account();
        let mut expense = Expense::new(account, "Materiales", 999_999);
        expense.method = PaymentMethod::TarjetaCredito;
        expense.date_paid = Some(date(2025, 3, 1));
        state.expenses.push(expense);

        assert!(project_cash_transactions(&state).is_empty());
    }

    #[test]
    fn refund_expense_keeps_negative_amount() {
        let (mut state, account) = state_with_account();
        let mut refund = Expense::new(account, "Materiales", -50_000);
        refund.date_paid = Some(date(2025, 3, 5));
        state.expenses.push(refund);

        let txns = project_cash_transactions(&state);
        assert_eq!(txns[0].kind, CashKind::Egreso);
        assert_eq!(txns[0].amount, -50_000);
    }

    #[test]
    fn card_payment_projects_office_outflow() {
        let (mut state, account) = state_with_account();
        let mut payment = CreditCardPayment::new(account, "Visa Banco", 300_000);
        payment.date_paid = Some(date(2025, 4, 2));
        state.card_payments.push(payment);

        let txns = project_cash_transactions(&state);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, CARD_PAYMENT_CATEGORY);
        assert_eq!(txns[0].project.as_ref().unwrap().as_str(), "Oficina");
    }

    #[test]
    fn transfer_projects_two_legs_netting_to_zero() {
        let (mut state, from) = state_with_account();
        let to_account = Account::new("Cuenta Vista");
        let to = to_account.id;
        state.accounts.push(to_account);
        let mut transfer = Transfer::new(from, to, 250_000);
        transfer.date = Some(date(2025, 5, 20));
        let transfer_id = transfer.id;
        state.transfers.push(transfer);

        let txns = project_cash_transactions(&state);
        assert_eq!(txns.len(), 2);
        assert!(txns.iter().all(|t| t.source_id == transfer_id));
        let net: i64 = txns
            .iter()
            .map(|t| match t.kind {
                CashKind::Ingreso => t.amount,
                CashKind::Egreso => -t.amount,
            })
            .sum();
        assert_eq!(net, 0);
        assert_eq!(txns[0].account_id, from);
        assert_eq!(txns[1].account_id, to);
    }

    #[test]
    fn same_input_yields_same_order() {
        let (mut state, account) = state_with_account();
        let mut a = Income::new(account, "Obra A", 100);
        a.status = IncomeStatus::Pagado;
        a.date_paid = Some(date(2025, 6, 2));
        let mut b = Expense::new(account, "Fletes", 40);
        b.date_paid = Some(date(2025, 6, 1));
        state.incomes.push(a);
        state.expenses.push(b);

        let first = project_cash_transactions(&state);
        let second = project_cash_transactions(&state);
        let ids: Vec<Uuid> = first.iter().map(|t| t.source_id).collect();
        let again: Vec<Uuid> = second.iter().map(|t| t.source_id).collect();
        assert_eq!(ids, again);
        assert_eq!(first[0].source, CashSource::Income);
        assert_eq!(first[1].source, CashSource::Expense);
    }
}
