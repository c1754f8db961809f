//! Bank reconciliation: greedy suggestion matching plus the explicit
//! apply/undo operations that record a match on a bank line.
//!
//! The matcher is deliberately order-dependent: bank lines are processed
//! in their given order and candidates scanned in collection order, so
//! when several lines tie on amount the earlier line wins the ledger
//! record. Changing this to a globally optimal assignment would change
//! observable suggestions, so it stays greedy.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use obra_domain::{
    BankLineKind, BankStatementLine, Expense, Income, LedgerState, MatchKind, ReconciliationLink,
};

use crate::error::{CoreError, CoreResult};

/// Default date-proximity window, in calendar days.
pub const DEFAULT_TOLERANCE_DAYS: i64 = 2;
/// Independent score floor. With the default tolerance it never binds
/// (a 2-day diff still scores 80), but it is a separate guard.
pub const MIN_CONFIDENCE: i64 = 50;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MatchSuggestion {
    pub target_id: Uuid,
    pub kind: MatchKind,
    /// 100 for a same-day match, minus 10 per day of distance.
    pub confidence: i64,
}

/// Proposes a match for each unreconciled bank line.
///
/// Amounts must agree to the peso (`|Δ| < 1`); dates must fall within
/// `tolerance_days`. Each income/expense is consumed at most once per
/// run, so two identical bank lines contending for one record leave the
/// later line unmatched. Nothing is mutated here; applying a suggestion
/// is a separate step.
pub fn suggest_reconciliation(
    bank_lines: &[BankStatementLine],
    incomes: &[Income],
    expenses: &[Expense],
    tolerance_days: i64,
) -> HashMap<Uuid, MatchSuggestion> {
    let mut suggestions = HashMap::new();
    let mut used_incomes: HashSet<Uuid> = HashSet::new();
    let mut used_expenses: HashSet<Uuid> = HashSet::new();

    for line in bank_lines.iter().filter(|line| !line.is_reconciled()) {
        let best = match line.kind {
            BankLineKind::Credit => best_income_match(line, incomes, &used_incomes, tolerance_days),
            BankLineKind::Debit => {
                best_expense_match(line, expenses, &used_expenses, tolerance_days)
            }
        };
        let Some(suggestion) = best else {
            continue;
        };
        if suggestion.confidence < MIN_CONFIDENCE {
            continue;
        }
        match suggestion.kind {
            MatchKind::Income => used_incomes.insert(suggestion.target_id),
            MatchKind::Expense => used_expenses.insert(suggestion.target_id),
        };
        suggestions.insert(line.id, suggestion);
    }
    suggestions
}

fn best_income_match(
    line: &BankStatementLine,
    incomes: &[Income],
    used: &HashSet<Uuid>,
    tolerance_days: i64,
) -> Option<MatchSuggestion> {
    let mut best: Option<MatchSuggestion> = None;
    for income in incomes {
        if !income.is_collected() || used.contains(&income.id) {
            continue;
        }
        let Some(date) = income.date_paid else {
            continue;
        };
        let Some(confidence) =
            score_candidate(line.amount, income.cash_amount(), line.date, date, tolerance_days)
        else {
            continue;
        };
        // Strict comparison: the first-scanned candidate keeps a tie.
        if best.map(|b| confidence > b.confidence).unwrap_or(true) {
            best = Some(MatchSuggestion {
                target_id: income.id,
                kind: MatchKind::Income,
                confidence,
            });
        }
    }
    best
}

fn best_expense_match(
    line: &BankStatementLine,
    expenses: &[Expense],
    used: &HashSet<Uuid>,
    tolerance_days: i64,
) -> Option<MatchSuggestion> {
    let mut best: Option<MatchSuggestion> = None;
    for expense in expenses {
        // Card purchases never hit cash, so they cannot show up on a
        // bank statement.
        if !expense.hits_cash() || used.contains(&expense.id) {
            continue;
        }
        let Some(date) = expense.date_paid else {
            continue;
        };
        let Some(confidence) =
            score_candidate(line.amount, expense.amount, line.date, date, tolerance_days)
        else {
            continue;
        };
        if best.map(|b| confidence > b.confidence).unwrap_or(true) {
            best = Some(MatchSuggestion {
                target_id: expense.id,
                kind: MatchKind::Expense,
                confidence,
            });
        }
    }
    best
}

fn score_candidate(
    line_amount: i64,
    candidate_amount: i64,
    line_date: chrono::NaiveDate,
    candidate_date: chrono::NaiveDate,
    tolerance_days: i64,
) -> Option<i64> {
    if (candidate_amount - line_amount).abs() >= 1 {
        return None;
    }
    let day_diff = (candidate_date - line_date).num_days().abs();
    if day_diff > tolerance_days {
        return None;
    }
    Some(100 - 10 * day_diff)
}

/// Records one suggestion on its bank line. Re-applying over an existing
/// link is an idempotent overwrite; the matched record is never touched.
pub fn apply_suggestion(
    state: &mut LedgerState,
    line_id: Uuid,
    suggestion: &MatchSuggestion,
) -> CoreResult<()> {
    let line = state
        .bank_line_mut(line_id)
        .ok_or(CoreError::BankLineNotFound(line_id))?;
    line.reconciled = Some(ReconciliationLink {
        target_id: suggestion.target_id,
        kind: suggestion.kind,
    });
    debug!(%line_id, target = %suggestion.target_id, confidence = suggestion.confidence, "bank line reconciled");
    Ok(())
}

/// Accepts every suggestion in one batch. Lines that vanished since the
/// suggestions were computed are skipped rather than failing the batch.
pub fn apply_all_suggestions(
    state: &mut LedgerState,
    suggestions: &HashMap<Uuid, MatchSuggestion>,
) -> usize {
    let mut applied = 0;
    for (line_id, suggestion) in suggestions {
        if apply_suggestion(state, *line_id, suggestion).is_ok() {
            applied += 1;
        }
    }
    applied
}

/// Clears the reconciliation link on one bank line.
pub fn clear_reconciliation(state: &mut LedgerState, line_id: Uuid) -> CoreResult<()> {
    let line = state
        .bank_line_mut(line_id)
        .ok_or(CoreError::BankLineNotFound(line_id))?;
    line.reconciled = None;
    debug!(%line_id, "bank line reconciliation cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use obra_domain::{IncomeStatus, PaymentMethod};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paid_income(amount: i64, paid_on: NaiveDate) -> Income {
        let mut income = Income::new(Uuid::new_v4(), "Obra A", amount);
        income.status = IncomeStatus::Pagado;
        income.date_paid = Some(paid_on);
        income
    }

    fn paid_expense(amount: i64, paid_on: NaiveDate) -> Expense {
        let mut expense = Expense::new(Uuid::new_v4(), "Materiales", amount);
        expense.date_paid = Some(paid_on);
        expense
    }

    fn credit_line(amount: i64, on: NaiveDate) -> BankStatementLine {
        BankStatementLine::new(on, BankLineKind::Credit, amount)
    }

    fn debit_line(amount: i64, on: NaiveDate) -> BankStatementLine {
        BankStatementLine::new(on, BankLineKind::Debit, amount)
    }

    #[test]
    fn same_day_exact_amount_scores_100() {
        let day = date(2025, 3, 10);
        let income = paid_income(350_000, day);
        let line = credit_line(350_000, day);
        let suggestions = suggest_reconciliation(
            std::slice::from_ref(&line),
            std::slice::from_ref(&income),
            &[],
            DEFAULT_TOLERANCE_DAYS,
        );
        let suggestion = suggestions.get(&line.id).expect("match expected");
        assert_eq!(suggestion.target_id, income.id);
        assert_eq!(suggestion.confidence, 100);
    }

    #[test]
    fn amount_off_by_one_peso_is_rejected() {
        let day = date(2025, 3, 10);
        let income = paid_income(350_001, day);
        let line = credit_line(350_000, day);
        let suggestions =
            suggest_reconciliation(std::slice::from_ref(&line), &[income], &[], DEFAULT_TOLERANCE_DAYS);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn date_outside_tolerance_is_rejected() {
        let income = paid_income(100_000, date(2025, 3, 14));
        let line = credit_line(100_000, date(2025, 3, 10));
        let suggestions =
            suggest_reconciliation(std::slice::from_ref(&line), &[income], &[], DEFAULT_TOLERANCE_DAYS);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn closer_date_wins_and_scores_by_distance() {
        let far = paid_income(100_000, date(2025, 3, 12));
        let near = paid_income(100_000, date(2025, 3, 11));
        let line = credit_line(100_000, date(2025, 3, 10));
        let suggestions = suggest_reconciliation(
            std::slice::from_ref(&line),
            &[far, near.clone()],
            &[],
            DEFAULT_TOLERANCE_DAYS,
        );
        let suggestion = suggestions.get(&line.id).unwrap();
        assert_eq!(suggestion.target_id, near.id);
        assert_eq!(suggestion.confidence, 90);
    }

    #[test]
    fn tie_keeps_first_scanned_candidate() {
        let first = paid_income(100_000, date(2025, 3, 11));
        let second = paid_income(100_000, date(2025, 3, 11));
        let line = credit_line(100_000, date(2025, 3, 10));
        let suggestions = suggest_reconciliation(
            std::slice::from_ref(&line),
            &[first.clone(), second],
            &[],
            DEFAULT_TOLERANCE_DAYS,
        );
        assert_eq!(suggestions.get(&line.id).unwrap().target_id, first.id);
    }

    #[test]
    fn one_income_is_consumed_by_at_most_one_line() {
        let day = date(2025, 3, 10);
        let income = paid_income(200_000, day);
        let first = credit_line(200_000, day);
        let second = credit_line(200_000, day);
        let suggestions = suggest_reconciliation(
            &[first.clone(), second.clone()],
            &[income],
            &[],
            DEFAULT_TOLERANCE_DAYS,
        );
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions.contains_key(&first.id));
        assert!(!suggestions.contains_key(&second.id));
    }

    #[test]
    fn card_expenses_are_never_bank_matched() {
        let day = date(2025, 3, 10);
        let mut expense = paid_expense(80_000, day);
        expense.method = PaymentMethod::TarjetaCredito;
        let line = debit_line(80_000, day);
        let suggestions =
            suggest_reconciliation(std::slice::from_ref(&line), &[], &[expense], DEFAULT_TOLERANCE_DAYS);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn debit_lines_match_cash_expenses() {
        let day = date(2025, 3, 10);
        let expense = paid_expense(80_000, day);
        let line = debit_line(80_000, day);
        let suggestions = suggest_reconciliation(
            std::slice::from_ref(&line),
            &[],
            std::slice::from_ref(&expense),
            DEFAULT_TOLERANCE_DAYS,
        );
        let suggestion = suggestions.get(&line.id).unwrap();
        assert_eq!(suggestion.kind, MatchKind::Expense);
        assert_eq!(suggestion.target_id, expense.id);
    }

    #[test]
    fn reconciled_lines_are_skipped() {
        let day = date(2025, 3, 10);
        let income = paid_income(50_000, day);
        let mut line = credit_line(50_000, day);
        line.reconciled = Some(ReconciliationLink {
            target_id: Uuid::new_v4(),
            kind: MatchKind::Income,
        });
        let suggestions =
            suggest_reconciliation(std::slice::from_ref(&line), &[income], &[], DEFAULT_TOLERANCE_DAYS);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn apply_and_undo_only_touch_the_line() {
        let day = date(2025, 3, 10);
        let income = paid_income(50_000, day);
        let income_id = income.id;
        let line = credit_line(50_000, day);
        let line_id = line.id;

        let mut state = LedgerState::new();
        state.incomes.push(income);
        state.bank_lines.push(line);

        let suggestion = MatchSuggestion {
            target_id: income_id,
            kind: MatchKind::Income,
            confidence: 100,
        };
        apply_suggestion(&mut state, line_id, &suggestion).unwrap();
        // idempotent overwrite
        apply_suggestion(&mut state, line_id, &suggestion).unwrap();
        assert_eq!(
            state.bank_lines[0].reconciled.unwrap().target_id,
            income_id
        );
        assert_eq!(state.incomes[0].status, IncomeStatus::Pagado);

        clear_reconciliation(&mut state, line_id).unwrap();
        assert!(state.bank_lines[0].reconciled.is_none());
    }

    #[test]
    fn apply_all_skips_vanished_lines() {
        let mut state = LedgerState::new();
        let day = date(2025, 3, 10);
        let line = credit_line(10_000, day);
        let line_id = line.id;
        state.bank_lines.push(line);

        let mut suggestions = HashMap::new();
        let suggestion = MatchSuggestion {
            target_id: Uuid::new_v4(),
            kind: MatchKind::Income,
            confidence: 100,
        };
        suggestions.insert(line_id, suggestion);
        suggestions.insert(Uuid::new_v4(), suggestion); // stale line id

        assert_eq!(apply_all_suggestions(&mut state, &suggestions), 1);
        assert!(state.bank_lines[0].is_reconciled());
    }
}
