//! Expense mutation entry points and the expense/card-purchase mirror.
//!
//! A card-method expense never touches cash itself; it is shadowed by
//! exactly one [`CreditCardPurchase`] linked through `source_expense_id`,
//! and cash moves only when the card is later paid down. Every expense
//! mutation must leave that 1:1 relation intact, so the mutation helpers
//! here resynchronize the mirror within the same call. Callers never
//! observe an expense flagged as card-paid without its purchase, or the
//! reverse.
//!
//! `is_paid` on the mirrored purchase is manual reconciliation state and
//! survives resyncs untouched.

use tracing::debug;
use uuid::Uuid;

use obra_domain::{CreditCardPurchase, Expense, LedgerState};

use crate::error::{CoreError, CoreResult};

/// Adds an expense, creating its card mirror when the method calls for
/// one. Returns the expense id.
pub fn add_expense(state: &mut LedgerState, expense: Expense) -> Uuid {
    let id = expense.id;
    state.expenses.push(expense);
    sync_card_mirror(state, id);
    id
}

/// Applies an in-place mutation to an expense, then resynchronizes the
/// card mirror so a method change to or from card creates, updates or
/// removes the linked purchase in the same step.
pub fn update_expense<F>(state: &mut LedgerState, expense_id: Uuid, mutate: F) -> CoreResult<()>
where
    F: FnOnce(&mut Expense),
{
    let expense = state
        .expense_mut(expense_id)
        .ok_or(CoreError::ExpenseNotFound(expense_id))?;
    mutate(expense);
    sync_card_mirror(state, expense_id);
    Ok(())
}

/// Removes an expense together with its card mirror, if any.
pub fn remove_expense(state: &mut LedgerState, expense_id: Uuid) -> CoreResult<()> {
    let before = state.expenses.len();
    state.expenses.retain(|expense| expense.id != expense_id);
    if state.expenses.len() == before {
        return Err(CoreError::ExpenseNotFound(expense_id));
    }
    sync_card_mirror(state, expense_id);
    Ok(())
}

/// Brings the card-purchase collection in line with one expense:
/// card-method expense without a mirror gets one, an existing mirror is
/// refreshed from the expense fields, and a mirror whose expense is gone
/// or no longer card-paid is dropped. `is_paid` and `cc_category` are
/// manual card-side state and survive a refresh.
pub fn sync_card_mirror(state: &mut LedgerState, expense_id: Uuid) {
    // Clone the source fields up front; the purchase list is mutated below.
    let expense = match state.expense(expense_id) {
        Some(expense) if expense.method.is_card() => expense.clone(),
        _ => {
            let before = state.card_purchases.len();
            state
                .card_purchases
                .retain(|purchase| purchase.source_expense_id != expense_id);
            if state.card_purchases.len() != before {
                debug!(%expense_id, "card mirror removed");
            }
            return;
        }
    };

    match state
        .card_purchases
        .iter_mut()
        .find(|purchase| purchase.source_expense_id == expense_id)
    {
        Some(purchase) => {
            refresh_mirror(purchase, &expense);
            debug!(%expense_id, "card mirror refreshed");
        }
        None => {
            // The expense category only seeds the card classification;
            // after creation it is edited on the card side.
            let mut purchase = CreditCardPurchase {
                id: Uuid::new_v4(),
                source_expense_id: expense_id,
                is_paid: false,
                date_purchase: None,
                vendor: String::new(),
                amount: 0,
                cc_category: expense.category.clone(),
                project_category: None,
                note: None,
            };
            refresh_mirror(&mut purchase, &expense);
            state.card_purchases.push(purchase);
            debug!(%expense_id, "card mirror created");
        }
    }
}

fn refresh_mirror(purchase: &mut CreditCardPurchase, expense: &Expense) {
    purchase.date_purchase = expense.date_paid;
    purchase.vendor = expense.vendor.clone();
    purchase.amount = expense.amount;
    purchase.project_category = expense.project_category.clone();
    purchase.note = expense.note.clone();
}
