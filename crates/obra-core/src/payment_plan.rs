//! Expected-vs-received tracking of a project's contractual payment plan.

use serde::Serialize;

use obra_domain::{Income, Project};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanRow {
    pub payment_type: String,
    /// Accumulated plan percentage for this type; 0 for types received
    /// outside the plan.
    pub pct: f64,
    pub expected: i64,
    pub received: i64,
    pub pending: i64,
    /// False for payment types that arrived without a plan entry. Those
    /// rows are a visibility aid, not an error.
    pub in_plan: bool,
}

/// Reconciles the project's milestone plan against tagged incomes.
///
/// Plan percentages accumulate when a type repeats. Received amounts use
/// the cash-contribution rule (partial payments count their collected
/// portion). Types present in receipts but absent from the plan surface
/// as extra rows with `expected = 0` and negative pending. Plan entries
/// naming a type no longer configured are kept as their own bucket.
pub fn payment_plan_status(project: &Project, incomes: &[Income]) -> Vec<PlanRow> {
    // Accumulate pct per type, preserving plan-appearance order.
    let mut plan_types: Vec<(String, f64)> = Vec::new();
    for entry in &project.payment_plan {
        match plan_types
            .iter_mut()
            .find(|(label, _)| *label == entry.payment_type)
        {
            Some((_, pct)) => *pct += entry.pct,
            None => plan_types.push((entry.payment_type.clone(), entry.pct)),
        }
    }

    let received_for = |label: &str| -> i64 {
        incomes
            .iter()
            .filter(|income| income.category == project.category && income.payment_type == label)
            .map(|income| income.cash_amount())
            .sum()
    };

    let mut rows: Vec<PlanRow> = plan_types
        .into_iter()
        .map(|(payment_type, pct)| {
            let expected = (project.contract_total as f64 * pct / 100.0).round() as i64;
            let received = received_for(&payment_type);
            PlanRow {
                payment_type,
                pct,
                expected,
                received,
                pending: expected - received,
                in_plan: true,
            }
        })
        .collect();

    // Receipts for types the plan never mentions, in income order.
    for income in incomes {
        if income.category != project.category {
            continue;
        }
        if rows.iter().any(|row| row.payment_type == income.payment_type) {
            continue;
        }
        let received = received_for(&income.payment_type);
        rows.push(PlanRow {
            payment_type: income.payment_type.clone(),
            pct: 0.0,
            expected: 0,
            received,
            pending: -received,
            in_plan: false,
        });
    }

    rows
}
