//! Argv dispatch for the reporting commands.

use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;
use tracing::info;

use obra_config::{ConfigError, SettingsManager};
use obra_core::{
    apply_all_suggestions, monthly_iva_summary, payment_plan_status, project_cash_transactions,
    purchase_ledger, sales_ledger, suggest_reconciliation, AccountFilter, CashflowService,
    CoreError, KpiService,
};
use obra_domain::{LedgerState, MonthKey};
use obra_storage_json::{JsonSnapshotStorage, StorageError};

use crate::format::clp;

const USAGE: &str = "\
usage:
  obra list
  obra cashflow <ledger> [account]
  obra kpi <ledger> [YYYY-MM]
  obra iva <ledger>
  obra reconcile <ledger> [--apply]
  obra plan <ledger> <project>";

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{0}")]
    Usage(String),
}

pub fn run(args: &[String]) -> Result<(), CliError> {
    let storage = default_storage()?;
    match args.first().map(String::as_str) {
        Some("list") => cmd_list(&storage),
        Some("cashflow") => {
            let ledger = required(args, 1)?;
            cmd_cashflow(&storage, ledger, args.get(2).map(String::as_str))
        }
        Some("kpi") => {
            let ledger = required(args, 1)?;
            cmd_kpi(&storage, ledger, args.get(2).map(String::as_str))
        }
        Some("iva") => cmd_iva(&storage, required(args, 1)?),
        Some("reconcile") => {
            let ledger = required(args, 1)?;
            let apply = args.get(2).map(String::as_str) == Some("--apply");
            cmd_reconcile(&storage, ledger, apply)
        }
        Some("plan") => cmd_plan(&storage, required(args, 1)?, required(args, 2)?),
        _ => Err(CliError::Usage(USAGE.into())),
    }
}

fn required(args: &[String], index: usize) -> Result<&str, CliError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(USAGE.into()))
}

fn default_storage() -> Result<JsonSnapshotStorage, CliError> {
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("obra");
    Ok(JsonSnapshotStorage::new(
        base.join("snapshots"),
        base.join("backups"),
    )?)
}

fn cmd_list(storage: &JsonSnapshotStorage) -> Result<(), CliError> {
    let names = storage.list()?;
    if names.is_empty() {
        println!("no ledgers");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn account_filter(state: &LedgerState, account: Option<&str>) -> Result<AccountFilter, CliError> {
    let Some(name) = account else {
        return Ok(AccountFilter::Consolidated);
    };
    state
        .accounts
        .iter()
        .find(|account| account.name == name)
        .map(|account| AccountFilter::Account(account.id))
        .ok_or_else(|| CliError::Usage(format!("unknown account `{name}`")))
}

fn cmd_cashflow(
    storage: &JsonSnapshotStorage,
    ledger: &str,
    account: Option<&str>,
) -> Result<(), CliError> {
    let state = storage.load(ledger)?;
    let filter = account_filter(&state, account)?;
    let txns = project_cash_transactions(&state);
    let rows = CashflowService::monthly_table(&txns, &state.opening_balances, filter);

    println!(
        "{:<8} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Mes".bold(),
        "Apertura".bold(),
        "Ingresos".bold(),
        "Egresos".bold(),
        "Neto".bold(),
        "Cierre".bold()
    );
    for row in &rows {
        let net = if row.net < 0 {
            clp(row.net).red().to_string()
        } else {
            clp(row.net).green().to_string()
        };
        println!(
            "{:<8} {:>14} {:>14} {:>14} {:>14} {:>14}",
            row.month.to_string(),
            clp(row.opening),
            clp(row.incomes),
            clp(row.expenses),
            net,
            clp(row.closing)
        );
    }
    if rows.is_empty() {
        println!("sin movimientos");
    }
    Ok(())
}

fn cmd_kpi(
    storage: &JsonSnapshotStorage,
    ledger: &str,
    month: Option<&str>,
) -> Result<(), CliError> {
    let state = storage.load(ledger)?;
    let selected: Option<MonthKey> = match month {
        Some(raw) => Some(raw.parse().map_err(CliError::Usage)?),
        None => None,
    };

    let txns = project_cash_transactions(&state);
    let rows = CashflowService::monthly_table(&txns, &state.opening_balances, AccountFilter::Consolidated);
    let period: Vec<_> = match selected {
        Some(month) => txns
            .iter()
            .filter(|txn| MonthKey::from_date(txn.date) == month)
            .cloned()
            .collect(),
        None => txns.clone(),
    };
    let kpis = KpiService::compute(&period, &state.card_purchases, &rows, selected);

    println!("{}: {}", "Ingresos".bold(), clp(kpis.total_income).green());
    println!("{}: {}", "Egresos".bold(), clp(kpis.total_expense).red());
    println!("{}: {}", "Neto".bold(), clp(kpis.net));
    println!("{}: {}", "Saldo caja".bold(), clp(kpis.cash_balance));
    println!("{}: {}", "Tarjeta pendiente".bold(), clp(kpis.card_outstanding));
    if !kpis.expense_by_category.is_empty() {
        println!("{}", "Egresos por categoría".bold());
        for entry in &kpis.expense_by_category {
            println!("  {:<24} {:>14}", entry.category, clp(entry.total));
        }
    }
    Ok(())
}

fn cmd_iva(storage: &JsonSnapshotStorage, ledger: &str) -> Result<(), CliError> {
    let state = storage.load(ledger)?;
    let purchases = purchase_ledger(&state.expenses);
    let sales = sales_ledger(&state.incomes);
    let summary = monthly_iva_summary(&purchases, &sales);

    println!(
        "{:<8} {:>14} {:>14} {:>14}",
        "Mes".bold(),
        "IVA Crédito".bold(),
        "IVA Débito".bold(),
        "IVA a Pagar".bold()
    );
    for row in &summary {
        println!(
            "{:<8} {:>14} {:>14} {:>14}",
            row.month.to_string(),
            clp(row.iva_credito),
            clp(row.iva_debito),
            clp(row.iva_pagar)
        );
    }
    Ok(())
}

fn cmd_reconcile(
    storage: &JsonSnapshotStorage,
    ledger: &str,
    apply: bool,
) -> Result<(), CliError> {
    let mut state = storage.load(ledger)?;
    let settings = SettingsManager::with_default_location()?.load()?;
    let suggestions = suggest_reconciliation(
        &state.bank_lines,
        &state.incomes,
        &state.expenses,
        settings.reconcile_tolerance_days,
    );

    if suggestions.is_empty() {
        println!("sin sugerencias");
        return Ok(());
    }
    for line in &state.bank_lines {
        let Some(suggestion) = suggestions.get(&line.id) else {
            continue;
        };
        println!(
            "{} {} {} → {:?} ({}%)",
            line.date,
            line.description,
            clp(line.amount),
            suggestion.kind,
            suggestion.confidence
        );
    }
    if apply {
        let applied = apply_all_suggestions(&mut state, &suggestions);
        storage.save(ledger, &state)?;
        info!(applied, "reconciliation suggestions applied");
        println!("{applied} conciliadas");
    }
    Ok(())
}

fn cmd_plan(storage: &JsonSnapshotStorage, ledger: &str, project: &str) -> Result<(), CliError> {
    let state = storage.load(ledger)?;
    let Some(project) = state.projects.iter().find(|p| p.name == project) else {
        return Err(CliError::Usage(format!("unknown project `{project}`")));
    };
    let rows = payment_plan_status(project, &state.incomes);

    println!(
        "{:<20} {:>6} {:>14} {:>14} {:>14}",
        "Tipo".bold(),
        "%".bold(),
        "Esperado".bold(),
        "Recibido".bold(),
        "Pendiente".bold()
    );
    for row in &rows {
        let label = if row.in_plan {
            row.payment_type.clone()
        } else {
            format!("{} (fuera de plan)", row.payment_type)
        };
        println!(
            "{:<20} {:>6} {:>14} {:>14} {:>14}",
            label,
            format!("{:.0}", row.pct),
            clp(row.expected),
            clp(row.received),
            clp(row.pending)
        );
    }
    Ok(())
}
