//! IVA (19% VAT) derivation: net/IVA split, purchase and sales ledgers,
//! and the monthly tax summary.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use obra_domain::{DocumentType, Expense, Income, MonthKey};

/// Chilean VAT, embedded in gross amounts.
pub const IVA_RATE: f64 = 0.19;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct IvaSplit {
    pub neto: i64,
    pub iva: i64,
}

/// Splits a gross amount into net and IVA.
///
/// `neto` is the rounded division (half away from zero); `iva` is the
/// remainder rather than an independently rounded figure, so
/// `neto + iva == amount` holds for every input. The tax ledgers depend
/// on that exactness.
pub fn split_iva(amount: i64) -> IvaSplit {
    let neto = (amount as f64 / (1.0 + IVA_RATE)).round() as i64;
    IvaSplit {
        neto,
        iva: amount - neto,
    }
}

/// One row of a tax ledger (libro de compras / libro de ventas).
#[derive(Debug, Clone, Serialize)]
pub struct TaxLedgerEntry {
    pub source_id: Uuid,
    pub month: MonthKey,
    pub counterparty: String,
    pub doc_number: Option<String>,
    pub gross: i64,
    pub neto: i64,
    pub iva: i64,
}

/// Libro de Compras: expenses backed by a factura afecta, bucketed by
/// document issue date (falling back to payment date). Rows without
/// either date cannot be bucketed and are left out.
pub fn purchase_ledger(expenses: &[Expense]) -> Vec<TaxLedgerEntry> {
    let mut entries = Vec::new();
    for expense in expenses {
        let Some(document) = &expense.document else {
            continue;
        };
        if document.doc_type != DocumentType::FacturaAfecta {
            continue;
        }
        let Some(date) = expense.document_date() else {
            continue;
        };
        let split = split_iva(expense.amount);
        entries.push(TaxLedgerEntry {
            source_id: expense.id,
            month: MonthKey::from_date(date),
            counterparty: expense.vendor.clone(),
            doc_number: document.number.clone(),
            gross: expense.amount,
            neto: split.neto,
            iva: split.iva,
        });
    }
    entries
}

/// Libro de Ventas: collected incomes at their cash-contribution amount
/// (partial payments contribute the collected portion).
pub fn sales_ledger(incomes: &[Income]) -> Vec<TaxLedgerEntry> {
    let mut entries = Vec::new();
    for income in incomes {
        if !income.is_collected() {
            continue;
        }
        let Some(date) = income.date_paid else {
            continue;
        };
        let gross = income.cash_amount();
        let split = split_iva(gross);
        entries.push(TaxLedgerEntry {
            source_id: income.id,
            month: MonthKey::from_date(date),
            counterparty: income.category.to_string(),
            doc_number: None,
            gross,
            neto: split.neto,
            iva: split.iva,
        });
    }
    entries
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyIvaSummary {
    pub month: MonthKey,
    /// IVA paid on purchases (credit against the authority).
    pub iva_credito: i64,
    /// IVA collected on sales (owed to the authority).
    pub iva_debito: i64,
    /// `iva_debito - iva_credito`; negative means carry-forward credit
    /// (remanente).
    pub iva_pagar: i64,
}

/// Folds both ledgers into one row per month, ascending.
pub fn monthly_iva_summary(
    purchases: &[TaxLedgerEntry],
    sales: &[TaxLedgerEntry],
) -> Vec<MonthlyIvaSummary> {
    let mut credito: BTreeMap<MonthKey, i64> = BTreeMap::new();
    let mut debito: BTreeMap<MonthKey, i64> = BTreeMap::new();
    for entry in purchases {
        *credito.entry(entry.month).or_default() += entry.iva;
    }
    for entry in sales {
        *debito.entry(entry.month).or_default() += entry.iva;
    }

    let mut months: Vec<MonthKey> = credito.keys().chain(debito.keys()).copied().collect();
    months.sort_unstable();
    months.dedup();

    months
        .into_iter()
        .map(|month| {
            let iva_credito = credito.get(&month).copied().unwrap_or(0);
            let iva_debito = debito.get(&month).copied().unwrap_or(0);
            MonthlyIvaSummary {
                month,
                iva_credito,
                iva_debito,
                iva_pagar: iva_debito - iva_credito,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use obra_domain::{IncomeStatus, TaxDocument};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn factura(doc_type: DocumentType, issued: Option<NaiveDate>) -> TaxDocument {
        TaxDocument {
            doc_type,
            number: Some("1234".into()),
            issued_at: issued,
            provider: None,
            notes: None,
        }
    }

    #[test]
    fn split_recomposes_exactly() {
        for amount in [0i64, 1, 118, 119, 1_000, 119_000, 1_234_567, 999_999_999] {
            let split = split_iva(amount);
            assert_eq!(split.neto + split.iva, amount, "amount {amount}");
        }
    }

    #[test]
    fn split_of_gross_119000_is_100000_plus_19000() {
        let split = split_iva(119_000);
        assert_eq!(split.neto, 100_000);
        assert_eq!(split.iva, 19_000);
    }

    #[test]
    fn purchase_ledger_takes_only_factura_afecta() {
        let account = Uuid::new_v4();
        let mut afecta = Expense::new(account, "Materiales", 119_000);
        afecta.document = Some(factura(DocumentType::FacturaAfecta, Some(date(2025, 1, 20))));
        let mut boleta = Expense::new(account, "Materiales", 50_000);
        boleta.document = Some(factura(DocumentType::Boleta, Some(date(2025, 1, 21))));
        let undocumented = Expense::new(account, "Fletes", 10_000);

        let entries = purchase_ledger(&[afecta, boleta, undocumented]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].iva, 19_000);
        assert_eq!(entries[0].month, MonthKey::new(2025, 1));
    }

    #[test]
    fn purchase_ledger_falls_back_to_payment_date() {
        let mut expense = Expense::new(Uuid::new_v4(), "Materiales", 119_000);
        expense.date_paid = Some(date(2025, 2, 3));
        expense.document = Some(factura(DocumentType::FacturaAfecta, None));
        let entries = purchase_ledger(std::slice::from_ref(&expense));
        assert_eq!(entries[0].month, MonthKey::new(2025, 2));
    }

    #[test]
    fn sales_ledger_uses_cash_contribution() {
        let mut partial = Income::new(Uuid::new_v4(), "Obra A", 1_190_000);
        partial.status = IncomeStatus::PagoParcial;
        partial.amount_paid = 595_000;
        partial.date_paid = Some(date(2025, 3, 15));

        let entries = sales_ledger(std::slice::from_ref(&partial));
        assert_eq!(entries[0].gross, 595_000);
        assert_eq!(entries[0].neto + entries[0].iva, 595_000);
    }

    #[test]
    fn monthly_summary_nets_debito_against_credito() {
        let mut purchase = Expense::new(Uuid::new_v4(), "Materiales", 119_000);
        purchase.document = Some(factura(DocumentType::FacturaAfecta, Some(date(2025, 4, 5))));
        let mut sale = Income::new(Uuid::new_v4(), "Obra A", 238_000);
        sale.status = IncomeStatus::Pagado;
        sale.date_paid = Some(date(2025, 4, 12));

        let summary = monthly_iva_summary(
            &purchase_ledger(std::slice::from_ref(&purchase)),
            &sales_ledger(std::slice::from_ref(&sale)),
        );
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].iva_credito, 19_000);
        assert_eq!(summary[0].iva_debito, 38_000);
        assert_eq!(summary[0].iva_pagar, 19_000);
    }

    #[test]
    fn remanente_shows_as_negative_iva_pagar() {
        let mut purchase = Expense::new(Uuid::new_v4(), "Materiales", 238_000);
        purchase.document = Some(factura(DocumentType::FacturaAfecta, Some(date(2025, 5, 5))));
        let summary = monthly_iva_summary(&purchase_ledger(std::slice::from_ref(&purchase)), &[]);
        assert_eq!(summary[0].iva_pagar, -38_000);
    }
}
