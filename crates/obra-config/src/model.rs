use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// User-configurable lists and knobs. The core treats every list as
/// opaque labels; colors pass straight through to the chart layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Milestone / payment-type labels for incomes and payment plans.
    #[serde(default = "Settings::default_payment_types")]
    pub payment_types: Vec<String>,
    #[serde(default = "Settings::default_income_categories")]
    pub income_categories: Vec<String>,
    #[serde(default = "Settings::default_office_categories")]
    pub office_expense_categories: Vec<String>,
    #[serde(default = "Settings::default_project_categories")]
    pub project_expense_categories: Vec<String>,
    #[serde(default = "Settings::default_card_categories")]
    pub card_categories: Vec<String>,
    /// Category → hex color, pass-through for charts.
    #[serde(default)]
    pub category_colors: BTreeMap<String, String>,
    /// Date window for bank reconciliation, in calendar days.
    #[serde(default = "Settings::default_tolerance_days")]
    pub reconcile_tolerance_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            payment_types: Self::default_payment_types(),
            income_categories: Self::default_income_categories(),
            office_expense_categories: Self::default_office_categories(),
            project_expense_categories: Self::default_project_categories(),
            card_categories: Self::default_card_categories(),
            category_colors: BTreeMap::new(),
            reconcile_tolerance_days: Self::default_tolerance_days(),
        }
    }
}

impl Settings {
    pub fn default_tolerance_days() -> i64 {
        2
    }

    fn default_payment_types() -> Vec<String> {
        ["Anticipo", "Hito 1", "Hito 2", "Hito 3", "Entrega final"]
            .map(String::from)
            .to_vec()
    }

    fn default_income_categories() -> Vec<String> {
        ["Contrato", "Adicional", "Otro"].map(String::from).to_vec()
    }

    fn default_office_categories() -> Vec<String> {
        ["Arriendo", "Sueldos", "Contabilidad", "Software", "Otro"]
            .map(String::from)
            .to_vec()
    }

    fn default_project_categories() -> Vec<String> {
        ["Materiales", "Mano de obra", "Subcontratos", "Fletes", "Otro"]
            .map(String::from)
            .to_vec()
    }

    fn default_card_categories() -> Vec<String> {
        ["Materiales", "Combustible", "Herramientas", "Varios"]
            .map(String::from)
            .to_vec()
    }
}
