//! Credit-card purchases (mirrored from expenses) and card payments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{CategoryKey, Identifiable};

/// Mirror of an expense paid by card. Exactly one purchase exists per
/// card-method expense, linked through `source_expense_id`.
///
/// `is_paid` is toggled by hand when statements are checked; it is not
/// driven by [`CreditCardPayment`] records, so the outstanding aggregate
/// and the per-purchase flags can legitimately disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardPurchase {
    pub id: Uuid,
    pub source_expense_id: Uuid,
    #[serde(default)]
    pub is_paid: bool,
    pub date_purchase: Option<NaiveDate>,
    pub vendor: String,
    pub amount: i64,
    pub cc_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_category: Option<CategoryKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Identifiable for CreditCardPurchase {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Paying down the card: always a cash outflow from `account_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardPayment {
    pub id: Uuid,
    pub date_paid: Option<NaiveDate>,
    pub card_name: String,
    pub amount: i64,
    pub account_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CreditCardPayment {
    pub fn new(account_id: Uuid, card_name: impl Into<String>, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date_paid: None,
            card_name: card_name.into(),
            amount,
            account_id,
            note: None,
        }
    }
}

impl Identifiable for CreditCardPayment {
    fn id(&self) -> Uuid {
        self.id
    }
}
