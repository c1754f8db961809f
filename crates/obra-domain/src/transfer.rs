//! Inter-account transfers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// Moves money between two accounts on one date. Projects into exactly
/// two cash movements (an outflow and an inflow) that net to zero across
/// all accounts. `from_account == to_account` is the caller's mistake;
/// both legs are still projected against that account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    pub id: Uuid,
    pub date: Option<NaiveDate>,
    pub from_account: Uuid,
    pub to_account: Uuid,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transfer {
    pub fn new(from_account: Uuid, to_account: Uuid, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: None,
            from_account,
            to_account,
            amount,
            note: None,
        }
    }
}

impl Identifiable for Transfer {
    fn id(&self) -> Uuid {
        self.id
    }
}
