//! Cash accounts referenced by every money movement.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// Label used when a movement references an account that no longer exists.
pub const UNKNOWN_ACCOUNT: &str = "Cuenta desconocida";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}
