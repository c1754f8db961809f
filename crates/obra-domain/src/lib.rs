//! obra-domain
//!
//! Pure domain records for the construction-project cash ledger
//! (accounts, projects, incomes, expenses, card purchases/payments,
//! transfers, bank-statement lines). No I/O, no CLI, no storage.

pub mod account;
pub mod bank;
pub mod card;
pub mod common;
pub mod expense;
pub mod income;
pub mod project;
pub mod state;
pub mod transfer;

pub use account::*;
pub use bank::*;
pub use card::*;
pub use common::*;
pub use expense::*;
pub use income::*;
pub use project::*;
pub use state::*;
pub use transfer::*;
