//! obra-core
//!
//! Derivation engine for the construction-project cash ledger: cash
//! projection, monthly cashflow, KPIs, bank reconciliation, IVA ledgers
//! and payment-plan tracking. Depends on obra-domain. No CLI, no
//! terminal I/O, no storage. Every function here is a pure recomputation
//! over the snapshot it is handed; the single write path is the
//! expense/card-purchase mirror in [`card_mirror`].

pub mod card_mirror;
pub mod cashflow;
pub mod error;
pub mod iva;
pub mod kpi;
pub mod payment_plan;
pub mod projector;
pub mod reconcile;

pub use card_mirror::*;
pub use cashflow::*;
pub use error::CoreError;
pub use iva::*;
pub use kpi::*;
pub use payment_plan::*;
pub use projector::*;
pub use reconcile::*;
