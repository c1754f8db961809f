use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced at the core's mutation seam. The pure derivations
/// never fail; incomplete data degrades to defined values instead.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("expense {0} not found")]
    ExpenseNotFound(Uuid),
    #[error("bank line {0} not found")]
    BankLineNotFound(Uuid),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
