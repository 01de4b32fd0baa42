use crate::domain::expense::ExpenseStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Expense {0} not found")]
    ExpenseNotFound(u32),
    #[error("User {0} not found")]
    UserNotFound(u32),
    #[error("No policy for category '{0}'")]
    PolicyNotFound(String),
    #[error("Expense {0} already exists")]
    DuplicateExpense(u32),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Cannot {action} expense {id} while it is {from}")]
    InvalidTransition {
        id: u32,
        from: ExpenseStatus,
        action: &'static str,
    },
    #[error("Payment gateway error: {0}")]
    GatewayError(String),
    #[error("Payment verification failed for expense {0}")]
    PaymentVerificationFailed(u32),
    #[error("Mail delivery failed: {0}")]
    MailError(String),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
