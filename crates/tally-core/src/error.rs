use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid recurrence descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("Negative {field} not allowed: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("Sequence not found: {0}")]
    SequenceNotFound(String),
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),
    #[error("Work definition not found: {0}")]
    WorkNotFound(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
