use std::result::Result as StdResult;

use tally_config::ConfigError;
use tally_core::CoreError;
use thiserror::Error;

/// Unified error type for core/config/storage layers.
#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid recurrence descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("Arithmetic rejected: {0}")]
    Arithmetic(String),
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),
    #[error("Sequence not found: {0}")]
    SequenceNotFound(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, BillingError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BillingError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for BillingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => BillingError::Validation(message),
            CoreError::InvalidDescriptor(message) => BillingError::InvalidDescriptor(message),
            CoreError::NegativeAmount { .. } => BillingError::Arithmetic(err.to_string()),
            CoreError::SequenceNotFound(key) => BillingError::SequenceNotFound(key),
            CoreError::InvoiceNotFound(number) => BillingError::InvoiceNotFound(number),
            CoreError::WorkNotFound(name) => {
                BillingError::InvalidInput(format!("work definition `{}` not found", name))
            }
            CoreError::InvalidOperation(message) => BillingError::InvalidInput(message),
            CoreError::Storage(message) | CoreError::Serde(message) => {
                BillingError::StorageError(message)
            }
            CoreError::Io(io) => BillingError::StorageError(io.to_string()),
        }
    }
}

impl From<ConfigError> for BillingError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => BillingError::StorageError(io.to_string()),
            ConfigError::Serde(message) => BillingError::ConfigError(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(BillingError::from(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(BillingError::from(err))
    }
}
