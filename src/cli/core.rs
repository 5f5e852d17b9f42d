//! Command dispatch primitives shared by the shell and command modules.

use tally_config::ConfigError;
use tally_core::CoreError;
use thiserror::Error;

use crate::errors::BillingError;

pub use crate::cli::shell_context::{CliMode, ShellContext};

/// Outcome of one dispatched command.
pub type CommandResult = Result<(), CommandError>;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Failed(#[from] BillingError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Failed(BillingError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Failed(BillingError::from(err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}
