//! tally-core
//!
//! Business logic and services for the billing core.
//! Depends on tally-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod billing_service;
pub mod error;
pub mod format;
pub mod period_service;
pub mod recurrence_service;
pub mod sequence_service;
pub mod storage;
pub mod time;
pub mod work_service;

pub use billing_service::*;
pub use error::CoreError;
pub use format::*;
pub use period_service::*;
pub use recurrence_service::*;
pub use sequence_service::*;
pub use time::*;
pub use work_service::*;

#[cfg(test)]
mod tests;
