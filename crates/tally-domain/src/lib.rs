//! tally-domain
//!
//! Pure domain models (LineItem, Invoice, RecurrenceDescriptor, SequenceConfig, etc.).
//! No I/O, no CLI, no storage. Only data types, calendar math, and core enums.

pub mod common;
pub mod invoice;
pub mod line_item;
pub mod recurrence;
pub mod sequence;
pub mod work;

pub use common::*;
pub use invoice::*;
pub use line_item::*;
pub use recurrence::*;
pub use sequence::*;
pub use work::*;
