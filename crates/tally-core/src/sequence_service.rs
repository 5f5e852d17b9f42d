//! Formatting and issuance of sequential document identifiers.

use tally_domain::SequenceConfig;

use crate::{storage::SequenceStore, CoreError};

/// Mints human-readable identifiers (invoice numbers, voucher numbers) from
/// configured sequences. Formatting and advancing are pure; issuance against
/// shared state goes through a [`SequenceStore`] so two callers can never be
/// handed the same number.
pub struct SequenceService;

impl SequenceService {
    /// Formats an arbitrary number with the sequence decoration.
    pub fn format_id(config: &SequenceConfig, number: u64) -> String {
        config.format(number)
    }

    /// Formats the next identifier and returns the advanced config.
    ///
    /// Pure variant for callers that own their sequence state exclusively;
    /// persisting the returned config is the caller's responsibility.
    pub fn next_id(config: &SequenceConfig) -> (String, SequenceConfig) {
        (config.format(config.next_number), config.bumped())
    }

    /// Issues the next identifier from a shared, persisted sequence.
    ///
    /// Atomicity lives in the store: `fetch_and_increment` reserves the
    /// number and persists the advanced counter before returning.
    pub fn issue(store: &dyn SequenceStore, key: &str) -> Result<String, CoreError> {
        let reserved = store.fetch_and_increment(key)?;
        Ok(reserved.format(reserved.next_number))
    }
}
