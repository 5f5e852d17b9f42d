//! Services tying recurring work definitions to their billing periods.

use chrono::NaiveDate;

use tally_domain::{PeriodSelector, RecurrenceDescriptor, ResolvedPeriod, WorkDefinition};

use crate::{PeriodService, CoreError};

/// Derives billing windows for recurring work.
pub struct WorkService;

impl WorkService {
    /// Resolves the billing window the work item's descriptor selects for
    /// `today`. Inactive work has no billable window.
    pub fn billing_window(
        work: &WorkDefinition,
        today: NaiveDate,
    ) -> Result<ResolvedPeriod, CoreError> {
        if !work.active {
            return Err(CoreError::InvalidOperation(format!(
                "work `{}` is inactive",
                work.name
            )));
        }
        PeriodService::resolve(&work.descriptor, today)
    }

    /// Resolves the window for an explicit selector, ignoring the one stored
    /// on the descriptor. Used by reporting to peek at adjacent periods.
    pub fn window_for_selector(
        work: &WorkDefinition,
        selector: PeriodSelector,
        today: NaiveDate,
    ) -> Result<ResolvedPeriod, CoreError> {
        let descriptor = RecurrenceDescriptor::new(work.descriptor.cadence, selector);
        PeriodService::resolve(&descriptor, today)
    }
}
