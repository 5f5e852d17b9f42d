//! Resolution of recurrence descriptors into concrete calendar periods.

use chrono::{Datelike, Duration, NaiveDate};

use tally_domain::{
    add_months, clamped_date, Cadence, RecurrenceDescriptor, ResolvedPeriod,
};

use crate::CoreError;

/// Computes the concrete start/end dates of the period a descriptor selects
/// around a reference date. Periods of one descriptor partition time: every
/// date belongs to exactly one period, with no gaps or overlap.
pub struct PeriodService;

impl PeriodService {
    /// Resolves the descriptor against `reference`.
    ///
    /// Descriptor fields are public, so the anchor domain is re-checked here;
    /// a descriptor that never went through validation fails with
    /// [`CoreError::InvalidDescriptor`] instead of producing a bogus period.
    pub fn resolve(
        descriptor: &RecurrenceDescriptor,
        reference: NaiveDate,
    ) -> Result<ResolvedPeriod, CoreError> {
        descriptor
            .validate()
            .map_err(|err| CoreError::InvalidDescriptor(err.to_string()))?;

        let steps = descriptor.selector.offset();
        let period = match descriptor.cadence {
            Cadence::Daily => {
                let day = reference + Duration::days(steps as i64);
                ResolvedPeriod::new(day, day)
            }
            Cadence::Weekly { week_start } => {
                let behind = (reference.weekday().num_days_from_monday() + 7
                    - week_start.num_days_from_monday())
                    % 7;
                let start =
                    reference - Duration::days(behind as i64) + Duration::days(7 * steps as i64);
                ResolvedPeriod::new(start, start + Duration::days(6))
            }
            Cadence::Monthly { anchor_day } => {
                let (year, month) = anchored_month(reference, anchor_day);
                let (year, month) = add_months(year, month, steps);
                let start = clamped_date(year, month, anchor_day);
                let (next_year, next_month) = add_months(year, month, 1);
                let end = clamped_date(next_year, next_month, anchor_day) - Duration::days(1);
                ResolvedPeriod::new(start, end)
            }
            Cadence::Quarterly { first_month } => block_period(reference, first_month, 3, steps),
            Cadence::HalfYearly { first_month } => block_period(reference, first_month, 6, steps),
            Cadence::Yearly { first_month } => block_period(reference, first_month, 12, steps),
        };
        // Bounds are ordered by construction for every cadence arm above.
        Ok(period.expect("resolved period bounds ordered"))
    }
}

/// Month containing the most recent anchor day on or before `reference`.
fn anchored_month(reference: NaiveDate, anchor_day: u32) -> (i32, u32) {
    let year = reference.year();
    let month = reference.month();
    if clamped_date(year, month, anchor_day) > reference {
        add_months(year, month, -1)
    } else {
        (year, month)
    }
}

/// Period for the `span`-month block containing `reference`, where blocks are
/// aligned to `first_month` of each year, shifted by `steps` blocks.
fn block_period(
    reference: NaiveDate,
    first_month: u32,
    span: i32,
    steps: i32,
) -> Result<ResolvedPeriod, tally_domain::PeriodError> {
    let reference_index = reference.year() * 12 + reference.month0() as i32;
    let anchor_index = first_month as i32 - 1;
    let start_index = reference_index - (reference_index - anchor_index).rem_euclid(span)
        + span * steps;

    let start = first_of_month(start_index);
    let end = first_of_month(start_index + span) - Duration::days(1);
    ResolvedPeriod::new(start, end)
}

fn first_of_month(month_index: i32) -> NaiveDate {
    let year = month_index.div_euclid(12);
    let month = month_index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is always valid")
}

// Cross-cadence behavior is covered in the crate-level tests module.
