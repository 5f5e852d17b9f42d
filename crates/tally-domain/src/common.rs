//! Shared traits and calendar utilities for billing primitives.

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

/// Exposes a stable identifier for entities held by the back office.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Returns the number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// Builds a date with the day clamped to the month's length.
///
/// An anchor day of 31 lands on Feb 28 (or 29) without error, which keeps
/// month-anchored periods well-defined in short months.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.max(1).min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Offsets a (year, month) pair by a signed number of months.
pub fn add_months(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + offset;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
