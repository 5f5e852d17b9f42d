//! Recurrence descriptors and the calendar periods they resolve to.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Recurrence frequency together with its cadence-specific anchor.
///
/// The anchor fixes where periods begin: the start-of-week day for weekly
/// cadences, the day-of-month for monthly ones, and the starting month for
/// the block cadences (quarterly, half-yearly, yearly).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    Weekly { week_start: Weekday },
    Monthly { anchor_day: u32 },
    Quarterly { first_month: u32 },
    HalfYearly { first_month: u32 },
    Yearly { first_month: u32 },
}

impl Cadence {
    /// Default week start when a weekly anchor is omitted.
    pub const DEFAULT_WEEK_START: Weekday = Weekday::Mon;
    /// Default day-of-month when a monthly anchor is omitted.
    pub const DEFAULT_ANCHOR_DAY: u32 = 1;
    /// Default first month for quarterly and half-yearly cadences.
    pub const DEFAULT_FIRST_MONTH: u32 = 1;
    /// Default financial-year start when a yearly anchor is omitted (April).
    pub const DEFAULT_FISCAL_MONTH: u32 = 4;

    /// Checks the anchor against its valid domain for this cadence.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        match *self {
            Cadence::Daily | Cadence::Weekly { .. } => Ok(()),
            Cadence::Monthly { anchor_day } => {
                if (1..=31).contains(&anchor_day) {
                    Ok(())
                } else {
                    Err(DescriptorError::AnchorDayOutOfRange(anchor_day))
                }
            }
            Cadence::Quarterly { first_month } => {
                if (1..=12).contains(&first_month) {
                    Ok(())
                } else {
                    Err(DescriptorError::AnchorMonthOutOfRange(first_month))
                }
            }
            Cadence::HalfYearly { first_month } => {
                if matches!(first_month, 1 | 4 | 7) {
                    Ok(())
                } else {
                    Err(DescriptorError::HalfYearStartInvalid(first_month))
                }
            }
            Cadence::Yearly { first_month } => {
                if matches!(first_month, 1 | 4 | 7 | 10) {
                    Ok(())
                } else {
                    Err(DescriptorError::FiscalYearStartInvalid(first_month))
                }
            }
        }
    }

    /// Number of months covered by one period, for the month-block cadences.
    pub fn span_months(&self) -> Option<i32> {
        match self {
            Cadence::Quarterly { .. } => Some(3),
            Cadence::HalfYearly { .. } => Some(6),
            Cadence::Yearly { .. } => Some(12),
            _ => None,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Daily => f.write_str("Daily"),
            Cadence::Weekly { week_start } => write!(f, "Weekly (from {})", week_start),
            Cadence::Monthly { anchor_day } => write!(f, "Monthly (day {})", anchor_day),
            Cadence::Quarterly { first_month } => {
                write!(f, "Quarterly (from month {})", first_month)
            }
            Cadence::HalfYearly { first_month } => {
                write!(f, "Half-yearly (from month {})", first_month)
            }
            Cadence::Yearly { first_month } => write!(f, "Yearly (from month {})", first_month),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Selects which period instance to resolve relative to a reference date.
pub enum PeriodSelector {
    Previous,
    #[default]
    Current,
    Next,
}

impl PeriodSelector {
    /// Signed step applied to the current period.
    pub fn offset(&self) -> i32 {
        match self {
            PeriodSelector::Previous => -1,
            PeriodSelector::Current => 0,
            PeriodSelector::Next => 1,
        }
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodSelector::Previous => "Previous",
            PeriodSelector::Current => "Current",
            PeriodSelector::Next => "Next",
        };
        f.write_str(label)
    }
}

/// How often a unit of work recurs and which period instance it bills.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceDescriptor {
    pub cadence: Cadence,
    #[serde(default)]
    pub selector: PeriodSelector,
}

impl RecurrenceDescriptor {
    pub fn new(cadence: Cadence, selector: PeriodSelector) -> Self {
        Self { cadence, selector }
    }

    /// Validates the anchor domain. Fields are public, so a descriptor can be
    /// mutated into an invalid state after construction; resolvers re-check.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        self.cadence.validate()
    }
}

impl fmt::Display for RecurrenceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} period", self.cadence, self.selector)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised when a recurrence anchor falls outside its valid domain.
pub enum DescriptorError {
    AnchorDayOutOfRange(u32),
    AnchorMonthOutOfRange(u32),
    HalfYearStartInvalid(u32),
    FiscalYearStartInvalid(u32),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::AnchorDayOutOfRange(day) => {
                write!(f, "day-of-month anchor {} outside 1..=31", day)
            }
            DescriptorError::AnchorMonthOutOfRange(month) => {
                write!(f, "starting month {} outside 1..=12", month)
            }
            DescriptorError::HalfYearStartInvalid(month) => {
                write!(f, "half-year start {} must be 1, 4, or 7", month)
            }
            DescriptorError::FiscalYearStartInvalid(month) => {
                write!(f, "financial-year start {} must be 1, 4, 7, or 10", month)
            }
        }
    }
}

impl std::error::Error for DescriptorError {}

/// A concrete calendar period, inclusive on both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ResolvedPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Returns `true` if the date falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered by the period.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for ResolvedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`ResolvedPeriod`] values.
pub enum PeriodError {
    InvalidRange,
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::InvalidRange => f.write_str("period end must not precede start"),
        }
    }
}

impl std::error::Error for PeriodError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_domains_are_enforced() {
        assert!(Cadence::Monthly { anchor_day: 31 }.validate().is_ok());
        assert!(Cadence::Monthly { anchor_day: 32 }.validate().is_err());
        assert!(Cadence::Quarterly { first_month: 12 }.validate().is_ok());
        assert!(Cadence::Quarterly { first_month: 13 }.validate().is_err());
        assert!(Cadence::HalfYearly { first_month: 4 }.validate().is_ok());
        assert!(Cadence::HalfYearly { first_month: 2 }.validate().is_err());
        assert!(Cadence::Yearly { first_month: 10 }.validate().is_ok());
        assert!(Cadence::Yearly { first_month: 5 }.validate().is_err());
    }

    #[test]
    fn period_rejects_inverted_ranges() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert_eq!(ResolvedPeriod::new(start, end), Err(PeriodError::InvalidRange));
        let single = ResolvedPeriod::new(start, start).expect("single-day period");
        assert_eq!(single.days(), 1);
        assert!(single.contains(start));
    }

    #[test]
    fn selector_defaults_to_current() {
        let descriptor: RecurrenceDescriptor =
            serde_json::from_str(r#"{"cadence":"Daily"}"#).expect("deserialize");
        assert_eq!(descriptor.selector, PeriodSelector::Current);
    }
}
