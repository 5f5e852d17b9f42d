//! Parsing and validation of recurrence configuration fields.

use chrono::Weekday;

use tally_domain::{Cadence, PeriodSelector, RecurrenceDescriptor};

use crate::CoreError;

/// Turns the raw cadence/anchor/selector fields collected by callers into a
/// validated [`RecurrenceDescriptor`]. One canonical parser replaces the
/// per-form option sets the source system scattered around.
pub struct RecurrenceService;

impl RecurrenceService {
    /// Parses raw fields, applying the documented anchor defaults when the
    /// anchor is omitted. An invalid anchor is rejected, never defaulted.
    pub fn parse(
        cadence: &str,
        anchor: Option<&str>,
        selector: Option<&str>,
    ) -> Result<RecurrenceDescriptor, CoreError> {
        let cadence = Self::parse_cadence(cadence, anchor)?;
        let selector = match selector {
            Some(raw) => Self::parse_selector(raw)?,
            None => PeriodSelector::default(),
        };
        let descriptor = RecurrenceDescriptor::new(cadence, selector);
        descriptor
            .validate()
            .map_err(|err| CoreError::Validation(err.to_string()))?;
        Ok(descriptor)
    }

    /// Validates an already-built descriptor.
    pub fn validate(descriptor: &RecurrenceDescriptor) -> Result<(), CoreError> {
        descriptor
            .validate()
            .map_err(|err| CoreError::Validation(err.to_string()))
    }

    fn parse_cadence(raw: &str, anchor: Option<&str>) -> Result<Cadence, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => match anchor {
                None => Ok(Cadence::Daily),
                Some(value) => Err(CoreError::Validation(format!(
                    "daily cadence takes no anchor, got `{}`",
                    value
                ))),
            },
            "weekly" => {
                let week_start = match anchor {
                    Some(raw) => Self::parse_weekday(raw)?,
                    None => Cadence::DEFAULT_WEEK_START,
                };
                Ok(Cadence::Weekly { week_start })
            }
            "monthly" => {
                let anchor_day = match anchor {
                    Some(raw) => Self::parse_number(raw, "day-of-month anchor")?,
                    None => Cadence::DEFAULT_ANCHOR_DAY,
                };
                Ok(Cadence::Monthly { anchor_day })
            }
            "quarterly" => {
                let first_month = match anchor {
                    Some(raw) => Self::parse_number(raw, "quarter starting month")?,
                    None => Cadence::DEFAULT_FIRST_MONTH,
                };
                Ok(Cadence::Quarterly { first_month })
            }
            "half-yearly" | "halfyearly" => {
                let first_month = match anchor {
                    Some(raw) => Self::parse_number(raw, "half-year starting month")?,
                    None => Cadence::DEFAULT_FIRST_MONTH,
                };
                Ok(Cadence::HalfYearly { first_month })
            }
            "yearly" => {
                let first_month = match anchor {
                    Some(raw) => Self::parse_number(raw, "financial-year starting month")?,
                    None => Cadence::DEFAULT_FISCAL_MONTH,
                };
                Ok(Cadence::Yearly { first_month })
            }
            other => Err(CoreError::Validation(format!(
                "unknown cadence `{}`, expected daily, weekly, monthly, quarterly, half-yearly, or yearly",
                other
            ))),
        }
    }

    fn parse_selector(raw: &str) -> Result<PeriodSelector, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "previous" | "previous_period" => Ok(PeriodSelector::Previous),
            "current" | "current_period" => Ok(PeriodSelector::Current),
            "next" | "next_period" => Ok(PeriodSelector::Next),
            other => Err(CoreError::Validation(format!(
                "unknown period selector `{}`, expected previous, current, or next",
                other
            ))),
        }
    }

    /// Accepts weekday names ("monday", "mon") or ISO numbers 1..=7.
    fn parse_weekday(raw: &str) -> Result<Weekday, CoreError> {
        let value = raw.trim();
        if let Ok(number) = value.parse::<u32>() {
            return match number {
                1 => Ok(Weekday::Mon),
                2 => Ok(Weekday::Tue),
                3 => Ok(Weekday::Wed),
                4 => Ok(Weekday::Thu),
                5 => Ok(Weekday::Fri),
                6 => Ok(Weekday::Sat),
                7 => Ok(Weekday::Sun),
                other => Err(CoreError::Validation(format!(
                    "weekday number {} outside 1..=7",
                    other
                ))),
            };
        }
        value
            .parse::<Weekday>()
            .map_err(|_| CoreError::Validation(format!("unknown weekday `{}`", value)))
    }

    fn parse_number(raw: &str, field: &str) -> Result<u32, CoreError> {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| CoreError::Validation(format!("{} `{}` is not a number", field, raw)))
    }
}
