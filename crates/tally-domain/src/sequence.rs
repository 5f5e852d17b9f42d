//! Voucher and document-number sequence configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Widest supported zero-padded column.
pub const MAX_SEQUENCE_WIDTH: u32 = 12;

/// Formatting and counter state for one identifier sequence.
///
/// The counter itself is owned by whichever store persists the config; this
/// type only knows how to format a number and what the next one would be.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SequenceConfig {
    pub key: String,
    pub prefix: String,
    pub suffix: String,
    pub width: u32,
    pub zero_pad: bool,
    pub next_number: u64,
}

impl SequenceConfig {
    pub fn new(
        key: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        width: u32,
        zero_pad: bool,
        next_number: u64,
    ) -> Result<Self, SequenceConfigError> {
        if width == 0 || width > MAX_SEQUENCE_WIDTH {
            return Err(SequenceConfigError::WidthOutOfRange(width));
        }
        if next_number == 0 {
            return Err(SequenceConfigError::CounterStartsAtOne);
        }
        Ok(Self {
            key: key.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            width,
            zero_pad,
            next_number,
        })
    }

    /// Formats an arbitrary number with this sequence's decoration.
    ///
    /// Padding never truncates: once the counter outgrows `width`, the full
    /// number is emitted.
    pub fn format(&self, number: u64) -> String {
        if self.zero_pad {
            format!(
                "{}{:0width$}{}",
                self.prefix,
                number,
                self.suffix,
                width = self.width as usize
            )
        } else {
            format!("{}{}{}", self.prefix, number, self.suffix)
        }
    }

    /// Returns a copy advanced past the current `next_number`.
    pub fn bumped(&self) -> Self {
        Self {
            next_number: self.next_number + 1,
            ..self.clone()
        }
    }
}

impl fmt::Display for SequenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: next {}", self.key, self.format(self.next_number))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`SequenceConfig`] values.
pub enum SequenceConfigError {
    WidthOutOfRange(u32),
    CounterStartsAtOne,
}

impl fmt::Display for SequenceConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceConfigError::WidthOutOfRange(width) => {
                write!(f, "sequence width {} outside 1..={}", width, MAX_SEQUENCE_WIDTH)
            }
            SequenceConfigError::CounterStartsAtOne => {
                f.write_str("sequence numbering starts at 1")
            }
        }
    }
}

impl std::error::Error for SequenceConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice_sequence() -> SequenceConfig {
        SequenceConfig::new("invoice", "INV", "", 6, true, 1).expect("valid sequence")
    }

    #[test]
    fn zero_padding_fills_to_width() {
        assert_eq!(invoice_sequence().format(1), "INV000001");
        assert_eq!(invoice_sequence().format(42), "INV000042");
    }

    #[test]
    fn padding_never_truncates() {
        assert_eq!(invoice_sequence().format(1_000_000), "INV1000000");
    }

    #[test]
    fn unpadded_sequences_emit_bare_numbers() {
        let seq = SequenceConfig::new("voucher", "V-", "/24", 4, false, 7).expect("valid");
        assert_eq!(seq.format(7), "V-7/24");
    }

    #[test]
    fn construction_validates_width_and_start() {
        assert_eq!(
            SequenceConfig::new("bad", "X", "", 0, true, 1),
            Err(SequenceConfigError::WidthOutOfRange(0))
        );
        assert_eq!(
            SequenceConfig::new("bad", "X", "", 13, true, 1),
            Err(SequenceConfigError::WidthOutOfRange(13))
        );
        assert_eq!(
            SequenceConfig::new("bad", "X", "", 6, true, 0),
            Err(SequenceConfigError::CounterStartsAtOne)
        );
    }

    #[test]
    fn bumped_advances_only_the_counter() {
        let seq = invoice_sequence();
        let next = seq.bumped();
        assert_eq!(next.next_number, 2);
        assert_eq!(next.prefix, seq.prefix);
        assert_eq!(next.width, seq.width);
    }
}
