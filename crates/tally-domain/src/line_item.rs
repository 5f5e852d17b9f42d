//! Domain models for invoice line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single billable row on an invoice.
///
/// Quantities and rates are exact decimals; all derived amounts are computed
/// on demand so repeated computation stays idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_rate: Decimal,
    pub tax_rate_percent: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_rate: Decimal,
        tax_rate_percent: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_rate,
            tax_rate_percent,
        }
    }

    /// Returns `true` when the row would contribute nothing to the invoice.
    pub fn is_zero(&self) -> bool {
        self.quantity.is_zero() || self.unit_rate.is_zero()
    }
}

/// Derived amounts for one line item, unrounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineAmounts {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_quantity_or_rate_is_flagged() {
        let free = LineItem::new("Setup", dec!(0), dec!(500), dec!(18));
        assert!(free.is_zero());
        let billed = LineItem::new("Support", dec!(2), dec!(500), dec!(18));
        assert!(!billed.is_zero());
    }

    #[test]
    fn line_items_round_trip_through_json() {
        let item = LineItem::new("Consulting", dec!(1.5), dec!(1200), dec!(18));
        let json = serde_json::to_string(&item).expect("serialize");
        let back: LineItem = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, item);
    }
}
