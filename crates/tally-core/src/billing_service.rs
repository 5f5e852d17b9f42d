//! Invoice arithmetic: per-line amounts and invoice-level totals.

use rust_decimal::Decimal;

use tally_domain::{Invoice, InvoiceTotals, LineAmounts, LineItem};

use crate::CoreError;

/// Pure arithmetic over line items. No rounding happens here; presentation
/// rounds for display, so repeated computation stays exact and idempotent.
pub struct BillingService;

impl BillingService {
    /// Derives subtotal, tax, and total for a single line item.
    pub fn compute_line(item: &LineItem) -> Result<LineAmounts, CoreError> {
        check_non_negative("quantity", item.quantity)?;
        check_non_negative("unit rate", item.unit_rate)?;
        check_non_negative("tax rate", item.tax_rate_percent)?;

        let subtotal = item.quantity * item.unit_rate;
        let tax = subtotal * item.tax_rate_percent / Decimal::ONE_HUNDRED;
        Ok(LineAmounts {
            subtotal,
            tax,
            total: subtotal + tax,
        })
    }

    /// Aggregates line amounts and applies the flat discount.
    ///
    /// The grand total is not clamped at zero; a discount larger than
    /// subtotal plus tax produces a credit.
    pub fn compute_totals(items: &[LineItem], discount: Decimal) -> Result<InvoiceTotals, CoreError> {
        check_non_negative("discount", discount)?;

        let mut subtotal = Decimal::ZERO;
        let mut tax_total = Decimal::ZERO;
        for item in items {
            let amounts = Self::compute_line(item)?;
            subtotal += amounts.subtotal;
            tax_total += amounts.tax;
        }
        Ok(InvoiceTotals::from_parts(subtotal, tax_total, discount))
    }

    /// Totals for a stored invoice aggregate.
    pub fn invoice_totals(invoice: &Invoice) -> Result<InvoiceTotals, CoreError> {
        Self::compute_totals(&invoice.line_items, invoice.discount)
    }

    /// Parses a raw amount field, treating missing or non-numeric input as
    /// zero. Mirrors the form behavior this engine was extracted from.
    pub fn amount_or_zero(raw: Option<&str>) -> Decimal {
        raw.and_then(|value| value.trim().parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO)
    }

    /// Builds a line item from raw form fields with parse-or-zero semantics.
    pub fn line_from_input(
        description: impl Into<String>,
        quantity: Option<&str>,
        unit_rate: Option<&str>,
        tax_rate_percent: Option<&str>,
    ) -> LineItem {
        LineItem::new(
            description,
            Self::amount_or_zero(quantity),
            Self::amount_or_zero(unit_rate),
            Self::amount_or_zero(tax_rate_percent),
        )
    }
}

fn check_non_negative(field: &'static str, value: Decimal) -> Result<(), CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::NegativeAmount { field, value });
    }
    Ok(())
}
