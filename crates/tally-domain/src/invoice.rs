//! Invoice aggregate and its derived totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, line_item::LineItem, recurrence::ResolvedPeriod};

/// A customer invoice: header fields plus an ordered list of line items.
///
/// Totals are always derived from the line items, never stored denormalized,
/// so an edited invoice can not disagree with its own arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub number: String,
    pub customer: String,
    pub issue_date: NaiveDate,
    pub line_items: Vec<LineItem>,
    pub discount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_period: Option<ResolvedPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Invoice {
    pub fn new(
        number: impl Into<String>,
        customer: impl Into<String>,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            customer: customer.into(),
            issue_date,
            line_items: Vec::new(),
            discount: Decimal::ZERO,
            service_period: None,
            notes: None,
        }
    }

    pub fn with_service_period(mut self, period: ResolvedPeriod) -> Self {
        self.service_period = Some(period);
        self
    }

    pub fn push_line(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    pub fn set_discount(&mut self, discount: Decimal) {
        self.discount = discount;
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

impl Identifiable for Invoice {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Invoice {
    fn display_label(&self) -> String {
        format!("{} ({})", self.number, self.customer)
    }
}

/// Aggregated amounts across an invoice, unrounded.
///
/// `grand_total` may go negative when the discount exceeds subtotal plus tax;
/// that is deliberate, credit notes are represented this way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub discount: Decimal,
    pub grand_total: Decimal,
}

impl InvoiceTotals {
    /// Assembles totals from already-summed parts.
    pub fn from_parts(subtotal: Decimal, tax_total: Decimal, discount: Decimal) -> Self {
        Self {
            subtotal,
            tax_total,
            discount,
            grand_total: subtotal + tax_total - discount,
        }
    }

    /// Returns `true` when the discount pushed the grand total below zero.
    pub fn is_credit(&self) -> bool {
        self.grand_total < Decimal::ZERO
    }
}
