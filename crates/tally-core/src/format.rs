use chrono::NaiveDate;
use rust_decimal::Decimal;

use tally_domain::ResolvedPeriod;

/// Formats currency amounts for presentation. The core hands over exact,
/// unrounded decimals; precision and symbols are the implementer's concern.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;

    /// Renders a period as an inclusive date range.
    fn format_period(&self, period: &ResolvedPeriod) -> String {
        format!(
            "{} .. {}",
            self.format_date(period.start),
            self.format_date(period.end)
        )
    }
}
