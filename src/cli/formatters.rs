use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use tally_config::Config;
use tally_core::{CurrencyFormatter, DateFormatter};

/// Lightweight formatter implementations backed by the active CLI configuration.
#[derive(Clone)]
pub struct CliFormatters {
    config: Arc<RwLock<Config>>,
}

impl CliFormatters {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self { config }
    }

    fn currency_precision(&self, config: &Config) -> usize {
        config
            .currency_precision
            .map(|value| value as usize)
            .unwrap_or(2)
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: Decimal, currency: &str) -> String {
        let config = self.config.read().expect("config formatter lock poisoned");
        let code = if currency.is_empty() {
            config.currency.as_str()
        } else {
            currency
        };
        let precision = self.currency_precision(&config);
        format!("{amount:.precision$} {code}")
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        let config = self.config.read().expect("config formatter lock poisoned");
        date.format(config.date_format.pattern()).to_string()
    }
}
