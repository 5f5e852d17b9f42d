use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

/// Stores user-configurable CLI preferences and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub currency_precision: Option<u8>,
    #[serde(default)]
    pub date_format: DateFormatStyle,
    #[serde(default = "Config::default_cadence_value")]
    pub default_cadence: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for billing data. Defaults to `~/Documents/Billing`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            currency_precision: None,
            date_format: DateFormatStyle::default(),
            default_cadence: Self::default_cadence_value(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_cadence_value() -> String {
        "monthly".into()
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Billing")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateFormatStyle {
    Iso,
    Slash,
}

impl DateFormatStyle {
    /// chrono format string for the style.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormatStyle::Iso => "%Y-%m-%d",
            DateFormatStyle::Slash => "%d/%m/%Y",
        }
    }
}

impl Default for DateFormatStyle {
    fn default() -> Self {
        DateFormatStyle::Iso
    }
}

impl fmt::Display for DateFormatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateFormatStyle::Iso => "iso",
            DateFormatStyle::Slash => "slash",
        };
        f.write_str(label)
    }
}
