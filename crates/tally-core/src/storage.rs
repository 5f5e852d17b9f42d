use rust_decimal::Decimal;

use tally_domain::{Invoice, SequenceConfig, WorkDefinition};

use crate::{BillingService, CoreError};

/// Abstraction over persistence backends for invoices and work definitions.
pub trait BillingStorage: Send + Sync {
    fn save_invoice(&self, invoice: &Invoice) -> Result<(), CoreError>;
    fn load_invoice(&self, number: &str) -> Result<Invoice, CoreError>;
    fn list_invoices(&self) -> Result<Vec<String>, CoreError>;
    fn delete_invoice(&self, number: &str) -> Result<(), CoreError>;
    fn save_work(&self, work: &WorkDefinition) -> Result<(), CoreError>;
    fn load_work(&self, name: &str) -> Result<WorkDefinition, CoreError>;
    fn list_work(&self) -> Result<Vec<String>, CoreError>;
    fn delete_work(&self, name: &str) -> Result<(), CoreError>;
}

/// Persisted, shared sequence counters keyed by sequence kind.
pub trait SequenceStore: Send + Sync {
    /// Registers or replaces a sequence definition.
    fn define(&self, config: &SequenceConfig) -> Result<(), CoreError>;
    /// Reads a sequence definition without advancing it.
    fn get(&self, key: &str) -> Result<SequenceConfig, CoreError>;
    /// Lists every registered sequence.
    fn list(&self) -> Result<Vec<SequenceConfig>, CoreError>;
    /// Atomically reserves the current number and persists the advanced
    /// counter. The returned config still carries the reserved number in
    /// `next_number`; no two calls can observe the same value.
    fn fetch_and_increment(&self, key: &str) -> Result<SequenceConfig, CoreError>;
}

/// Detects suspicious-but-legal states within an invoice snapshot.
pub fn invoice_warnings(invoice: &Invoice) -> Vec<String> {
    let mut warnings = Vec::new();

    for (index, item) in invoice.line_items.iter().enumerate() {
        if item.description.trim().is_empty() {
            warnings.push(format!("line {} has an empty description", index + 1));
        }
        if item.is_zero() && !item.tax_rate_percent.is_zero() {
            warnings.push(format!(
                "line {} carries a tax rate but amounts to zero",
                index + 1
            ));
        }
    }

    if let Ok(totals) = BillingService::invoice_totals(invoice) {
        if totals.grand_total < Decimal::ZERO {
            warnings.push(format!(
                "discount {} exceeds subtotal plus tax, grand total {} is a credit",
                totals.discount, totals.grand_total
            ));
        }
    }

    warnings
}
