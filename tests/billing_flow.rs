use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use tally_core::{
    storage::{invoice_warnings, BillingStorage, SequenceStore},
    BillingService, PeriodService, RecurrenceService, SequenceService, WorkService,
};
use tally_domain::{Invoice, LineItem, SequenceConfig, WorkDefinition};
use tally_storage_json::{JsonBillingStorage, StoragePaths};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn invoice_lifecycle_from_sequence_to_totals() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonBillingStorage::new(StoragePaths::under(dir.path())).expect("storage");

    let sequence = SequenceConfig::new("invoice", "INV", "", 6, true, 1).expect("sequence");
    storage.define(&sequence).expect("define sequence");

    let number = SequenceService::issue(&storage, "invoice").expect("issue number");
    assert_eq!(number, "INV000001");

    let mut invoice = Invoice::new(number, "Acme Traders", date(2024, 3, 20));
    invoice.push_line(LineItem::new("Service visits", dec!(2), dec!(500), dec!(18)));
    invoice.push_line(LineItem::new("Annual fee", dec!(1), dec!(1000), dec!(0)));
    invoice.push_line(LineItem::new("Spare parts", dec!(3), dec!(100), dec!(5)));
    invoice.set_discount(dec!(50));

    let descriptor = RecurrenceService::parse("monthly", Some("15"), None).expect("descriptor");
    let period = PeriodService::resolve(&descriptor, date(2024, 3, 20)).expect("period");
    invoice.service_period = Some(period);

    storage.save_invoice(&invoice).expect("save invoice");
    let loaded = storage.load_invoice("INV000001").expect("load invoice");
    assert_eq!(loaded, invoice);

    let totals = BillingService::invoice_totals(&loaded).expect("totals");
    assert_eq!(totals.subtotal, dec!(2300));
    assert_eq!(totals.tax_total, dec!(195));
    assert_eq!(totals.grand_total, dec!(2445));

    let period = loaded.service_period.expect("service period");
    assert_eq!(period.start, date(2024, 3, 15));
    assert_eq!(period.end, date(2024, 4, 14));
    assert!(invoice_warnings(&loaded).is_empty());
}

#[test]
fn oversized_discount_is_stored_but_flagged() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonBillingStorage::new(StoragePaths::under(dir.path())).expect("storage");

    let mut invoice = Invoice::new("INV000002", "Tiny Shop", date(2024, 4, 1));
    invoice.push_line(LineItem::new("One item", dec!(1), dec!(100), dec!(18)));
    invoice.set_discount(dec!(150));
    storage.save_invoice(&invoice).expect("save invoice");

    let loaded = storage.load_invoice("INV000002").expect("load invoice");
    let totals = BillingService::invoice_totals(&loaded).expect("totals");
    assert_eq!(totals.grand_total, dec!(-32));

    let warnings = invoice_warnings(&loaded);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("credit"));
}

#[test]
fn recurring_work_bills_the_selected_window() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonBillingStorage::new(StoragePaths::under(dir.path())).expect("storage");

    let descriptor =
        RecurrenceService::parse("quarterly", Some("1"), Some("previous")).expect("descriptor");
    let work = WorkDefinition::new("Quarterly audit", descriptor).with_customer("Acme Traders");
    storage.save_work(&work).expect("save work");

    let loaded = storage.load_work("Quarterly audit").expect("load work");
    let window = WorkService::billing_window(&loaded, date(2024, 7, 10)).expect("window");
    assert_eq!(window.start, date(2024, 4, 1));
    assert_eq!(window.end, date(2024, 6, 30));
}
