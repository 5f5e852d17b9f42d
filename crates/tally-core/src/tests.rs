use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tally_domain::{
    Cadence, LineItem, PeriodSelector, RecurrenceDescriptor, SequenceConfig, WorkDefinition,
};

use crate::{
    storage::SequenceStore, BillingService, CoreError, PeriodService, RecurrenceService,
    SequenceService, WorkService,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn line_amounts_satisfy_the_arithmetic_identities() {
    let item = LineItem::new("Maintenance", dec!(2), dec!(500), dec!(18));
    let amounts = BillingService::compute_line(&item).expect("compute line");
    assert_eq!(amounts.subtotal, item.quantity * item.unit_rate);
    assert_eq!(amounts.total, amounts.subtotal + amounts.tax);
    assert_eq!(amounts.tax, dec!(180));
}

#[test]
fn zero_quantity_yields_zero_not_an_error() {
    let item = LineItem::new("Placeholder", dec!(0), dec!(500), dec!(18));
    let amounts = BillingService::compute_line(&item).expect("compute line");
    assert_eq!(amounts.subtotal, Decimal::ZERO);
    assert_eq!(amounts.tax, Decimal::ZERO);
    assert_eq!(amounts.total, Decimal::ZERO);
}

#[test]
fn negative_inputs_are_a_caller_error() {
    let item = LineItem::new("Broken", dec!(-1), dec!(500), dec!(18));
    match BillingService::compute_line(&item) {
        Err(CoreError::NegativeAmount { field, .. }) => assert_eq!(field, "quantity"),
        other => panic!("expected NegativeAmount, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(
        BillingService::compute_totals(&[], dec!(-5)),
        Err(CoreError::NegativeAmount { field: "discount", .. })
    ));
}

#[test]
fn totals_are_invariant_under_line_reordering() {
    let mut items = vec![
        LineItem::new("A", dec!(2), dec!(500), dec!(18)),
        LineItem::new("B", dec!(1), dec!(1000), dec!(0)),
        LineItem::new("C", dec!(3), dec!(100), dec!(5)),
    ];
    let forward = BillingService::compute_totals(&items, dec!(50)).expect("totals");
    items.reverse();
    let backward = BillingService::compute_totals(&items, dec!(50)).expect("totals");
    assert_eq!(forward, backward);
}

#[test]
fn worked_example_three_lines_with_discount() {
    let items = [
        LineItem::new("Service visits", dec!(2), dec!(500), dec!(18)),
        LineItem::new("Annual fee", dec!(1), dec!(1000), dec!(0)),
        LineItem::new("Spare parts", dec!(3), dec!(100), dec!(5)),
    ];
    let totals = BillingService::compute_totals(&items, dec!(50)).expect("totals");
    assert_eq!(totals.subtotal, dec!(2300));
    assert_eq!(totals.tax_total, dec!(195));
    assert_eq!(totals.grand_total, dec!(2445));
}

#[test]
fn discount_edge_cases_are_not_clamped() {
    let items = [LineItem::new("Only line", dec!(1), dec!(100), dec!(18))];
    let no_discount = BillingService::compute_totals(&items, Decimal::ZERO).expect("totals");
    assert_eq!(no_discount.grand_total, dec!(118));

    let exact = BillingService::compute_totals(&items, dec!(118)).expect("totals");
    assert_eq!(exact.grand_total, Decimal::ZERO);

    let credit = BillingService::compute_totals(&items, dec!(120)).expect("totals");
    assert_eq!(credit.grand_total, dec!(-2));
    assert!(credit.is_credit());
}

#[test]
fn raw_input_defaults_to_zero() {
    assert_eq!(BillingService::amount_or_zero(None), Decimal::ZERO);
    assert_eq!(BillingService::amount_or_zero(Some("")), Decimal::ZERO);
    assert_eq!(BillingService::amount_or_zero(Some("abc")), Decimal::ZERO);
    assert_eq!(BillingService::amount_or_zero(Some(" 12.5 ")), dec!(12.5));

    let line = BillingService::line_from_input("Typed in a hurry", Some("2"), None, Some("x"));
    let amounts = BillingService::compute_line(&line).expect("compute line");
    assert_eq!(amounts.total, Decimal::ZERO);
}

#[test]
fn recurrence_parsing_applies_documented_defaults() {
    let weekly = RecurrenceService::parse("weekly", None, None).expect("weekly");
    assert_eq!(
        weekly.cadence,
        Cadence::Weekly { week_start: Weekday::Mon }
    );
    assert_eq!(weekly.selector, PeriodSelector::Current);

    let monthly = RecurrenceService::parse("monthly", None, Some("previous")).expect("monthly");
    assert_eq!(monthly.cadence, Cadence::Monthly { anchor_day: 1 });
    assert_eq!(monthly.selector, PeriodSelector::Previous);

    let yearly = RecurrenceService::parse("yearly", None, None).expect("yearly");
    assert_eq!(yearly.cadence, Cadence::Yearly { first_month: 4 });

    let half = RecurrenceService::parse("half-yearly", None, None).expect("half-yearly");
    assert_eq!(half.cadence, Cadence::HalfYearly { first_month: 1 });
}

#[test]
fn recurrence_parsing_rejects_out_of_domain_fields() {
    assert!(matches!(
        RecurrenceService::parse("fortnightly", None, None),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        RecurrenceService::parse("monthly", Some("32"), None),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        RecurrenceService::parse("quarterly", Some("13"), None),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        RecurrenceService::parse("daily", Some("3"), None),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        RecurrenceService::parse("weekly", Some("8"), None),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        RecurrenceService::parse("monthly", Some("15"), Some("someday")),
        Err(CoreError::Validation(_))
    ));
}

#[test]
fn daily_periods_are_single_days() {
    let descriptor = RecurrenceService::parse("daily", None, None).expect("daily");
    let today = date(2024, 3, 20);
    let period = PeriodService::resolve(&descriptor, today).expect("resolve");
    assert_eq!(period.start, today);
    assert_eq!(period.end, today);

    let next = RecurrenceService::parse("daily", None, Some("next")).expect("daily next");
    let period = PeriodService::resolve(&next, today).expect("resolve");
    assert_eq!(period.start, date(2024, 3, 21));
}

#[test]
fn weekly_periods_anchor_to_the_week_start() {
    let descriptor = RecurrenceService::parse("weekly", Some("monday"), None).expect("weekly");
    // 2024-03-20 is a Wednesday.
    let period = PeriodService::resolve(&descriptor, date(2024, 3, 20)).expect("resolve");
    assert_eq!(period.start, date(2024, 3, 18));
    assert_eq!(period.end, date(2024, 3, 24));

    // A reference on the anchor day starts its own week.
    let period = PeriodService::resolve(&descriptor, date(2024, 3, 18)).expect("resolve");
    assert_eq!(period.start, date(2024, 3, 18));

    let sunday_start =
        RecurrenceService::parse("weekly", Some("sunday"), Some("previous")).expect("weekly");
    let period = PeriodService::resolve(&sunday_start, date(2024, 3, 20)).expect("resolve");
    assert_eq!(period.start, date(2024, 3, 10));
    assert_eq!(period.end, date(2024, 3, 16));
}

#[test]
fn monthly_anchor_15_worked_example() {
    let descriptor = RecurrenceService::parse("monthly", Some("15"), None).expect("monthly");
    let period = PeriodService::resolve(&descriptor, date(2024, 3, 20)).expect("resolve");
    assert_eq!(period.start, date(2024, 3, 15));
    assert_eq!(period.end, date(2024, 4, 14));
}

#[test]
fn monthly_anchor_clamps_in_short_months() {
    let descriptor = RecurrenceService::parse("monthly", Some("31"), None).expect("monthly");
    // Mid-March 2024: the most recent day-31 anchor clamps to Feb 29.
    let period = PeriodService::resolve(&descriptor, date(2024, 3, 15)).expect("resolve");
    assert_eq!(period.start, date(2024, 2, 29));
    assert_eq!(period.end, date(2024, 3, 30));

    let next = RecurrenceDescriptor::new(
        Cadence::Monthly { anchor_day: 31 },
        PeriodSelector::Next,
    );
    let period = PeriodService::resolve(&next, date(2024, 3, 15)).expect("resolve");
    assert_eq!(period.start, date(2024, 3, 31));
    assert_eq!(period.end, date(2024, 4, 29));
}

#[test]
fn monthly_periods_partition_the_calendar() {
    let descriptor = RecurrenceService::parse("monthly", Some("1"), None).expect("monthly");
    let mut cursor = date(2024, 1, 1);
    for _ in 0..12 {
        let period = PeriodService::resolve(&descriptor, cursor).expect("resolve");
        assert_eq!(period.start, cursor);
        let next_start = period.end + chrono::Duration::days(1);
        // Adjacent periods touch with no gap or overlap.
        let next = PeriodService::resolve(&descriptor, next_start).expect("resolve");
        assert_eq!(next.start, next_start);
        cursor = next_start;
    }
}

#[test]
fn resolution_is_idempotent_within_a_period() {
    let descriptor = RecurrenceService::parse("monthly", Some("15"), None).expect("monthly");
    let first = PeriodService::resolve(&descriptor, date(2024, 3, 15)).expect("resolve");
    let mid = PeriodService::resolve(&descriptor, date(2024, 3, 29)).expect("resolve");
    let last = PeriodService::resolve(&descriptor, date(2024, 4, 14)).expect("resolve");
    assert_eq!(first, mid);
    assert_eq!(mid, last);
}

#[test]
fn quarterly_previous_worked_example() {
    let descriptor =
        RecurrenceService::parse("quarterly", Some("1"), Some("previous")).expect("quarterly");
    let period = PeriodService::resolve(&descriptor, date(2024, 7, 10)).expect("resolve");
    assert_eq!(period.start, date(2024, 4, 1));
    assert_eq!(period.end, date(2024, 6, 30));
}

#[test]
fn quarterly_blocks_align_to_the_anchor_month() {
    // Quarters starting in February: Feb-Apr, May-Jul, Aug-Oct, Nov-Jan.
    let descriptor = RecurrenceService::parse("quarterly", Some("2"), None).expect("quarterly");
    let period = PeriodService::resolve(&descriptor, date(2024, 1, 10)).expect("resolve");
    assert_eq!(period.start, date(2023, 11, 1));
    assert_eq!(period.end, date(2024, 1, 31));
}

#[test]
fn half_yearly_blocks_span_six_months() {
    let descriptor = RecurrenceService::parse("half-yearly", Some("4"), None).expect("half");
    let period = PeriodService::resolve(&descriptor, date(2024, 12, 25)).expect("resolve");
    assert_eq!(period.start, date(2024, 10, 1));
    assert_eq!(period.end, date(2025, 3, 31));
}

#[test]
fn yearly_resolves_the_financial_year() {
    let descriptor = RecurrenceService::parse("yearly", Some("4"), None).expect("yearly");
    // February sits in the financial year that started the previous April.
    let period = PeriodService::resolve(&descriptor, date(2024, 2, 10)).expect("resolve");
    assert_eq!(period.start, date(2023, 4, 1));
    assert_eq!(period.end, date(2024, 3, 31));

    let next = RecurrenceService::parse("yearly", Some("4"), Some("next")).expect("yearly");
    let period = PeriodService::resolve(&next, date(2024, 2, 10)).expect("resolve");
    assert_eq!(period.start, date(2024, 4, 1));
    assert_eq!(period.end, date(2025, 3, 31));
}

#[test]
fn resolver_rejects_descriptors_that_skipped_validation() {
    let mut descriptor = RecurrenceService::parse("monthly", Some("15"), None).expect("monthly");
    descriptor.cadence = Cadence::Monthly { anchor_day: 40 };
    assert!(matches!(
        PeriodService::resolve(&descriptor, date(2024, 3, 20)),
        Err(CoreError::InvalidDescriptor(_))
    ));
}

#[test]
fn sequence_formatting_and_advancing() {
    let config = SequenceConfig::new("invoice", "INV", "", 6, true, 1).expect("config");
    assert_eq!(SequenceService::format_id(&config, 1), "INV000001");
    assert_eq!(SequenceService::format_id(&config, 1_000_000), "INV1000000");

    let (id, advanced) = SequenceService::next_id(&config);
    assert_eq!(id, "INV000001");
    assert_eq!(advanced.next_number, 2);
}

/// In-memory store used to exercise issuance without touching disk.
struct MemorySequenceStore {
    sequences: Mutex<HashMap<String, SequenceConfig>>,
}

impl MemorySequenceStore {
    fn new() -> Self {
        Self {
            sequences: Mutex::new(HashMap::new()),
        }
    }
}

impl SequenceStore for MemorySequenceStore {
    fn define(&self, config: &SequenceConfig) -> Result<(), CoreError> {
        self.sequences
            .lock()
            .expect("sequence store lock poisoned")
            .insert(config.key.clone(), config.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<SequenceConfig, CoreError> {
        self.sequences
            .lock()
            .expect("sequence store lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::SequenceNotFound(key.to_string()))
    }

    fn list(&self) -> Result<Vec<SequenceConfig>, CoreError> {
        let mut entries: Vec<_> = self
            .sequences
            .lock()
            .expect("sequence store lock poisoned")
            .values()
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn fetch_and_increment(&self, key: &str) -> Result<SequenceConfig, CoreError> {
        let mut sequences = self.sequences.lock().expect("sequence store lock poisoned");
        let config = sequences
            .get_mut(key)
            .ok_or_else(|| CoreError::SequenceNotFound(key.to_string()))?;
        let reserved = config.clone();
        *config = config.bumped();
        Ok(reserved)
    }
}

#[test]
fn issuance_hands_out_consecutive_identifiers() {
    let store = MemorySequenceStore::new();
    let config = SequenceConfig::new("invoice", "INV", "", 6, true, 1).expect("config");
    store.define(&config).expect("define");

    assert_eq!(SequenceService::issue(&store, "invoice").expect("issue"), "INV000001");
    assert_eq!(SequenceService::issue(&store, "invoice").expect("issue"), "INV000002");
    assert_eq!(store.get("invoice").expect("get").next_number, 3);

    assert!(matches!(
        SequenceService::issue(&store, "payroll"),
        Err(CoreError::SequenceNotFound(_))
    ));
}

#[test]
fn work_billing_window_follows_the_descriptor() {
    let descriptor =
        RecurrenceService::parse("monthly", Some("15"), Some("current")).expect("monthly");
    let work = WorkDefinition::new("AMC visit", descriptor).with_customer("Acme Traders");

    let window = WorkService::billing_window(&work, date(2024, 3, 20)).expect("window");
    assert_eq!(window.start, date(2024, 3, 15));
    assert_eq!(window.end, date(2024, 4, 14));

    let previous =
        WorkService::window_for_selector(&work, PeriodSelector::Previous, date(2024, 3, 20))
            .expect("window");
    assert_eq!(previous.end + chrono::Duration::days(1), window.start);
}

#[test]
fn inactive_work_has_no_billing_window() {
    let descriptor = RecurrenceService::parse("weekly", None, None).expect("weekly");
    let mut work = WorkDefinition::new("Lawn care", descriptor);
    work.deactivate();
    assert!(matches!(
        WorkService::billing_window(&work, date(2024, 3, 20)),
        Err(CoreError::InvalidOperation(_))
    ));
}
