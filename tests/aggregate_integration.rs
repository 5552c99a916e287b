use std::collections::BTreeMap;

use order_report::{
    AccumulationStore, Money, OrderRecord, ReportDate, ReportError, ReportId, Selection, Summary,
    parse, progress, top_n,
};

fn order(number: &str, work_type: &str, amount: i64) -> OrderRecord {
    OrderRecord {
        number: number.to_string(),
        code: format!("C-{number}"),
        description: String::new(),
        work_type: work_type.to_string(),
        amount: Money::from(amount),
        date: ReportDate::Unknown,
        parameters: BTreeMap::new(),
    }
}

fn fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[test]
fn summary_of_empty_set_has_zero_average() {
    let summary = Summary::from_records(std::iter::empty());
    assert_eq!(summary.order_count, 0);
    assert!(summary.total_revenue.is_zero());
    assert!(summary.average_check.is_zero());
    assert!(summary.by_type.is_empty());
}

#[test]
fn summary_groups_by_type_in_first_seen_order() {
    let records = vec![
        order("1", "Склейка", 100),
        order("2", "Распил", 50),
        order("3", "", 20),
        order("4", "Склейка", 30),
    ];
    let summary = Summary::from_records(&records);

    assert_eq!(summary.total_revenue, Money::from(200));
    assert_eq!(summary.order_count, 4);
    assert_eq!(summary.average_check, Money::from(50));

    let types: Vec<&str> = summary.revenue_by_type().map(|(t, _)| t).collect();
    assert_eq!(types, ["Склейка", "Распил", ""]);
    let counts: Vec<usize> = summary.count_by_type().map(|(_, c)| c).collect();
    assert_eq!(counts, [2, 1, 1]);

    assert_eq!(summary.revenue_for("Склейка"), Some(Money::from(130)));
    assert_eq!(summary.count_for(""), Some(1));
    assert_eq!(summary.revenue_for("Кромка"), None);
}

#[test]
fn average_check_is_rounded_to_kopecks() {
    let records = vec![order("1", "A", 10), order("2", "A", 10), order("3", "A", 0)];
    let summary = Summary::from_records(&records);
    assert_eq!(summary.average_check, Money::new(667, 2));
}

#[test]
fn top_n_is_stable_for_equal_amounts() {
    let records = vec![
        order("1", "A", 50),
        order("2", "A", 100),
        order("3", "A", 100),
        order("4", "A", 30),
    ];
    let top = top_n(&records, 2);
    let numbers: Vec<&str> = top.iter().map(|o| o.number.as_str()).collect();
    assert_eq!(numbers, ["2", "3"]);

    assert_eq!(top_n(&records, 10).len(), 4);
    assert!(top_n(&records, 0).is_empty());
}

#[test]
fn progress_is_capped_and_rounded() {
    assert_eq!(progress(Money::from(250), Money::from(1000)).unwrap(), 25);
    assert_eq!(progress(Money::from(5000), Money::from(1000)).unwrap(), 100);
    assert_eq!(progress(Money::new(125, 1), Money::from(1000)).unwrap(), 1);
    assert_eq!(progress(Money::new(5, 0), Money::from(1000)).unwrap(), 1);
    assert_eq!(progress(Money::from(-10), Money::from(1000)).unwrap(), 0);
}

#[test]
fn progress_rejects_non_positive_target() {
    assert!(matches!(
        progress(Money::from(10), Money::ZERO),
        Err(ReportError::InvalidTarget { .. })
    ));
    assert!(matches!(
        progress(Money::from(10), Money::from(-5)),
        Err(ReportError::InvalidTarget { .. })
    ));
}

#[test]
fn store_accumulates_and_removes_by_report() {
    let mut store = AccumulationStore::new();
    let first = store.ingest(parse("№1. A (Распил)\nСумма: 10,00 ₽\n---\n№2. B (Кромка)\nСумма: 5,00 ₽\n").unwrap());
    let second = store.ingest(parse("№1. C (Распил)\nСумма: 7,00 ₽\n").unwrap());
    assert_ne!(first, second);
    assert_eq!(store.len(), 3);

    // Номера повторяются между выгрузками.
    let ones = store.select(&Selection::all()).filter(|o| o.number == "1").count();
    assert_eq!(ones, 2);

    let summary = store.summary(&Selection::work_type("Распил"));
    assert_eq!(summary.order_count, 2);
    assert_eq!(summary.total_revenue, Money::from(17));

    let summary = store.summary(&Selection::report(first));
    assert_eq!(summary.order_count, 2);
    assert_eq!(summary.total_revenue, Money::from(15));

    assert_eq!(store.remove_report(first), Some(2));
    assert_eq!(store.len(), 1);
    assert_eq!(store.reports().len(), 1);
    assert!(store.report(first).is_none());
    assert_eq!(store.remove_report(first), None);
    assert_eq!(store.remove_report(ReportId(42)), None);

    assert_eq!(store.remove_report(second), Some(1));
    assert!(store.is_empty());
}

#[test]
fn store_top_n_orders_ties_by_ingestion() {
    let mut store = AccumulationStore::new();
    store.ingest(parse("№1. A\nСумма: 100,00 ₽\n").unwrap());
    store.ingest(parse("№1. B\nСумма: 100,00 ₽\n---\n№2. C\nСумма: 200,00 ₽\n").unwrap());
    let top = top_n(store.select(&Selection::all()), 3);
    let codes: Vec<&str> = top.iter().map(|o| o.code.as_str()).collect();
    assert_eq!(codes, ["C", "A", "B"]);
}

#[test]
fn store_loads_fixture_dir() {
    let store = AccumulationStore::from_dir(fixtures_dir()).expect("load fixtures");
    let sources: Vec<_> = store
        .reports()
        .iter()
        .map(|r| r.source.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(sources, ["2024-02-01.txt", "2024-02-02.txt"]);
    assert_eq!(store.len(), 5);
    assert_eq!(store.declared_total(), Money::new(245_050, 2));

    let summary = store.summary(&Selection::all());
    assert_eq!(summary.revenue_for("Распил"), Some(Money::new(133_506, 2)));
}

#[test]
fn parse_real_dir_if_present() {
    if let Ok(dir) = std::env::var("REAL_REPORT_DIR") {
        let store = AccumulationStore::from_dir(&dir).expect("parse real reports");
        assert!(!store.reports().is_empty());
    }
}
