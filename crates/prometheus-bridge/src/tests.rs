use crate::{encode, exceeds_status_budget, ObservatoryMetrics};
use newton_guards::cases::{multiple_root, newton_root};
use prometheus::Registry;
use ssum_core::StatusLevel;

#[test]
fn status_budget_follows_worst_run() {
    let registry = Registry::new();
    let metrics = ObservatoryMetrics::new(&registry).unwrap();

    let ok = newton_root().run();
    assert!(!exceeds_status_budget(&metrics, &ok, StatusLevel::Ok));

    let warn = multiple_root().run();
    assert!(exceeds_status_budget(&metrics, &warn, StatusLevel::Ok));
    assert!(!exceeds_status_budget(&metrics, &warn, StatusLevel::Warn));

    let status = metrics
        .run_status
        .with_label_values(&["multiple-root/double_root"])
        .get();
    assert_eq!(status, 1);
}

#[test]
fn repeated_budget_checks_do_not_inflate_counters() {
    let registry = Registry::new();
    let metrics = ObservatoryMetrics::new(&registry).unwrap();
    let reports = multiple_root().run();
    metrics.observe_set(&reports);

    for budget in [StatusLevel::Ok, StatusLevel::Warn, StatusLevel::Bad] {
        exceeds_status_budget(&metrics, &reports, budget);
    }

    let run = "multiple-root/double_root";
    assert_eq!(metrics.iterations_total.with_label_values(&[run]).get(), 12);
    let warnings = metrics
        .guard_events_total
        .with_label_values(&[run, "near-singular-derivative"])
        .get();
    let expected = reports.reports()[0].events.len() as u64;
    assert_eq!(warnings, expected);
}

#[test]
fn report_lands_in_text_exposition() {
    let registry = Registry::new();
    let metrics = ObservatoryMetrics::new(&registry).unwrap();
    let reports = multiple_root().run();
    metrics.observe_set(&reports);

    let status = metrics
        .run_status
        .with_label_values(&["multiple-root/double_root"])
        .get();
    assert_eq!(status, 1);
    let iterations = metrics
        .iterations_total
        .with_label_values(&["multiple-root/double_root"])
        .get();
    assert_eq!(iterations, 12);

    let text = encode(&registry).unwrap();
    assert!(text.contains("ssum_run_status"));
    assert!(text.contains("near-singular-derivative"));
}

#[test]
fn metrics_register_once_per_registry() {
    let registry = Registry::new();
    ObservatoryMetrics::new(&registry).unwrap();
    assert!(ObservatoryMetrics::new(&registry).is_err());
}
