use newton_guards::{run, GuardEvent, GuardedRun, RunParams};
use proptest::prelude::*;
use ssum_core::{projection_holds, StatusLevel, StructuralValue, UpdatePolicy};
use ssum_integration_tests::{bits, cubic, double_root, flat_at_origin, scenario_params};

#[test]
fn converging_cubic_reports_ok() {
    let report = run("stable", &cubic, scenario_params(2.0));
    assert_eq!(report.status, StatusLevel::Ok);
    assert_eq!(report.records.len(), 12);

    let head: Vec<f64> = report.records[..4].iter().map(|r| r.fx.abs()).collect();
    assert!(head.windows(2).all(|w| w[1] < w[0]));
    assert!(report.records.iter().all(|r| r.fx.abs() < 0.1));
    assert!(report.last().unwrap().fx.abs() < 1e-12);
}

#[test]
fn cubic_from_minus_three_reaches_the_cap() {
    let report = run("unstable", &cubic, scenario_params(-3.0));
    assert!(report.status <= StatusLevel::Warn);
    assert_eq!(report.records.len(), 12);
    assert!(report
        .records
        .iter()
        .all(|r| r.m.is_finite() && r.fx.is_finite()));
}

#[test]
fn double_root_raises_warn_with_problem_sized_floor() {
    let params = scenario_params(1.8).with_derivative_eps(1e-2);
    let report = run("double_root", &double_root, params);
    assert!(report.status >= StatusLevel::Warn);
    assert_ne!(report.status, StatusLevel::Bad);
    assert!(report.records.iter().all(|r| r.m.is_finite()));
}

#[test]
fn zero_derivative_is_substituted_and_run_continues() {
    let report = run("flat", &flat_at_origin, RunParams::new(0.0, 0.7).with_max_iter(6));
    assert_eq!(report.status, StatusLevel::Warn);
    assert_eq!(report.records.len(), 6);
    assert!(matches!(
        report.events[0],
        GuardEvent::NearSingularDerivative { k: 0, denominator, .. } if denominator > 0.0
    ));
    // it walks back toward the root at 2 once the derivative is usable
    let ms: Vec<f64> = report.records.iter().map(|r| r.m).collect();
    assert!(ms.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn status_never_improves_within_a_run() {
    let mut guarded = GuardedRun::new("flat", &flat_at_origin, RunParams::new(0.0, 0.0));
    let mut trail = vec![guarded.status()];
    while guarded.next().is_some() {
        trail.push(guarded.status());
    }
    assert!(trail.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*trail.last().unwrap(), StatusLevel::Warn);
}

#[test]
fn records_serialize_for_external_renderers() {
    let report = run("stable", &cubic, scenario_params(2.0));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["records"][0]["k"], 0);
    assert!(json["records"][0]["band"].is_string());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn driver_output_keeps_invariants(
        x0 in -20.0f64..20.0,
        a0 in -0.99f64..0.99,
        alpha in 0.0f64..1.0,
        gain in 0.0f64..5.0,
        gain_s in 0.0f64..5.0,
    ) {
        let params = RunParams::new(x0, a0)
            .with_policy(UpdatePolicy::smoothed(alpha, gain, gain_s));
        let first = run("p", &cubic, params);
        let second = run("p", &cubic, params);

        prop_assert_eq!(bits(&first.records), bits(&second.records));
        prop_assert_eq!(first.status, second.status);

        for r in &first.records {
            prop_assert!(r.a > -1.0 && r.a < 1.0);
            prop_assert!(r.s > -1.0 && r.s < 1.0);
            prop_assert!(r.projection_holds);
            let value = StructuralValue::new(r.m, r.a, r.s);
            prop_assert!(projection_holds(&value, r.m));
        }
    }
}
