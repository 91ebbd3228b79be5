//! Shared problems for the cross-crate scenario tests.

use newton_guards::{IterationRecord, RunParams};

pub fn cubic(x: f64) -> (f64, f64) {
    (x * x * x - 2.0 * x - 5.0, 3.0 * x * x - 2.0)
}

pub fn double_root(x: f64) -> (f64, f64) {
    ((x - 1.0) * (x - 1.0), 2.0 * (x - 1.0))
}

/// Problem with a derivative that is exactly zero at the origin.
pub fn flat_at_origin(x: f64) -> (f64, f64) {
    (x * x - 4.0, 2.0 * x)
}

pub fn scenario_params(x0: f64) -> RunParams {
    RunParams::new(x0, 0.70).with_max_iter(12)
}

pub fn bits(records: &[IterationRecord]) -> Vec<[u64; 5]> {
    records
        .iter()
        .map(|r| {
            [
                r.m.to_bits(),
                r.fx.to_bits(),
                r.dx.to_bits(),
                r.a.to_bits(),
                r.s.to_bits(),
            ]
        })
        .collect()
}
