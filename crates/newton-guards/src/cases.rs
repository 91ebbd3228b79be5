//! Named problem/run bundles reproducing the observatory's Newton cases.

use crate::driver;
use crate::params::{ParamError, RunParams};
use crate::problem::ProblemSpec;
use crate::record::{ReportSet, RunReport};
use serde::{Deserialize, Serialize};
use ssum_core::UpdatePolicy;
use std::thread;

/// Starting point of one run inside a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSeed {
    pub name: String,
    pub x0: f64,
    #[serde(default)]
    pub a0: f64,
}

impl RunSeed {
    pub fn new(name: impl Into<String>, x0: f64, a0: f64) -> Self {
        Self {
            name: name.into(),
            x0,
            a0,
        }
    }
}

/// A problem, shared parameters and the independent runs to evaluate on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    pub problem: ProblemSpec,
    /// Shared parameters; `x0` and `a0` come from each seed.
    #[serde(default)]
    pub params: RunParams,
    pub runs: Vec<RunSeed>,
}

impl Case {
    pub fn params_for(&self, seed: &RunSeed) -> RunParams {
        RunParams {
            x0: seed.x0,
            a0: seed.a0,
            ..self.params
        }
    }

    pub fn run_id(&self, seed: &RunSeed) -> String {
        format!("{}/{}", self.name, seed.name)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        self.problem.validate()?;
        self.runs
            .iter()
            .try_for_each(|seed| self.params_for(seed).validate())
    }

    fn run_one(&self, seed: &RunSeed) -> RunReport {
        driver::run(self.run_id(seed), &self.problem, self.params_for(seed))
    }

    /// Evaluates every run in declaration order.
    pub fn run(&self) -> ReportSet {
        self.runs.iter().map(|seed| self.run_one(seed)).collect()
    }

    /// Evaluates runs on scoped threads; the merged set keeps declaration order.
    pub fn run_parallel(&self) -> ReportSet {
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .runs
                .iter()
                .map(|seed| scope.spawn(move || self.run_one(seed)))
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(report) => report,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

pub const NEWTON_ROOT: &str = "newton-root";
pub const NEAR_SINGULAR: &str = "near-singular";
pub const MULTIPLE_ROOT: &str = "multiple-root";

/// `x^3 - 2x - 5` from a stable and an unstable start.
pub fn newton_root() -> Case {
    Case {
        name: NEWTON_ROOT.into(),
        problem: ProblemSpec::cubic(),
        params: RunParams::default(),
        runs: vec![
            RunSeed::new("stable", 2.0, 0.70),
            RunSeed::new("unstable", -3.0, 0.70),
        ],
    }
}

/// Same cubic started next to the derivative's zero at `sqrt(2/3)`.
pub fn near_singular() -> Case {
    Case {
        name: NEAR_SINGULAR.into(),
        problem: ProblemSpec::cubic(),
        params: RunParams::default()
            .with_derivative_eps(1e-15)
            .with_policy(UpdatePolicy::incremental(0.15, 0.05)),
        runs: vec![
            RunSeed::new("stable", 2.0, 0.70),
            RunSeed::new("near_singular", 0.82, 0.70),
        ],
    }
}

/// `(x - 1)^2`: linear convergence onto a root where `f'` vanishes.
pub fn multiple_root() -> Case {
    Case {
        name: MULTIPLE_ROOT.into(),
        problem: ProblemSpec::double_root(),
        // floor sized to the problem so the vanishing derivative is reported
        params: RunParams::default()
            .with_derivative_eps(1e-2)
            .with_policy(UpdatePolicy::incremental(0.10, 0.05)),
        runs: vec![RunSeed::new("double_root", 1.8, 0.70)],
    }
}

pub fn builtin_cases() -> Vec<Case> {
    vec![newton_root(), near_singular(), multiple_root()]
}

pub fn find_case(name: &str) -> Option<Case> {
    builtin_cases().into_iter().find(|c| c.name == name)
}
