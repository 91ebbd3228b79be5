//! Guarded Newton iteration with a structural side-channel.
//!
//! Every produced quantity is checked for finiteness before it is used. A
//! failed check ends the run (status `bad`) without unwinding past the driver;
//! a near-singular derivative is replaced by a signed floor and only raises
//! the status to `warn`. The structural channel reads the trajectory and never
//! writes to it.

use crate::error::{GuardError, GuardEvent};
use crate::params::RunParams;
use crate::problem::ScalarProblem;
use crate::record::{IterationRecord, RunReport};
use serde::{Deserialize, Serialize};
use ssum_core::{
    clamp01, projection_holds, BaselineConvention, Observation, RapidityState, StatusLevel,
    StructuralValue,
};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    Running,
    HaltedGuard,
    Done,
}

/// One run of the driver, yielding an [`IterationRecord`] per accepted step.
///
/// Status and state can be read between steps. The run is not restartable;
/// build a new one to replay from `x0`.
pub struct GuardedRun<'p, P: ScalarProblem + ?Sized> {
    run: String,
    problem: &'p P,
    params: RunParams,
    dx_scale: f64,
    state: RunState,
    status: StatusLevel,
    k: usize,
    x: f64,
    rapidity: RapidityState,
    /// Residual magnitude the next progress ratio is measured against.
    baseline: f64,
    events: Vec<GuardEvent>,
    halted: Option<GuardError>,
}

impl<'p, P: ScalarProblem + ?Sized> GuardedRun<'p, P> {
    pub fn new(run: impl Into<String>, problem: &'p P, params: RunParams) -> Self {
        let mut this = Self {
            run: run.into(),
            problem,
            params,
            dx_scale: params.effective_dx_scale(),
            state: RunState::Running,
            status: StatusLevel::Ok,
            k: 0,
            x: params.x0,
            rapidity: RapidityState::from_bounded(params.a0, 0.0),
            baseline: params.eps,
            events: Vec::new(),
            halted: None,
        };

        if params.policy.baseline == BaselineConvention::Lagged {
            warn!(
                run = %this.run,
                "lagged progress baseline: progress compares consecutive pre-step residuals"
            );
        }

        let f0 = problem.evaluate(params.x0).value;
        if !params.a0.is_finite() {
            this.halt(GuardError::NonFiniteAlignment {
                k: 0,
                a0: params.a0,
            });
        } else if !params.x0.is_finite() || !f0.is_finite() {
            this.halt(GuardError::NonFiniteInput {
                k: 0,
                x: params.x0,
            });
        } else {
            this.baseline = f0.abs().max(params.eps);
            if params.max_iter == 0 {
                this.state = RunState::Done;
            }
        }
        this
    }

    pub fn run_id(&self) -> &str {
        &self.run
    }

    pub fn status(&self) -> StatusLevel {
        self.status
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Index of the next iteration to be attempted.
    pub fn iteration(&self) -> usize {
        self.k
    }

    pub fn events(&self) -> &[GuardEvent] {
        &self.events
    }

    /// The current iterate with its structure.
    pub fn current(&self) -> StructuralValue {
        StructuralValue::new(
            self.x,
            self.rapidity.alignment_value(),
            self.rapidity.signature_value(),
        )
    }

    /// Runs the remaining iterations and returns what they produced.
    pub fn into_report(mut self) -> RunReport {
        let records: Vec<IterationRecord> = self.by_ref().collect();
        RunReport {
            run: self.run,
            records,
            status: self.status,
            halted: self.halted,
            events: self.events,
        }
    }

    fn note(&mut self, event: GuardEvent) {
        self.status.raise(event.level());
        self.events.push(event);
    }

    fn halt(&mut self, err: GuardError) {
        error!(run = %self.run, k = err.k(), "run halted: {err}");
        self.state = RunState::HaltedGuard;
        self.halted = Some(err);
        self.note(GuardEvent::Halted { error: err });
    }

    fn step(&mut self) -> Result<IterationRecord, GuardError> {
        let k = self.k;
        let x = self.x;
        let eps = self.params.eps;
        let floor = self.params.derivative_eps;

        let eval = self.problem.evaluate(x);
        if !eval.is_finite() {
            return Err(GuardError::NonFiniteInput { k, x });
        }

        let mut denom = eval.derivative;
        if denom.abs() < floor {
            // zero (of either sign) counts as positive
            denom = if eval.derivative >= 0.0 { floor } else { -floor };
            warn!(
                run = %self.run,
                k,
                derivative = eval.derivative,
                denominator = denom,
                "near-zero derivative clamped"
            );
            self.note(GuardEvent::NearSingularDerivative {
                k,
                derivative: eval.derivative,
                denominator: denom,
            });
        }

        let dx = -eval.value / denom;
        if !dx.is_finite() {
            return Err(GuardError::NonFiniteStep { k });
        }

        let x_next = x + dx;
        if !x_next.is_finite() {
            return Err(GuardError::NonFiniteIterate { k });
        }

        let fx_next = self.problem.evaluate(x_next).value;
        if !fx_next.is_finite() {
            return Err(GuardError::NonFiniteResidual { k });
        }

        let residual = match self.params.policy.baseline {
            BaselineConvention::PostStep => fx_next.abs(),
            BaselineConvention::Lagged => eval.value.abs(),
        };
        let r = clamp01(1.0 - residual / self.baseline.max(eps));

        self.rapidity = self.params.policy.advance(
            self.rapidity,
            Observation {
                r,
                dx,
                dx_scale: self.dx_scale,
            },
        );

        let value = StructuralValue::new(
            x_next,
            self.rapidity.alignment_value(),
            self.rapidity.signature_value(),
        );
        let holds = projection_holds(&value, x_next);
        debug_assert!(holds, "projection changed the magnitude at k={k}");
        if !holds {
            error!(run = %self.run, k, "projection invariant violated");
        }

        debug!(
            run = %self.run,
            k,
            m = x_next,
            fx = fx_next,
            dx,
            r,
            a = value.alignment(),
            s = value.signature(),
            "step accepted"
        );

        self.x = x_next;
        self.baseline = residual.max(eps);
        self.k += 1;

        Ok(IterationRecord {
            run: self.run.clone(),
            k,
            m: value.magnitude(),
            fx: fx_next,
            dx,
            a: value.alignment(),
            s: value.signature(),
            band: value.band(),
            projection_holds: holds,
        })
    }
}

impl<P: ScalarProblem + ?Sized> Iterator for GuardedRun<'_, P> {
    type Item = IterationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != RunState::Running {
            return None;
        }
        match self.step() {
            Ok(record) => {
                if self.k >= self.params.max_iter {
                    self.state = RunState::Done;
                }
                Some(record)
            }
            Err(err) => {
                self.halt(err);
                None
            }
        }
    }
}

/// Runs one problem from `params.x0` to completion or the first guard halt.
pub fn run<P: ScalarProblem + ?Sized>(
    run_id: impl Into<String>,
    problem: &P,
    params: RunParams,
) -> RunReport {
    GuardedRun::new(run_id, problem, params).into_report()
}
