use serde::{Deserialize, Serialize};
use ssum_core::StatusLevel;
use thiserror::Error;

/// Conditions that end a run early. Each is fatal to its own run only.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GuardError {
    #[error("f(x) or f'(x) is not finite at k={k} (x={x})")]
    NonFiniteInput { k: usize, x: f64 },
    #[error("starting alignment is not finite at k={k} (a0={a0})")]
    NonFiniteAlignment { k: usize, a0: f64 },
    #[error("step dx is not finite at k={k}")]
    NonFiniteStep { k: usize },
    #[error("next iterate is not finite at k={k}")]
    NonFiniteIterate { k: usize },
    #[error("f(x_next) is not finite at k={k}")]
    NonFiniteResidual { k: usize },
}

impl GuardError {
    pub fn k(&self) -> usize {
        match *self {
            GuardError::NonFiniteInput { k, .. }
            | GuardError::NonFiniteAlignment { k, .. }
            | GuardError::NonFiniteStep { k }
            | GuardError::NonFiniteIterate { k }
            | GuardError::NonFiniteResidual { k } => k,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GuardError::NonFiniteInput { .. } => "non-finite-input",
            GuardError::NonFiniteAlignment { .. } => "non-finite-alignment",
            GuardError::NonFiniteStep { .. } => "non-finite-step",
            GuardError::NonFiniteIterate { .. } => "non-finite-iterate",
            GuardError::NonFiniteResidual { .. } => "non-finite-residual",
        }
    }
}

/// Something a guard noticed during a run, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GuardEvent {
    /// `|f'(x)|` fell under the floor and `denominator` was used instead.
    NearSingularDerivative {
        k: usize,
        derivative: f64,
        denominator: f64,
    },
    Halted { error: GuardError },
}

impl GuardEvent {
    pub fn level(&self) -> StatusLevel {
        match self {
            GuardEvent::NearSingularDerivative { .. } => StatusLevel::Warn,
            GuardEvent::Halted { .. } => StatusLevel::Bad,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GuardEvent::NearSingularDerivative { .. } => "near-singular-derivative",
            GuardEvent::Halted { error } => error.kind(),
        }
    }

    pub fn k(&self) -> usize {
        match self {
            GuardEvent::NearSingularDerivative { k, .. } => *k,
            GuardEvent::Halted { error } => error.k(),
        }
    }
}
