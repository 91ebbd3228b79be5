use crate::params::ParamError;
use serde::{Deserialize, Serialize};

/// Largest `ShiftedPower` exponent that `powi` can take.
pub const MAX_POWER: u32 = i32::MAX as u32;

/// Residual and derivative of a scalar problem at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub derivative: f64,
}

impl Evaluation {
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.derivative.is_finite()
    }
}

/// A scalar function together with its first derivative.
pub trait ScalarProblem {
    fn evaluate(&self, x: f64) -> Evaluation;
}

impl<F> ScalarProblem for F
where
    F: Fn(f64) -> (f64, f64),
{
    fn evaluate(&self, x: f64) -> Evaluation {
        let (value, derivative) = self(x);
        Evaluation { value, derivative }
    }
}

/// Problems that can be named in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProblemSpec {
    /// Coefficients from the highest degree down to the constant term.
    Polynomial { coefficients: Vec<f64> },
    /// `(x - center)^power`, which has a root of multiplicity `power`.
    ShiftedPower { center: f64, power: u32 },
}

impl ProblemSpec {
    /// `x^3 - 2x - 5`.
    pub fn cubic() -> Self {
        ProblemSpec::Polynomial {
            coefficients: vec![1.0, 0.0, -2.0, -5.0],
        }
    }

    /// `(x - 1)^2`.
    pub fn double_root() -> Self {
        ProblemSpec::ShiftedPower {
            center: 1.0,
            power: 2,
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        match *self {
            ProblemSpec::ShiftedPower { power, .. } if power > MAX_POWER => {
                Err(ParamError::PowerTooLarge {
                    power,
                    max: MAX_POWER,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ProblemSpec::Polynomial { coefficients } => {
                let degree = coefficients.len().saturating_sub(1);
                let terms: Vec<String> = coefficients
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| **c != 0.0)
                    .map(|(i, c)| match degree - i {
                        0 => format!("{c}"),
                        1 => format!("{c}*x"),
                        p => format!("{c}*x^{p}"),
                    })
                    .collect();
                if terms.is_empty() {
                    "0".to_string()
                } else {
                    terms.join(" + ")
                }
            }
            ProblemSpec::ShiftedPower { center, power } => format!("(x - {center})^{power}"),
        }
    }
}

impl ScalarProblem for ProblemSpec {
    fn evaluate(&self, x: f64) -> Evaluation {
        match self {
            ProblemSpec::Polynomial { coefficients } => {
                // Horner on value and derivative together
                let mut value = 0.0;
                let mut derivative = 0.0;
                for &c in coefficients {
                    derivative = derivative * x + value;
                    value = value * x + c;
                }
                Evaluation { value, derivative }
            }
            ProblemSpec::ShiftedPower { center, power } => {
                let d = x - center;
                // unvalidated exponents surface as a non-finite input guard
                let Ok(n) = i32::try_from(*power) else {
                    return Evaluation {
                        value: f64::NAN,
                        derivative: f64::NAN,
                    };
                };
                let value = d.powi(n);
                let derivative = if n == 0 {
                    0.0
                } else {
                    f64::from(*power) * d.powi(n - 1)
                };
                Evaluation { value, derivative }
            }
        }
    }
}
