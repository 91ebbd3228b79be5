use serde::{Deserialize, Serialize};
use ssum_core::{UpdatePolicy, UpdateRule, DEFAULT_EPS};
use thiserror::Error;

pub const DEFAULT_MAX_ITER: usize = 12;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("alpha must lie in [0, 1], got {0}")]
    AlphaOutOfRange(f64),
    #[error("power must be at most {max}, got {power}")]
    PowerTooLarge { power: u32, max: u32 },
}

/// Everything one guarded run needs besides the problem itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    pub x0: f64,
    pub a0: f64,
    pub max_iter: usize,
    /// Floor for residual baselines in the progress ratio.
    pub eps: f64,
    /// Derivatives smaller than this in magnitude are replaced by a signed floor.
    pub derivative_eps: f64,
    /// Step normaliser for the signature; `|x0| + 1` when absent.
    pub dx_scale: Option<f64>,
    pub policy: UpdatePolicy,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            x0: 0.0,
            a0: 0.0,
            max_iter: DEFAULT_MAX_ITER,
            eps: DEFAULT_EPS,
            derivative_eps: DEFAULT_EPS,
            dx_scale: None,
            policy: UpdatePolicy::default(),
        }
    }
}

impl RunParams {
    pub fn new(x0: f64, a0: f64) -> Self {
        Self {
            x0,
            a0,
            ..Self::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_derivative_eps(mut self, derivative_eps: f64) -> Self {
        self.derivative_eps = derivative_eps;
        self
    }

    pub fn with_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn effective_dx_scale(&self) -> f64 {
        self.dx_scale.unwrap_or(self.x0.abs() + 1.0)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        finite("x0", self.x0)?;
        finite("a0", self.a0)?;
        positive("eps", self.eps)?;
        positive("derivative_eps", self.derivative_eps)?;
        if let Some(scale) = self.dx_scale {
            positive("dx_scale", scale)?;
        }
        match self.policy.rule {
            UpdateRule::Smoothed {
                alpha,
                gain,
                gain_s,
            } => {
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(ParamError::AlphaOutOfRange(alpha));
                }
                finite("gain", gain)?;
                finite("gain_s", gain_s)?;
            }
            UpdateRule::Incremental {
                alignment_step,
                contrast_step,
            } => {
                finite("alignment_step", alignment_step)?;
                finite("contrast_step", contrast_step)?;
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ParamError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::NotPositive { field, value })
    }
}
