//! Update rules that operate on the unbounded rapidity representation
//! `u = atanh(a)` and re-bound through `tanh`.

use crate::bounded::{atanh, clamp, clamp01, tanh, DEFAULT_EPS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALPHA: f64 = 0.35;
pub const DEFAULT_GAIN: f64 = 2.20;
pub const DEFAULT_GAIN_S: f64 = 1.40;

/// Hard limit on rapidity so `tanh(u)` never rounds to ±1.
pub const U_MAX: f64 = 6.0;

fn clamp_u(u: f64) -> f64 {
    u.clamp(-U_MAX, U_MAX)
}

/// Exponential smoothing of alignment rapidity toward `gain * (2r - 1)`.
pub fn update_alignment(u_prev: f64, r: f64, alpha: f64, gain: f64) -> f64 {
    let u_target = gain * (2.0 * clamp01(r) - 1.0);
    clamp_u((1.0 - alpha) * u_prev + alpha * u_target)
}

/// Signed, bounded contrast of a step `dx` normalised by `dx_scale`.
pub fn signature_from_step(dx: f64, dx_scale: f64, gain_s: f64) -> f64 {
    let dn = dx.abs() / dx_scale.max(DEFAULT_EPS);
    // saturating steps would otherwise land exactly on ±1
    let val = clamp(tanh(gain_s * dn), DEFAULT_EPS);
    if dx >= 0.0 {
        val
    } else {
        -val
    }
}

/// Working rapidity of both structural channels.
///
/// The bounded signature is kept as the rule produced it, so a signature
/// computed directly from the step is never round-tripped through `atanh`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RapidityState {
    pub alignment: f64,
    pub signature: f64,
    s: f64,
}

impl RapidityState {
    pub fn from_bounded(a: f64, s: f64) -> Self {
        let s = clamp(s, DEFAULT_EPS);
        Self {
            alignment: atanh(a),
            signature: atanh(s),
            s,
        }
    }

    fn from_rapidity(alignment: f64, signature: f64) -> Self {
        Self {
            alignment,
            signature,
            s: tanh(signature),
        }
    }

    pub fn alignment_value(&self) -> f64 {
        tanh(self.alignment)
    }

    pub fn signature_value(&self) -> f64 {
        self.s
    }
}

/// What one accepted step contributes to the structural update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Progress ratio in [0, 1].
    pub r: f64,
    pub dx: f64,
    pub dx_scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum UpdateRule {
    /// Alignment relaxes toward a progress target; signature is recomputed
    /// from the latest step alone.
    Smoothed { alpha: f64, gain: f64, gain_s: f64 },
    /// Both channels accumulate fixed-size rapidity nudges.
    Incremental {
        alignment_step: f64,
        contrast_step: f64,
    },
}

impl Default for UpdateRule {
    fn default() -> Self {
        UpdateRule::Smoothed {
            alpha: DEFAULT_ALPHA,
            gain: DEFAULT_GAIN,
            gain_s: DEFAULT_GAIN_S,
        }
    }
}

/// Which residual the progress ratio is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaselineConvention {
    /// Post-step residual of this iteration against the post-step residual of
    /// the previous accepted iteration.
    #[default]
    PostStep,
    /// Pre-step residual of this iteration against the previous pre-step
    /// residual, so progress trails the iterate by one step.
    Lagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePolicy {
    pub rule: UpdateRule,
    pub baseline: BaselineConvention,
}

impl UpdatePolicy {
    pub fn smoothed(alpha: f64, gain: f64, gain_s: f64) -> Self {
        Self {
            rule: UpdateRule::Smoothed {
                alpha,
                gain,
                gain_s,
            },
            baseline: BaselineConvention::PostStep,
        }
    }

    pub fn incremental(alignment_step: f64, contrast_step: f64) -> Self {
        Self {
            rule: UpdateRule::Incremental {
                alignment_step,
                contrast_step,
            },
            baseline: BaselineConvention::PostStep,
        }
    }

    pub fn with_baseline(mut self, baseline: BaselineConvention) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn advance(&self, state: RapidityState, obs: Observation) -> RapidityState {
        match self.rule {
            UpdateRule::Smoothed {
                alpha,
                gain,
                gain_s,
            } => {
                let s = signature_from_step(obs.dx, obs.dx_scale, gain_s);
                RapidityState {
                    alignment: update_alignment(state.alignment, obs.r, alpha, gain),
                    signature: atanh(s),
                    s,
                }
            }
            UpdateRule::Incremental {
                alignment_step,
                contrast_step,
            } => {
                let direction = if obs.dx > 0.0 {
                    1.0
                } else if obs.dx < 0.0 {
                    -1.0
                } else {
                    0.0
                };
                RapidityState::from_rapidity(
                    clamp_u(state.alignment + (2.0 * clamp01(obs.r) - 1.0) * alignment_step),
                    clamp_u(state.signature + direction * obs.dx.abs().min(1.0) * contrast_step),
                )
            }
        }
    }
}
