//! Numeric primitives that keep bounded channels inside the open interval (-1, 1)
//! and map them to and from the real line.

/// Default distance kept from the ±1 boundary.
pub const DEFAULT_EPS: f64 = 1e-12;

/// Beyond this magnitude `tanh` is ±1 in double precision.
const TANH_SATURATION: f64 = 20.0;

/// Maps `x` into `[-1 + eps, 1 - eps]`.
///
/// NaN passes through unchanged; callers check finiteness first.
pub fn clamp(x: f64, eps: f64) -> f64 {
    if x > 1.0 - eps {
        1.0 - eps
    } else if x < -1.0 + eps {
        -1.0 + eps
    } else {
        x
    }
}

/// Inverse hyperbolic tangent over the clamped input, finite for every finite `x`.
pub fn atanh(x: f64) -> f64 {
    atanh_with(x, DEFAULT_EPS)
}

/// [`atanh`] with a caller-chosen distance from the ±1 boundary.
pub fn atanh_with(x: f64, eps: f64) -> f64 {
    let y = clamp(x, eps);
    0.5 * ((1.0 + y) / (1.0 - y)).ln()
}

/// Hyperbolic tangent that saturates to exactly ±1 for large `|x|`,
/// including infinities.
pub fn tanh(x: f64) -> f64 {
    if x >= TANH_SATURATION {
        1.0
    } else if x <= -TANH_SATURATION {
        -1.0
    } else {
        x.tanh()
    }
}

/// Clamps `r` into `[0, 1]`.
pub fn clamp01(r: f64) -> f64 {
    r.clamp(0.0, 1.0)
}
