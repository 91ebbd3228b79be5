use crate::bounded::{clamp, DEFAULT_EPS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One structured iterate `(m, a, s)`.
///
/// `m` is the classical iterate and is never transformed. `a` (alignment) and
/// `s` (signature) live strictly inside (-1, 1), deserialized input included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStructuralValue")]
pub struct StructuralValue {
    m: f64,
    a: f64,
    s: f64,
}

#[derive(Deserialize)]
struct RawStructuralValue {
    m: f64,
    a: f64,
    s: f64,
}

impl From<RawStructuralValue> for StructuralValue {
    fn from(raw: RawStructuralValue) -> Self {
        Self::new(raw.m, raw.a, raw.s)
    }
}

impl StructuralValue {
    pub fn new(m: f64, a: f64, s: f64) -> Self {
        Self {
            m,
            a: clamp(a, DEFAULT_EPS),
            s: clamp(s, DEFAULT_EPS),
        }
    }

    /// Value with neutral alignment and signature.
    pub fn from_magnitude(m: f64) -> Self {
        Self::new(m, 0.0, 0.0)
    }

    pub fn magnitude(&self) -> f64 {
        self.m
    }

    pub fn alignment(&self) -> f64 {
        self.a
    }

    pub fn signature(&self) -> f64 {
        self.s
    }

    pub fn band(&self) -> Band {
        band(self.a)
    }
}

/// Collapses a structured value back to its classical magnitude.
pub fn projection(value: &StructuralValue) -> f64 {
    value.m
}

/// Bit-level check that `projection(value)` is exactly `m`.
pub fn projection_holds(value: &StructuralValue, m: f64) -> bool {
    projection(value).to_bits() == m.to_bits()
}

/// Display classification of alignment. Ties go to the more extreme band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Band {
    StrongNegative,
    Negative,
    Neutral,
    Positive,
    StrongPositive,
}

impl Band {
    pub fn label(self) -> &'static str {
        match self {
            Band::StrongPositive => "strong-positive",
            Band::Positive => "positive",
            Band::Neutral => "neutral",
            Band::Negative => "negative",
            Band::StrongNegative => "strong-negative",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn band(a: f64) -> Band {
    if a >= 0.90 {
        Band::StrongPositive
    } else if a >= 0.60 {
        Band::Positive
    } else if a > -0.60 {
        Band::Neutral
    } else if a > -0.90 {
        Band::Negative
    } else {
        Band::StrongNegative
    }
}
