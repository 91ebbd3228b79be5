use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Run-scoped health summary. Ordered `Ok < Warn < Bad`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum StatusLevel {
    #[default]
    Ok,
    Warn,
    Bad,
}

impl StatusLevel {
    /// Raises the level to `level` if that is worse; never lowers it.
    pub fn raise(&mut self, level: StatusLevel) {
        if level > *self {
            *self = level;
        }
    }

    pub fn worst(self, other: StatusLevel) -> StatusLevel {
        self.max(other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusLevel::Ok => "ok",
            StatusLevel::Warn => "warn",
            StatusLevel::Bad => "bad",
        }
    }

    /// Numeric code used by gauges: 0, 1, 2.
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status level {0:?}, expected ok, warn or bad")]
pub struct ParseStatusError(pub String);

impl FromStr for StatusLevel {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" => Ok(StatusLevel::Ok),
            "warn" => Ok(StatusLevel::Warn),
            "bad" => Ok(StatusLevel::Bad),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
