//! Bar interval, expressed as amount × unit (e.g. `1D`, `5m`, `4h`).
//!
//! Parsing and display use the compact CLI/TOML form (`"5m"`, `"1D"`, `"6M"`).
//! [`Timeframe::range_segment`] renders the `{multiplier}/{timespan}` pair used
//! in the upstream aggregates path.

use std::{fmt, num::NonZeroU32, str::FromStr};

use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeframeError {
    #[error("empty timeframe")]
    Empty,

    #[error("invalid timeframe amount in {0:?}")]
    InvalidAmount(String),

    #[error("unknown timeframe unit {0:?} (expected one of m, h, D, W, M)")]
    UnknownUnit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeframeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeframeUnit {
    fn timespan(self) -> &'static str {
        match self {
            TimeframeUnit::Minute => "minute",
            TimeframeUnit::Hour => "hour",
            TimeframeUnit::Day => "day",
            TimeframeUnit::Week => "week",
            TimeframeUnit::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    pub amount: NonZeroU32,
    pub unit: TimeframeUnit,
}

impl Timeframe {
    pub const DAILY: Timeframe = Timeframe::new(nonzero!(1u32), TimeframeUnit::Day);

    pub const fn new(amount: NonZeroU32, unit: TimeframeUnit) -> Self {
        Self { amount, unit }
    }

    /// `"1/day"`, `"5/minute"`, ...
    pub fn range_segment(&self) -> String {
        format!("{}/{}", self.amount, self.unit.timespan())
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::DAILY
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            TimeframeUnit::Minute => "m",
            TimeframeUnit::Hour => "h",
            TimeframeUnit::Day => "D",
            TimeframeUnit::Week => "W",
            TimeframeUnit::Month => "M",
        };
        write!(f, "{}{u}", self.amount)
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(unit_ch) = s.chars().last() else {
            return Err(TimeframeError::Empty);
        };
        let digits = &s[..s.len() - unit_ch.len_utf8()];
        let amount = digits
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| TimeframeError::InvalidAmount(s.to_string()))?;
        let unit = match unit_ch {
            'm' => TimeframeUnit::Minute,
            'h' => TimeframeUnit::Hour,
            'D' | 'd' => TimeframeUnit::Day,
            'W' | 'w' => TimeframeUnit::Week,
            'M' => TimeframeUnit::Month,
            other => return Err(TimeframeError::UnknownUnit(other.to_string())),
        };
        Ok(Timeframe::new(amount, unit))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(value: Timeframe) -> Self {
        value.to_string()
    }
}
