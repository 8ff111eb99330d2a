//! Discrete trade signal events.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "bullish"),
            Direction::Bearish => write!(f, "bearish"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bullish" => Ok(Direction::Bullish),
            "bearish" => Ok(Direction::Bearish),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// One detector firing on one date. Immutable once created; multiple
/// detectors may fire on the same date, uniqueness is only
/// (ticker, date, signal_type) at the persistence boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub ticker: String,
    pub date: NaiveDate,
    pub signal_type: String,
    pub direction: Direction,
    pub price: f64,
    pub strategy: String,
}
