//! Scan universe: the configured ticker list and its validation.
//!
//! Parses ticker lists from configuration and checks that each ticker has
//! enough stored history to be worth scanning.

use crate::domain::error::MaplescanError;
use crate::ports::data_port::DataPort;
use std::collections::HashSet;

pub const MIN_PRICE_BARS: usize = 30;

#[derive(Debug, Clone)]
pub struct Universe {
    pub tickers: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.tickers.len()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Parse a comma-separated ticker list: trimmed, uppercased, no blanks or
/// duplicates.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if seen.contains(&ticker) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        seen.insert(ticker.clone());
        tickers.push(ticker);
    }

    Ok(tickers)
}

pub struct UniverseValidationResult {
    pub universe: Universe,
    pub skipped: Vec<SkippedTicker>,
}

#[derive(Debug, Clone)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub enum SkipReason {
    NoData,
    InsufficientBars { bars: usize },
}

/// Keep tickers with at least [`MIN_PRICE_BARS`] stored bars; warn and skip
/// the rest. An entirely empty universe is an error.
pub fn validate_universe(
    data_port: &dyn DataPort,
    tickers: Vec<String>,
) -> Result<UniverseValidationResult, MaplescanError> {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();

    for ticker in tickers {
        let bars = match data_port.fetch_prices(&ticker) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", ticker, e);
                skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason: SkipReason::NoData,
                });
                continue;
            }
        };

        if bars.is_empty() {
            eprintln!("Warning: skipping {} (no data found)", ticker);
            skipped.push(SkippedTicker {
                ticker: ticker.clone(),
                reason: SkipReason::NoData,
            });
            continue;
        }

        if bars.len() < MIN_PRICE_BARS {
            eprintln!(
                "Warning: skipping {} (only {} bars, minimum {} required)",
                ticker,
                bars.len(),
                MIN_PRICE_BARS
            );
            skipped.push(SkippedTicker {
                ticker: ticker.clone(),
                reason: SkipReason::InsufficientBars { bars: bars.len() },
            });
            continue;
        }

        eprintln!("  {}: {} bars [OK]", ticker, bars.len());
        valid.push(ticker);
    }

    if valid.is_empty() {
        return Err(MaplescanError::InsufficientData {
            ticker: "all".to_string(),
            bars: 0,
            minimum: MIN_PRICE_BARS,
        });
    }

    if !skipped.is_empty() {
        eprintln!(
            "Scanning {} of {} tickers",
            valid.len(),
            valid.len() + skipped.len()
        );
    }

    Ok(UniverseValidationResult {
        universe: Universe { tickers: valid },
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tickers_basic() {
        let result = parse_tickers("RY.TO,TD.TO,ENB.TO").unwrap();
        assert_eq!(result, vec!["RY.TO", "TD.TO", "ENB.TO"]);
    }

    #[test]
    fn test_parse_tickers_with_whitespace() {
        let result = parse_tickers("  RY.TO , TD.TO ,ENB.TO  ").unwrap();
        assert_eq!(result, vec!["RY.TO", "TD.TO", "ENB.TO"]);
    }

    #[test]
    fn test_parse_tickers_uppercase() {
        let result = parse_tickers("ry.to,td.to").unwrap();
        assert_eq!(result, vec!["RY.TO", "TD.TO"]);
    }

    #[test]
    fn test_parse_tickers_single() {
        let result = parse_tickers("RY.TO").unwrap();
        assert_eq!(result, vec!["RY.TO"]);
    }

    #[test]
    fn test_parse_tickers_empty_token() {
        let result = parse_tickers("RY.TO,,TD.TO");
        assert!(matches!(result, Err(UniverseError::EmptyToken)));
    }

    #[test]
    fn test_parse_tickers_duplicate() {
        let result = parse_tickers("RY.TO,TD.TO,ry.to");
        assert!(matches!(result, Err(UniverseError::DuplicateTicker(s)) if s == "RY.TO"));
    }

    #[test]
    fn test_universe_count() {
        let universe = Universe {
            tickers: vec!["RY.TO".to_string(), "TD.TO".to_string()],
        };
        assert_eq!(universe.count(), 2);
    }
}
