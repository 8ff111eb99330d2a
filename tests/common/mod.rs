//! Shared fixtures for integration tests.

use chrono::NaiveDate;
use maplescan::domain::error::MaplescanError;
use maplescan::domain::feed::IndicatorFrame;
use maplescan::domain::indicator;
use maplescan::domain::ohlcv::PriceBar;
use maplescan::ports::data_port::DataPort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date_str: &str, close: f64) -> PriceBar {
    PriceBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1_000_000,
    }
}

/// Bars from a dense close series, one calendar day apart.
pub fn bars_from_closes(ticker: &str, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            ticker: ticker.to_string(),
            date: date(2023, 1, 1) + chrono::Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000_000,
        })
        .collect()
}

/// Drifts down for the first half, recovers in the second. The turn crosses
/// most fast/slow indicator pairs at least once.
pub fn v_shape_closes(n: usize) -> Vec<f64> {
    let half = n / 2;
    let mut closes: Vec<f64> = (0..half).map(|i| 100.0 - i as f64 * 0.5).collect();
    let bottom = closes.last().copied().unwrap_or(100.0);
    closes.extend((0..n - half).map(|i| bottom + i as f64 * 0.8));
    closes
}

pub fn enriched_frame(bars: &[PriceBar]) -> IndicatorFrame {
    let mut frame = IndicatorFrame::from_bars(bars);
    indicator::enrich(&mut frame);
    frame
}

/// In-memory data port keyed by ticker.
pub struct MockDataPort {
    bars: HashMap<String, Vec<PriceBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        MockDataPort {
            bars: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.bars.insert(ticker.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self, ticker: &str) -> Result<Vec<PriceBar>, MaplescanError> {
        match self.bars.get(ticker) {
            Some(bars) => Ok(bars.clone()),
            None => Err(MaplescanError::NoData {
                ticker: ticker.to_string(),
            }),
        }
    }

    fn list_tickers(&self) -> Result<Vec<String>, MaplescanError> {
        let mut tickers: Vec<String> = self.bars.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, MaplescanError> {
        let bars = self.fetch_prices(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
