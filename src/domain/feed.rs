//! Columnar indicator feed for one instrument.
//!
//! `Column` identifies an indicator column plus its parameters and doubles as
//! the map key; its `Display` form is the wire/database column name (`ema_10`,
//! `macd_signal`, ...). `IndicatorFrame` holds the raw OHLCV arrays with a
//! shared ascending date index and a sparse set of indicator columns, each
//! `Vec<Option<f64>>` aligned row-for-row with the dates. `None` means the
//! value is undefined (warm-up), never zero; an absent map entry means the
//! column was not computed for this feed at all.

use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Ema(usize),
    Sma(usize),
    Rsi(usize),
    Macd,
    MacdSignal,
    MacdHistogram,
    Vwap(usize),
    Atr(usize),
    BbUpper,
    BbMiddle,
    BbLower,
    BbWidth,
    Adx(usize),
    PlusDi,
    MinusDi,
    Obv,
    StochK,
    StochD,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Ema(period) => write!(f, "ema_{}", period),
            Column::Sma(period) => write!(f, "sma_{}", period),
            Column::Rsi(period) => write!(f, "rsi_{}", period),
            Column::Macd => write!(f, "macd"),
            Column::MacdSignal => write!(f, "macd_signal"),
            Column::MacdHistogram => write!(f, "macd_histogram"),
            Column::Vwap(period) => write!(f, "vwap_{}", period),
            Column::Atr(period) => write!(f, "atr_{}", period),
            Column::BbUpper => write!(f, "bb_upper"),
            Column::BbMiddle => write!(f, "bb_middle"),
            Column::BbLower => write!(f, "bb_lower"),
            Column::BbWidth => write!(f, "bb_width"),
            Column::Adx(period) => write!(f, "adx_{}", period),
            Column::PlusDi => write!(f, "plus_di"),
            Column::MinusDi => write!(f, "minus_di"),
            Column::Obv => write!(f, "obv"),
            Column::StochK => write!(f, "stoch_k"),
            Column::StochD => write!(f, "stoch_d"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    dates: Vec<NaiveDate>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<i64>,
    columns: HashMap<Column, Vec<Option<f64>>>,
}

impl IndicatorFrame {
    /// Build a frame from price bars, sorting by date and keeping the first
    /// bar per date so the one-row-per-date invariant holds.
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let mut sorted: Vec<&PriceBar> = bars.iter().collect();
        sorted.sort_by_key(|b| b.date);
        sorted.dedup_by_key(|b| b.date);

        let mut frame = IndicatorFrame::default();
        for bar in sorted {
            frame.dates.push(bar.date);
            frame.open.push(bar.open);
            frame.high.push(bar.high);
            frame.low.push(bar.low);
            frame.close.push(bar.close);
            frame.volume.push(bar.volume);
        }
        frame
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[i64] {
        &self.volume
    }

    /// Indicator column, or `None` when it was never computed for this feed.
    pub fn column(&self, column: Column) -> Option<&[Option<f64>]> {
        self.columns.get(&column).map(|v| v.as_slice())
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    /// Attach an indicator column. Values must align with the date index.
    pub fn insert_column(&mut self, column: Column, values: Vec<Option<f64>>) {
        assert_eq!(
            values.len(),
            self.dates.len(),
            "column {} length does not match frame",
            column
        );
        self.columns.insert(column, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                ticker: "TEST.TO".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn column_display_names() {
        assert_eq!(Column::Ema(10).to_string(), "ema_10");
        assert_eq!(Column::Sma(200).to_string(), "sma_200");
        assert_eq!(Column::Rsi(14).to_string(), "rsi_14");
        assert_eq!(Column::MacdSignal.to_string(), "macd_signal");
        assert_eq!(Column::Vwap(20).to_string(), "vwap_20");
        assert_eq!(Column::PlusDi.to_string(), "plus_di");
        assert_eq!(Column::StochK.to_string(), "stoch_k");
    }

    #[test]
    fn from_bars_sorts_by_date() {
        let mut bars = make_bars(&[10.0, 20.0, 30.0]);
        bars.reverse();
        let frame = IndicatorFrame::from_bars(&bars);
        assert_eq!(frame.close(), &[10.0, 20.0, 30.0]);
        assert!(frame.dates().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn from_bars_dedups_dates() {
        let mut bars = make_bars(&[10.0, 20.0]);
        bars.push(bars[1].clone());
        let frame = IndicatorFrame::from_bars(&bars);
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn column_lookup() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let mut frame = IndicatorFrame::from_bars(&bars);
        assert!(frame.column(Column::Obv).is_none());

        frame.insert_column(Column::Obv, vec![Some(1.0), Some(2.0), Some(3.0)]);
        let obv = frame.column(Column::Obv).unwrap();
        assert_eq!(obv.len(), 3);
        assert!(frame.has_column(Column::Obv));
    }

    #[test]
    #[should_panic]
    fn insert_column_length_mismatch_panics() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let mut frame = IndicatorFrame::from_bars(&bars);
        frame.insert_column(Column::Obv, vec![Some(1.0)]);
    }
}
