//! Signal detectors and the aggregator.
//!
//! Each detector is a pure function of one instrument's indicator feed
//! returning discrete [`SignalEvent`]s. A detector whose required columns are
//! absent from the feed returns an empty list — it never errors. Crossovers
//! are strict: the previous day's `<=`/`>=` relation must flip to a strict
//! inequality, read through a one-day lag, so the first row never fires.

pub mod ma_crossover;
pub mod rsi;
pub mod combined;
pub mod bollinger;
pub mod atr;
pub mod adx;
pub mod obv;
pub mod stochastic;

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::signal::{Direction, SignalEvent};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_MIDLINE: f64 = 50.0;
pub const STOCH_OVERSOLD: f64 = 20.0;
pub const STOCH_OVERBOUGHT: f64 = 80.0;
pub const ATR_BREAKOUT_MULT: f64 = 1.5;
pub const ADX_TREND_THRESHOLD: f64 = 20.0;
pub const OBV_EMA_PERIOD: usize = 20;
/// Golden/death cross pullback filter: close within 3% of the SMA 50.
pub const PULLBACK_PCT: f64 = 0.03;

/// Run every detector over one instrument's feed and concatenate the output.
/// No cross-detector deduplication; callers sort by date if they need order.
pub fn detect_all(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let mut signals = Vec::new();
    signals.extend(ma_crossover::golden_death_cross(frame, ticker));
    signals.extend(ma_crossover::ema_10_50_crossover(frame, ticker));
    signals.extend(ma_crossover::ema_5_20_crossover(frame, ticker));
    signals.extend(ma_crossover::vwap_crossover(frame, ticker));
    signals.extend(rsi::rsi_oversold_overbought(frame, ticker));
    signals.extend(rsi::rsi_midline_cross(frame, ticker));
    signals.extend(rsi::macd_crossover(frame, ticker));
    signals.extend(combined::combined_momentum(frame, ticker));
    signals.extend(bollinger::bollinger_signals(frame, ticker));
    signals.extend(atr::atr_breakout_signals(frame, ticker));
    signals.extend(adx::adx_di_cross_signals(frame, ticker));
    signals.extend(obv::obv_trend_signals(frame, ticker));
    signals.extend(stochastic::stochastic_signals(frame, ticker));
    signals
}

/// Fetch a column or fail with the column's wire name.
pub(crate) fn required(
    frame: &IndicatorFrame,
    column: Column,
) -> Result<&[Option<f64>], MaplescanError> {
    frame
        .column(column)
        .ok_or_else(|| MaplescanError::MissingIndicator {
            column: column.to_string(),
        })
}

/// Turn per-day firing flags into dated events priced at that day's close.
pub(crate) fn emit(
    frame: &IndicatorFrame,
    ticker: &str,
    flags: &[Option<bool>],
    signal_type: &str,
    direction: Direction,
    strategy: &str,
) -> Vec<SignalEvent> {
    let dates = frame.dates();
    let close = frame.close();
    flags
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag == Some(true))
        .map(|(i, _)| SignalEvent {
            ticker: ticker.to_string(),
            date: dates[i],
            signal_type: signal_type.to_string(),
            direction,
            price: close[i],
            strategy: strategy.to_string(),
        })
        .collect()
}
