//! Moving-average and VWAP crossover detectors.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::series;
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required, PULLBACK_PCT};

pub(crate) fn ema_cross_flags(
    frame: &IndicatorFrame,
    fast: usize,
    slow: usize,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let fast_col = required(frame, Column::Ema(fast))?;
    let slow_col = required(frame, Column::Ema(slow))?;
    Ok((
        series::cross_above(fast_col, slow_col),
        series::cross_below(fast_col, slow_col),
    ))
}

pub(crate) fn vwap_cross_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let vwap = required(frame, Column::Vwap(20))?;
    let close = series::to_options(frame.close());
    Ok((
        series::cross_above(&close, vwap),
        series::cross_below(&close, vwap),
    ))
}

/// SMA 50/200 cross with a pullback filter: the close must sit within 3% of
/// the SMA 50 on the crossing day.
pub(crate) fn golden_death_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let sma_50 = required(frame, Column::Sma(50))?;
    let sma_200 = required(frame, Column::Sma(200))?;

    let near_sma = |i: usize| -> bool {
        match sma_50[i] {
            Some(sma) if sma != 0.0 => (frame.close()[i] - sma).abs() / sma <= PULLBACK_PCT,
            _ => false,
        }
    };
    let filter = |flags: Vec<Option<bool>>| -> Vec<Option<bool>> {
        flags
            .into_iter()
            .enumerate()
            .map(|(i, flag)| flag.map(|fired| fired && near_sma(i)))
            .collect()
    };

    Ok((
        filter(series::cross_above(sma_50, sma_200)),
        filter(series::cross_below(sma_50, sma_200)),
    ))
}

pub fn golden_death_cross(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = golden_death_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "Golden Cross",
        Direction::Bullish,
        "MA Crossover",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "Death Cross",
        Direction::Bearish,
        "MA Crossover",
    ));
    signals
}

pub fn ema_10_50_crossover(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = ema_cross_flags(frame, 10, 50) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "EMA 10/50 Bullish Cross",
        Direction::Bullish,
        "MA Crossover",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "EMA 10/50 Bearish Cross",
        Direction::Bearish,
        "MA Crossover",
    ));
    signals
}

pub fn ema_5_20_crossover(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = ema_cross_flags(frame, 5, 20) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "EMA 5/20 Bullish Cross",
        Direction::Bullish,
        "MA Crossover",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "EMA 5/20 Bearish Cross",
        Direction::Bearish,
        "MA Crossover",
    ));
    signals
}

pub fn vwap_crossover(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = vwap_cross_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "VWAP Bullish Cross",
        Direction::Bullish,
        "VWAP",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "VWAP Bearish Cross",
        Direction::Bearish,
        "VWAP",
    ));
    signals
}
