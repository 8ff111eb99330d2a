//! RSI threshold/midline detectors and the MACD line cross.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::series;
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required, RSI_MIDLINE, RSI_OVERBOUGHT, RSI_OVERSOLD};

fn level(n: usize, value: f64) -> Vec<Option<f64>> {
    vec![Some(value); n]
}

/// RSI 14 crossing back up through 30 (recovery) or down through 70
/// (reversal).
pub(crate) fn rsi_threshold_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let rsi = required(frame, Column::Rsi(14))?;
    Ok((
        series::cross_above(rsi, &level(rsi.len(), RSI_OVERSOLD)),
        series::cross_below(rsi, &level(rsi.len(), RSI_OVERBOUGHT)),
    ))
}

/// RSI 21 crossing the 50 midline in either direction.
pub(crate) fn rsi_midline_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let rsi = required(frame, Column::Rsi(21))?;
    Ok((
        series::cross_above(rsi, &level(rsi.len(), RSI_MIDLINE)),
        series::cross_below(rsi, &level(rsi.len(), RSI_MIDLINE)),
    ))
}

/// MACD line crossing its signal line.
pub(crate) fn macd_cross_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let line = required(frame, Column::Macd)?;
    let signal = required(frame, Column::MacdSignal)?;
    Ok((
        series::cross_above(line, signal),
        series::cross_below(line, signal),
    ))
}

pub fn rsi_oversold_overbought(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = rsi_threshold_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "RSI Oversold Recovery",
        Direction::Bullish,
        "RSI",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "RSI Overbought Reversal",
        Direction::Bearish,
        "RSI",
    ));
    signals
}

pub fn rsi_midline_cross(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = rsi_midline_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "RSI Midline Bullish",
        Direction::Bullish,
        "RSI",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "RSI Midline Bearish",
        Direction::Bearish,
        "RSI",
    ));
    signals
}

pub fn macd_crossover(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = macd_cross_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "MACD Bullish Cross",
        Direction::Bullish,
        "MACD",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "MACD Bearish Cross",
        Direction::Bearish,
        "MACD",
    ));
    signals
}
