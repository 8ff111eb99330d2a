//! Bollinger band detectors: re-entry from outside the bands.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::series;
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required};

/// Close crossing back up through the lower band (bullish) or down through
/// the upper band (bearish).
pub(crate) fn bollinger_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let lower = required(frame, Column::BbLower)?;
    let upper = required(frame, Column::BbUpper)?;
    let close = series::to_options(frame.close());
    Ok((
        series::cross_above(&close, lower),
        series::cross_below(&close, upper),
    ))
}

pub fn bollinger_signals(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = bollinger_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "BB Lower Band Recovery",
        Direction::Bullish,
        "Bollinger Bands",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "BB Upper Band Rejection",
        Direction::Bearish,
        "Bollinger Bands",
    ));
    signals
}
