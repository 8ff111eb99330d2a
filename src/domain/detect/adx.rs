//! Directional-movement cross detector gated on trend strength.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::series;
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required, ADX_TREND_THRESHOLD};

/// +DI crossing -DI, counted only while ADX reads above 20. A cross on a day
/// with ADX undefined or at/below the threshold is suppressed, not deferred.
pub(crate) fn adx_di_cross_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let plus_di = required(frame, Column::PlusDi)?;
    let minus_di = required(frame, Column::MinusDi)?;
    let adx = required(frame, Column::Adx(14))?;

    let trending = |i: usize| -> bool {
        matches!(adx[i], Some(a) if a > ADX_TREND_THRESHOLD)
    };
    let gate = |flags: Vec<Option<bool>>| -> Vec<Option<bool>> {
        flags
            .into_iter()
            .enumerate()
            .map(|(i, flag)| flag.map(|fired| fired && trending(i)))
            .collect()
    };

    Ok((
        gate(series::cross_above(plus_di, minus_di)),
        gate(series::cross_below(plus_di, minus_di)),
    ))
}

pub fn adx_di_cross_signals(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = adx_di_cross_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "ADX +DI Bullish Cross",
        Direction::Bullish,
        "ADX DI Cross",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "ADX -DI Bearish Cross",
        Direction::Bearish,
        "ADX DI Cross",
    ));
    signals
}
