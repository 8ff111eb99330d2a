//! Stochastic %K/%D cross detector gated on extreme prior readings.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::series;
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required, STOCH_OVERBOUGHT, STOCH_OVERSOLD};

/// %K crossing %D, counted only when yesterday's %K sat in the extreme zone
/// (below 20 for bullish, above 80 for bearish). The gate reads the lagged
/// %K so the cross confirms an exit from the extreme, not a wiggle mid-range.
pub(crate) fn stochastic_cross_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let k = required(frame, Column::StochK)?;
    let d = required(frame, Column::StochD)?;

    let prior_k_in = |i: usize, test: &dyn Fn(f64) -> bool| -> bool {
        i > 0 && matches!(k[i - 1], Some(v) if test(v))
    };
    let gate = |flags: Vec<Option<bool>>, test: &dyn Fn(f64) -> bool| -> Vec<Option<bool>> {
        flags
            .into_iter()
            .enumerate()
            .map(|(i, flag)| flag.map(|fired| fired && prior_k_in(i, test)))
            .collect()
    };

    Ok((
        gate(series::cross_above(k, d), &|v| v < STOCH_OVERSOLD),
        gate(series::cross_below(k, d), &|v| v > STOCH_OVERBOUGHT),
    ))
}

pub fn stochastic_signals(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = stochastic_cross_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "Stochastic Bullish Cross",
        Direction::Bullish,
        "Stochastic",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "Stochastic Bearish Cross",
        Direction::Bearish,
        "Stochastic",
    ));
    signals
}
