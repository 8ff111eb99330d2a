//! OBV trend detector: OBV crossing its own 20-day EMA.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::series;
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required, OBV_EMA_PERIOD};

pub(crate) fn obv_trend_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let obv = required(frame, Column::Obv)?;
    let baseline = series::ewm_mean_opt(obv, OBV_EMA_PERIOD);
    Ok((
        series::cross_above(obv, &baseline),
        series::cross_below(obv, &baseline),
    ))
}

pub fn obv_trend_signals(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = obv_trend_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "OBV Bullish Cross",
        Direction::Bullish,
        "OBV Trend",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "OBV Bearish Cross",
        Direction::Bearish,
        "OBV Trend",
    ));
    signals
}
