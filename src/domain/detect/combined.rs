//! Combined momentum detector: a conjunction of trend, momentum and volume
//! conditions that fires only on the day the conjunction becomes true.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required, RSI_MIDLINE, RSI_OVERBOUGHT, RSI_OVERSOLD};

/// Per-day conjunction state, then edge-detect: the flag is true where the
/// state is true today and was not true yesterday. Undefined where any input
/// is undefined.
fn transitions(state: &[Option<bool>]) -> Vec<Option<bool>> {
    state
        .iter()
        .enumerate()
        .map(|(i, s)| {
            s.map(|now| {
                let prev_true = i > 0 && state[i - 1] == Some(true);
                now && !prev_true
            })
        })
        .collect()
}

pub(crate) fn combined_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let ema_10 = required(frame, Column::Ema(10))?;
    let ema_50 = required(frame, Column::Ema(50))?;
    let rsi = required(frame, Column::Rsi(14))?;
    let histogram = required(frame, Column::MacdHistogram)?;
    let vwap = required(frame, Column::Vwap(20))?;
    let close = frame.close();

    let mut bull_state = Vec::with_capacity(frame.len());
    let mut bear_state = Vec::with_capacity(frame.len());
    for i in 0..frame.len() {
        match (ema_10[i], ema_50[i], rsi[i], histogram[i], vwap[i]) {
            (Some(e10), Some(e50), Some(r), Some(h), Some(v)) => {
                let c = close[i];
                bull_state.push(Some(
                    e10 > e50 && r > RSI_MIDLINE && r < RSI_OVERBOUGHT && h > 0.0 && c > v,
                ));
                bear_state.push(Some(
                    e10 < e50 && r > RSI_OVERSOLD && r < RSI_MIDLINE && h < 0.0 && c < v,
                ));
            }
            _ => {
                bull_state.push(None);
                bear_state.push(None);
            }
        }
    }

    Ok((transitions(&bull_state), transitions(&bear_state)))
}

pub fn combined_momentum(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = combined_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "Combined Momentum Bullish",
        Direction::Bullish,
        "Combined",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "Combined Momentum Bearish",
        Direction::Bearish,
        "Combined",
    ));
    signals
}
