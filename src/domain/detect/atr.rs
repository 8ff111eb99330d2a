//! ATR range-expansion breakout detector.

use crate::domain::error::MaplescanError;
use crate::domain::feed::{Column, IndicatorFrame};
use crate::domain::signal::{Direction, SignalEvent};

use super::{emit, required, ATR_BREAKOUT_MULT};

/// Close moving more than 1.5 ATRs beyond the prior close in a single day.
/// This is a magnitude test, not a crossover: it fires on every qualifying
/// day. Undefined on the first row and wherever the prior ATR is undefined.
pub(crate) fn atr_breakout_flags(
    frame: &IndicatorFrame,
) -> Result<(Vec<Option<bool>>, Vec<Option<bool>>), MaplescanError> {
    let atr = required(frame, Column::Atr(14))?;
    let close = frame.close();

    let mut up = Vec::with_capacity(frame.len());
    let mut down = Vec::with_capacity(frame.len());
    for i in 0..frame.len() {
        if i == 0 {
            up.push(None);
            down.push(None);
            continue;
        }
        match atr[i - 1] {
            Some(prev_atr) => {
                let band = ATR_BREAKOUT_MULT * prev_atr;
                up.push(Some(close[i] > close[i - 1] + band));
                down.push(Some(close[i] < close[i - 1] - band));
            }
            None => {
                up.push(None);
                down.push(None);
            }
        }
    }
    Ok((up, down))
}

pub fn atr_breakout_signals(frame: &IndicatorFrame, ticker: &str) -> Vec<SignalEvent> {
    let Ok((bullish, bearish)) = atr_breakout_flags(frame) else {
        return Vec::new();
    };
    let mut signals = emit(
        frame,
        ticker,
        &bullish,
        "ATR Breakout Up",
        Direction::Bullish,
        "ATR Breakout",
    );
    signals.extend(emit(
        frame,
        ticker,
        &bearish,
        "ATR Breakdown",
        Direction::Bearish,
        "ATR Breakout",
    ));
    signals
}
