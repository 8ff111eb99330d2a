//! MACD line, signal line, and histogram.

use crate::domain::series;

/// MACD = EMA(fast) - EMA(slow); signal = EMA(macd, signal_period);
/// histogram = macd - signal. Defined from the first bar (adjust=False EMAs).
pub fn macd(
    close: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let ema_fast = series::ewm_mean(close, fast);
    let ema_slow = series::ewm_mean(close, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = series::ewm_mean(&line, signal_period);
    let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    (
        series::to_options(&line),
        series::to_options(&signal),
        series::to_options(&histogram),
    )
}
