//! Stochastic oscillator (%K / %D).

use crate::domain::series;

/// Raw %K = 100 * (close - LL) / (HH - LL) over the %K lookback; %D is the
/// simple moving average of %K over the %D period. %K is undefined while the
/// lookback is warming up and on windows with zero high-low range.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_period: usize,
    d_period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let lowest = series::rolling_min(low, k_period);
    let highest = series::rolling_max(high, k_period);

    let k: Vec<Option<f64>> = (0..close.len())
        .map(|i| match (lowest[i], highest[i]) {
            (Some(ll), Some(hh)) if hh > ll => Some(100.0 * (close[i] - ll) / (hh - ll)),
            _ => None,
        })
        .collect();

    let mut d = Vec::with_capacity(k.len());
    for i in 0..k.len() {
        if d_period == 0 || i + 1 < d_period {
            d.push(None);
            continue;
        }
        let window = &k[i + 1 - d_period..=i];
        if window.iter().all(|v| v.is_some()) {
            let sum: f64 = window.iter().map(|v| v.unwrap()).sum();
            d.push(Some(sum / d_period as f64));
        } else {
            d.push(None);
        }
    }

    (k, d)
}
