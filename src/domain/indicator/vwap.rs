//! Rolling volume-weighted average price approximation.

use crate::domain::ohlcv;
use crate::domain::series;

/// VWAP over a fixed lookback: sum(typical_price * volume) / sum(volume).
/// Undefined during warm-up and on windows with zero total volume.
pub fn vwap(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[i64],
    window: usize,
) -> Vec<Option<f64>> {
    let tp_volume: Vec<f64> = (0..close.len())
        .map(|i| ohlcv::typical_price(high[i], low[i], close[i]) * volume[i] as f64)
        .collect();
    let volume_f: Vec<f64> = volume.iter().map(|&v| v as f64).collect();

    let tpv_sum = series::rolling_sum(&tp_volume, window);
    let vol_sum = series::rolling_sum(&volume_f, window);

    tpv_sum
        .iter()
        .zip(&vol_sum)
        .map(|(tpv, vol)| match (tpv, vol) {
            (Some(t), Some(v)) if *v > 0.0 => Some(t / v),
            _ => None,
        })
        .collect()
}
