//! Relative Strength Index using Wilder's smoothing.
//!
//! Gains/losses from one-day close deltas (first delta counts as zero), each
//! smoothed with alpha = 1/period and a `period`-observation warm-up.
//! RSI = 100 - 100/(1+RS); pegged at 100 when the average loss is zero.

use crate::domain::series;

pub fn rsi(close: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || close.is_empty() {
        return vec![None; close.len()];
    }

    let mut gains = Vec::with_capacity(close.len());
    let mut losses = Vec::with_capacity(close.len());
    for i in 0..close.len() {
        let delta = if i == 0 { 0.0 } else { close[i] - close[i - 1] };
        gains.push(Some(delta.max(0.0)));
        losses.push(Some((-delta).max(0.0)));
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = series::ewm_alpha(&gains, alpha, period);
    let avg_loss = series::ewm_alpha(&losses, alpha, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(g), Some(l)) => {
                if *l == 0.0 {
                    Some(100.0)
                } else {
                    let rs = g / l;
                    Some(100.0 - 100.0 / (1.0 + rs))
                }
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_warmup_length() {
        let close: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&close, 14);
        assert!(out[..13].iter().all(|v| v.is_none()));
        assert!(out[13].is_some());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let close: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&close, 14);
        assert!((out[19].unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_near_zero() {
        let close: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&close, 14);
        assert!(out[19].unwrap() < 1.0);
    }

    #[test]
    fn rsi_flat_series_is_100() {
        // No losses at all: avg_loss = 0 → pegged at 100.
        let out = rsi(&[100.0; 20], 14);
        assert!((out[19].unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_bounded_0_100() {
        let close: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.9).sin() * 10.0)
            .collect();
        for v in rsi(&close, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
