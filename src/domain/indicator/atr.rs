//! Average True Range using Wilder's smoothing.

use crate::domain::ohlcv;
use crate::domain::series;

pub(crate) fn true_ranges(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    (0..close.len())
        .map(|i| {
            if i == 0 {
                high[i] - low[i]
            } else {
                ohlcv::true_range(high[i], low[i], close[i - 1])
            }
        })
        .collect()
}

/// ATR = Wilder-smoothed true range (alpha = 1/period, `period`-bar warm-up).
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; close.len()];
    }
    let tr = series::to_options(&true_ranges(high, low, close));
    series::ewm_alpha(&tr, 1.0 / period as f64, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_range_atr_converges_to_range() {
        let n = 30;
        let high = vec![110.0; n];
        let low = vec![90.0; n];
        let close = vec![100.0; n];
        let out = atr(&high, &low, &close, 14);

        assert!(out[12].is_none());
        assert_relative_eq!(out[13].unwrap(), 20.0);
        assert_relative_eq!(out[29].unwrap(), 20.0);
    }

    #[test]
    fn first_true_range_is_high_minus_low() {
        let tr = true_ranges(&[110.0, 115.0], &[90.0, 105.0], &[100.0, 110.0]);
        assert_relative_eq!(tr[0], 20.0);
        // day 1: max(10, |115-100|, |105-100|) = 15
        assert_relative_eq!(tr[1], 15.0);
    }

    #[test]
    fn gap_day_uses_prev_close() {
        // Gap up: high-low = 5 but distance from prior close dominates.
        let tr = true_ranges(&[100.0, 130.0], &[95.0, 125.0], &[98.0, 128.0]);
        assert_relative_eq!(tr[1], 32.0);
    }

    #[test]
    fn wilder_recurrence_step() {
        let high = vec![110.0, 110.0, 130.0];
        let low = vec![90.0, 90.0, 90.0];
        let close = vec![100.0, 100.0, 110.0];
        let out = atr(&high, &low, &close, 2);
        // TRs: 20, 20, 40. Warm-up 2 bars → defined from index 1 at 20,
        // then 20 + 0.5*(40-20) = 30.
        assert!(out[0].is_none());
        assert_relative_eq!(out[1].unwrap(), 20.0);
        assert_relative_eq!(out[2].unwrap(), 30.0);
    }
}
