//! Exponential and simple moving averages over close prices.
//!
//! EMA uses the adjust=False recurrence: k = 2/(n+1), seed with the first
//! close, EMA[i] = C[i]*k + EMA[i-1]*(1-k) — defined from the first bar.
//! SMA has the usual (n-1)-bar warm-up.

use crate::domain::series;

pub fn ema(close: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; close.len()];
    }
    series::to_options(&series::ewm_mean(close, period))
}

pub fn sma(close: &[f64], period: usize) -> Vec<Option<f64>> {
    series::rolling_mean(close, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_defined_from_first_bar() {
        let out = ema(&[10.0, 20.0, 30.0], 3);
        assert!(out.iter().all(|v| v.is_some()));
        assert_relative_eq!(out[0].unwrap(), 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ema(&[10.0, 20.0, 30.0], 3);
        let k = 2.0 / 4.0;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        assert_relative_eq!(out[1].unwrap(), e1);
        assert_relative_eq!(out[2].unwrap(), e2);
    }

    #[test]
    fn ema_equal_prices() {
        let out = ema(&[100.0; 5], 3);
        for v in out {
            assert_relative_eq!(v.unwrap(), 100.0);
        }
    }

    #[test]
    fn ema_period_0_is_undefined() {
        assert_eq!(ema(&[10.0, 20.0], 0), vec![None, None]);
    }

    #[test]
    fn sma_warmup_and_mean() {
        let out = sma(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_relative_eq!(out[2].unwrap(), 20.0);
        assert_relative_eq!(out[3].unwrap(), 30.0);
    }
}
