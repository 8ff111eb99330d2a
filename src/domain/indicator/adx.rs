//! Average Directional Index with +DI/-DI.

use crate::domain::indicator::atr::true_ranges;
use crate::domain::series;

/// Wilder's ADX. Directional movement keeps only the dominant positive side;
/// +DI/-DI are the smoothed movements normalized by smoothed true range; ADX
/// is smoothed DX with a doubled warm-up (2 * period observations).
/// DI values are undefined where the smoothed TR is zero; DX is undefined
/// where +DI + -DI is zero.
pub fn adx(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let n = close.len();
    if period == 0 || n == 0 {
        return (vec![None; n], vec![None; n], vec![None; n]);
    }

    let mut plus_dm = Vec::with_capacity(n);
    let mut minus_dm = Vec::with_capacity(n);
    for i in 0..n {
        let (up, down) = if i == 0 {
            (0.0, 0.0)
        } else {
            (high[i] - high[i - 1], low[i - 1] - low[i])
        };
        plus_dm.push(Some(if up > down && up > 0.0 { up } else { 0.0 }));
        minus_dm.push(Some(if down > up && down > 0.0 { down } else { 0.0 }));
    }

    let alpha = 1.0 / period as f64;
    let tr = series::to_options(&true_ranges(high, low, close));
    let atr_smooth = series::ewm_alpha(&tr, alpha, period);
    let plus_smooth = series::ewm_alpha(&plus_dm, alpha, period);
    let minus_smooth = series::ewm_alpha(&minus_dm, alpha, period);

    let di = |dm: &[Option<f64>]| -> Vec<Option<f64>> {
        dm.iter()
            .zip(&atr_smooth)
            .map(|(d, a)| match (d, a) {
                (Some(d), Some(a)) if *a > 0.0 => Some(100.0 * d / a),
                _ => None,
            })
            .collect()
    };
    let plus_di = di(&plus_smooth);
    let minus_di = di(&minus_smooth);

    let dx: Vec<Option<f64>> = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(p, m)| match (p, m) {
            (Some(p), Some(m)) if p + m > 0.0 => Some(100.0 * (p - m).abs() / (p + m)),
            _ => None,
        })
        .collect();
    let adx = series::ewm_alpha(&dx, alpha, period * 2);

    (plus_di, minus_di, adx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_up(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        (high, low, close)
    }

    #[test]
    fn warmup_lengths() {
        let (high, low, close) = trending_up(60);
        let (plus_di, _, adx) = adx(&high, &low, &close, 14);
        assert!(plus_di[..13].iter().all(|v| v.is_none()));
        assert!(plus_di[13].is_some());
        // ADX needs 2*period DX observations on top of the DI warm-up.
        assert!(adx[..40].iter().all(|v| v.is_none()));
        assert!(adx[40].is_some());
    }

    #[test]
    fn uptrend_plus_di_dominates() {
        let (high, low, close) = trending_up(60);
        let (plus_di, minus_di, adx) = adx(&high, &low, &close, 14);
        assert!(plus_di[59].unwrap() > minus_di[59].unwrap());
        assert!(adx[59].unwrap() > 20.0);
    }

    #[test]
    fn downtrend_minus_di_dominates() {
        let close: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        let (plus_di, minus_di, _) = adx(&high, &low, &close, 14);
        assert!(minus_di[59].unwrap() > plus_di[59].unwrap());
    }

    #[test]
    fn flat_series_is_undefined() {
        // Zero range and zero movement: smoothed TR is 0 → DI undefined.
        let flat = vec![100.0; 40];
        let (plus_di, minus_di, adx) = adx(&flat, &flat, &flat, 14);
        assert!(plus_di.iter().all(|v| v.is_none()));
        assert!(minus_di.iter().all(|v| v.is_none()));
        assert!(adx.iter().all(|v| v.is_none()));
    }
}
