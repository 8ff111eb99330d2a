//! Bollinger Bands: SMA middle band with standard-deviation envelopes.

use crate::domain::series;

pub struct Bands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub width: Vec<Option<f64>>,
}

/// middle = SMA(period); upper/lower = middle ± mult * rolling sample std;
/// width = (upper - lower) / middle.
pub fn bollinger(close: &[f64], period: usize, mult: f64) -> Bands {
    let middle = series::rolling_mean(close, period);
    let std = series::rolling_std(close, period);

    let mut upper = Vec::with_capacity(close.len());
    let mut lower = Vec::with_capacity(close.len());
    let mut width = Vec::with_capacity(close.len());

    for i in 0..close.len() {
        match (middle[i], std[i]) {
            (Some(m), Some(s)) => {
                let u = m + s * mult;
                let l = m - s * mult;
                upper.push(Some(u));
                lower.push(Some(l));
                width.push(if m != 0.0 { Some((u - l) / m) } else { None });
            }
            _ => {
                upper.push(None);
                lower.push(None);
                width.push(None);
            }
        }
    }

    Bands {
        upper,
        middle,
        lower,
        width,
    }
}
