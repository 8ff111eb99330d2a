//! On-Balance Volume.

/// OBV[0] = volume[0]; up-close days add volume, down-close days subtract,
/// flat days carry forward. Defined for every bar.
pub fn obv(close: &[f64], volume: &[i64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(close.len());
    let mut running = 0.0;
    for i in 0..close.len() {
        if i == 0 {
            running = volume[0] as f64;
        } else if close[i] > close[i - 1] {
            running += volume[i] as f64;
        } else if close[i] < close[i - 1] {
            running -= volume[i] as f64;
        }
        out.push(Some(running));
    }
    out
}
