//! Aligned-series utilities: rolling windows, exponential smoothing, and
//! strict crossover tests.
//!
//! All functions return vectors aligned element-for-element with their input.
//! `None` marks an undefined value (warm-up or missing input), never zero.
//! Each rolling/exponential operator is a stateful scan with a fixed
//! recurrence; the recurrences match the feed conventions exactly so numeric
//! results are reproducible bit-for-bit within floating-point tolerance.

/// Wrap a dense series in the optional representation.
pub fn to_options(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Rolling sum over a fixed window; undefined for the first window-1 rows.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum));
        } else {
            out.push(None);
        }
    }
    out
}

/// Rolling arithmetic mean over a fixed window.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_sum(values, window)
        .into_iter()
        .map(|s| s.map(|sum| sum / window as f64))
        .collect()
}

/// Rolling sample standard deviation (ddof = 1). Windows of size 1 are
/// undefined; variance is recomputed per window to avoid drift.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window < 2 || i + 1 < window {
            out.push(None);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        out.push(Some(var.sqrt()));
    }
    out
}

/// Rolling minimum over a fixed window.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, |slice| {
        slice.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

/// Rolling maximum over a fixed window.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, |slice| {
        slice.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

fn rolling_fold(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            out.push(None);
        } else {
            out.push(Some(f(&values[i + 1 - window..=i])));
        }
    }
    out
}

/// Exponential moving average, span form with adjust=False semantics:
/// k = 2/(span+1), seeded with the first value, y[i] = k*x[i] + (1-k)*y[i-1].
/// Defined from the first row onward.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;
    for (i, &v) in values.iter().enumerate() {
        ema = if i == 0 { v } else { v * k + ema * (1.0 - k) };
        out.push(ema);
    }
    out
}

/// [`ewm_mean`] over an optional series. The recurrence is seeded at the
/// first defined value; undefined inputs produce undefined outputs without
/// advancing the state.
pub fn ewm_mean_opt(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    ewm_alpha(values, 2.0 / (span as f64 + 1.0), 0)
}

/// Exponential smoothing in alpha form with a minimum observation count:
/// y[i] = y[i-1] + alpha*(x[i] - y[i-1]), seeded at the first defined value.
/// Output stays undefined until `min_periods` defined inputs have been seen
/// (Wilder smoothing is alpha = 1/period with min_periods = period).
pub fn ewm_alpha(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;
    let mut seen = 0usize;
    for value in values {
        match value {
            Some(v) => {
                seen += 1;
                let next = match state {
                    Some(prev) => prev + alpha * (v - prev),
                    None => *v,
                };
                state = Some(next);
                if seen >= min_periods {
                    out.push(Some(next));
                } else {
                    out.push(None);
                }
            }
            None => out.push(None),
        }
    }
    out
}

/// Strict upward crossover: previous-day fast <= slow flips to fast > slow.
/// Undefined where the current or lagged pair is undefined; the first row is
/// always undefined.
pub fn cross_above(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<Option<bool>> {
    cross(fast, slow, |pf, ps, f, s| pf <= ps && f > s)
}

/// Strict downward crossover: previous-day fast >= slow flips to fast < slow.
pub fn cross_below(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<Option<bool>> {
    cross(fast, slow, |pf, ps, f, s| pf >= ps && f < s)
}

fn cross(
    fast: &[Option<f64>],
    slow: &[Option<f64>],
    test: impl Fn(f64, f64, f64, f64) -> bool,
) -> Vec<Option<bool>> {
    let n = fast.len().min(slow.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        if i == 0 {
            out.push(None);
            continue;
        }
        out.push(match (fast[i - 1], slow[i - 1], fast[i], slow[i]) {
            (Some(pf), Some(ps), Some(f), Some(s)) => Some(test(pf, ps, f, s)),
            _ => None,
        });
    }
    out
}
