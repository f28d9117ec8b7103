//! Rolling min/max normalisation of a series.

/// Lookbacks summed into the normalisation score.
pub const NORM_LOOKBACKS: [usize; 9] = [13, 21, 34, 55, 89, 144, 233, 377, 610];

/// `(x[i] - min) / (max - min)` over `x[i-lookback..=i]`.
///
/// NaN for `i < lookback` and where the window is flat.
pub fn min_max_norm(values: &[f64], lookback: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            if i < lookback {
                return f64::NAN;
            }
            let window = &values[i - lookback..=i];
            let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if hi == lo {
                f64::NAN
            } else {
                (values[i] - lo) / (hi - lo)
            }
        })
        .collect()
}

/// Sum of the per-lookback norms. NaN until the longest lookback has data;
/// a flat window contributes nothing.
pub fn norm_sum(norms: &[Vec<f64>], lookbacks: &[usize], len: usize) -> Vec<f64> {
    let warmup = lookbacks.iter().copied().max().unwrap_or(0);
    (0..len)
        .map(|i| {
            if i < warmup {
                return f64::NAN;
            }
            norms
                .iter()
                .map(|n| n[i])
                .filter(|v| !v.is_nan())
                .sum()
        })
        .collect()
}
