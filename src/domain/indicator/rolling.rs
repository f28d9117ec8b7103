//! Fixed-window rolling statistics.
//!
//! Warmup: first (period-1) bars are NaN. A NaN inside the window makes the
//! output NaN as well, matching how the derived series chain together.

fn rolling<F>(values: &[f64], period: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return f64::NAN;
            }
            let window = &values[i + 1 - period..=i];
            if window.iter().any(|v| v.is_nan()) {
                f64::NAN
            } else {
                f(window)
            }
        })
        .collect()
}

pub fn rolling_sum(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().sum())
}

pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Simple moving average; same as [`rolling_mean`].
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    rolling_mean(values, period)
}

pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MIN, f64::max))
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MAX, f64::min))
}

/// Sample standard deviation (n-1 divisor). A single-bar window is NaN.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| {
        let n = w.len();
        if n < 2 {
            return f64::NAN;
        }
        let mean = w.iter().sum::<f64>() / n as f64;
        let variance = w
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1) as f64;
        variance.sqrt()
    })
}
