//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) bars are NaN. Leading NaN input (an already
//! warming-up series) pushes the seed forward.

pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(s) => s,
        None => return out,
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = 0.0;
    let mut sum = 0.0;

    for (offset, &v) in values[start..].iter().enumerate() {
        let i = start + offset;
        if offset < period - 1 {
            sum += v;
        } else if offset == period - 1 {
            sum += v;
            ema = sum / period as f64;
            out[i] = ema;
        } else {
            ema = v * k + ema * (1.0 - k);
            out[i] = ema;
        }
    }

    out
}
