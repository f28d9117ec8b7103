//! Elliott Wave Oscillator: `(EMA(fast) - EMA(slow)) / close × 100`.

use crate::domain::indicator::ema::calculate_ema;

pub fn calculate_ewo(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    closes
        .iter()
        .zip(ema_fast.iter().zip(&ema_slow))
        .map(|(c, (f, s))| (f - s) / c * 100.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ewo_warmup_follows_slow_ema() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let s = calculate_ewo(&closes, 2, 5);
        assert!(s[3].is_nan());
        assert!(!s[4].is_nan());
    }

    #[test]
    fn ewo_flat_is_zero() {
        let s = calculate_ewo(&[10.0; 8], 2, 4);
        assert_eq!(s[7], 0.0);
    }

    #[test]
    fn ewo_positive_in_uptrend() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let s = calculate_ewo(&closes, 3, 10);
        assert!(s[29] > 0.0);
    }
}
