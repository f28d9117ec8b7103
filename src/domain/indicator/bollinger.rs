//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Warmup: first (period-1) bars are NaN.

use crate::domain::candle::Candle;
use crate::domain::indicator::rolling::{rolling_mean, rolling_std};

#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn calculate_bollinger(values: &[f64], period: usize, mult: f64) -> BollingerBands {
    let middle = rolling_mean(values, period);
    let std = rolling_std(values, period);
    let upper = middle.iter().zip(&std).map(|(m, s)| m + mult * s).collect();
    let lower = middle.iter().zip(&std).map(|(m, s)| m - mult * s).collect();
    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Bands over the typical price `(high + low + close) / 3`.
pub fn calculate_bollinger_typical(candles: &[Candle], period: usize, mult: f64) -> BollingerBands {
    let tp: Vec<f64> = candles.iter().map(Candle::typical_price).collect();
    calculate_bollinger(&tp, period, mult)
}
