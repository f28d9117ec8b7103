//! Choppiness index.
//!
//! `100 × log10(Σ TR / (max high - min low)) / log10(n)` over n bars. The
//! first bar's true range is its high-low span. NaN when the window range is
//! zero.

use crate::domain::candle::Candle;
use crate::domain::indicator::rolling::{rolling_max, rolling_min, rolling_sum};

pub fn calculate_chop(candles: &[Candle], period: usize) -> Vec<f64> {
    if period < 2 {
        return vec![f64::NAN; candles.len()];
    }

    let tr: Vec<f64> = candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                c.high - c.low
            } else {
                c.true_range(candles[i - 1].close)
            }
        })
        .collect();
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();

    let tr_sum = rolling_sum(&tr, period);
    let hh = rolling_max(&highs, period);
    let ll = rolling_min(&lows, period);
    let denom = (period as f64).log10();

    (0..candles.len())
        .map(|i| {
            let range = hh[i] - ll[i];
            if range == 0.0 {
                f64::NAN
            } else {
                100.0 * (tr_sum[i] / range).log10() / denom
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: i64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + chrono::Duration::minutes(5 * i),
            open: close,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn chop_trend_is_low() {
        // each bar moves the whole range up: sum TR equals total range
        let candles: Vec<Candle> = (0..4)
            .map(|i| bar(i, i as f64 + 1.0, i as f64, i as f64 + 1.0))
            .collect();
        let s = calculate_chop(&candles, 4);
        assert!(s[2].is_nan());
        // TR: 1,1,1,1 = 4; range 4-0 = 4 -> log10(1) = 0
        assert!(s[3].abs() < 1e-12);
    }

    #[test]
    fn chop_sideways_is_high() {
        let candles: Vec<Candle> = (0..4).map(|i| bar(i, 2.0, 1.0, 1.5)).collect();
        let s = calculate_chop(&candles, 4);
        // TR sum 4, range 1 -> 100
        assert!((s[3] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn chop_flat_range_is_nan() {
        let candles: Vec<Candle> = (0..3).map(|i| bar(i, 1.0, 1.0, 1.0)).collect();
        assert!(calculate_chop(&candles, 3)[2].is_nan());
    }
}
