//! Dip and pump detectors built on rolling price ranges.

use crate::domain::candle::Candle;
use crate::domain::indicator::rolling::{rolling_max, rolling_min};

/// Windows the four dip checks look back over: the bar itself, then 2, 12
/// and 144 bars of opens.
pub const DIP_WINDOWS: [usize; 4] = [1, 2, 12, 144];

/// True where every drop from the rolling max open to the close stays below
/// its threshold.
pub fn safe_dips(candles: &[Candle], thresholds: [f64; 4]) -> Vec<bool> {
    let opens: Vec<f64> = candles.iter().map(|c| c.open).collect();
    let maxes: Vec<Vec<f64>> = DIP_WINDOWS
        .iter()
        .map(|&w| rolling_max(&opens, w))
        .collect();

    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            maxes
                .iter()
                .zip(thresholds)
                .all(|(max, t)| (max[i] - c.close) / c.close < t)
        })
        .collect()
}

/// `(max(open, w) - min(close, w)) / min(close, w)`
pub fn range_percent_change(candles: &[Candle], window: usize) -> Vec<f64> {
    let (max_open, min_close) = open_close_extremes(candles, window);
    max_open
        .iter()
        .zip(&min_close)
        .map(|(hi, lo)| (hi - lo) / lo)
        .collect()
}

/// True where entering after a pump is considered safe: either the range
/// moved less than `thresh`, or price has pulled back far enough from the top.
pub fn safe_pump(candles: &[Candle], window: usize, thresh: f64, pull_thresh: f64) -> Vec<bool> {
    let (max_open, min_close) = open_close_extremes(candles, window);
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let maxgap = max_open[i] - min_close[i];
            let change = maxgap / min_close[i];
            let height = c.close - min_close[i];
            change < thresh || maxgap / pull_thresh > height
        })
        .collect()
}

/// `(max(high, w) - min(low, w)) / min(low, w)`
pub fn high_low_span(candles: &[Candle], window: usize) -> Vec<f64> {
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let hh = rolling_max(&highs, window);
    let ll = rolling_min(&lows, window);
    hh.iter().zip(&ll).map(|(h, l)| (h - l) / l).collect()
}

/// True where the high-low span over `window` exceeds `threshold`.
pub fn sell_pump(candles: &[Candle], window: usize, threshold: f64) -> Vec<bool> {
    high_low_span(candles, window)
        .iter()
        .map(|span| *span > threshold)
        .collect()
}

fn open_close_extremes(candles: &[Candle], window: usize) -> (Vec<f64>, Vec<f64>) {
    let opens: Vec<f64> = candles.iter().map(|c| c.open).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    (rolling_max(&opens, window), rolling_min(&closes, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: usize, open: f64, close: f64) -> Candle {
        Candle {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + chrono::Duration::hours(i as i64),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1.0,
        }
    }

    fn flat(n: usize) -> Vec<Candle> {
        (0..n).map(|i| bar(i, 100.0, 100.0)).collect()
    }

    #[test]
    fn dips_false_during_warmup() {
        let d = safe_dips(&flat(150), [0.02, 0.14, 0.32, 0.5]);
        assert!(!d[142]);
        assert!(d[143]);
    }

    #[test]
    fn dips_reject_sharp_drop() {
        let mut candles = flat(150);
        candles[149] = bar(149, 100.0, 90.0);
        let d = safe_dips(&candles, [0.02, 0.14, 0.32, 0.5]);
        // (100 - 90) / 90 > 0.02
        assert!(!d[149]);
        assert!(safe_dips(&candles, [0.2, 0.2, 0.32, 0.5])[149]);
    }

    #[test]
    fn percent_change_of_pump() {
        let mut candles = flat(4);
        candles[2] = bar(2, 150.0, 120.0);
        let r = range_percent_change(&candles, 3);
        assert!(r[1].is_nan());
        assert!((r[3] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pump_safe_when_range_small() {
        let p = safe_pump(&flat(30), 24, 0.6, 1.75);
        assert!(!p[22]);
        assert!(p[23]);
    }

    #[test]
    fn pump_unsafe_at_top_safe_after_pullback() {
        let mut candles = flat(4);
        candles[3] = bar(3, 200.0, 200.0);
        // change 1.0 >= 0.5, gap 100 / 2 = 50 < height 100
        assert!(!safe_pump(&candles, 3, 0.5, 2.0)[3]);
        let mut pulled = candles.clone();
        pulled.push(bar(4, 130.0, 120.0));
        // gap 100 / 2 = 50 > height 20
        assert!(safe_pump(&pulled, 3, 0.5, 2.0)[4]);
    }

    #[test]
    fn sell_pump_flags_wide_span() {
        let mut candles = flat(3);
        candles[2].high = 200.0;
        let f = sell_pump(&candles, 3, 0.9);
        assert!(!f[1]);
        assert!(f[2]);
        assert!(!sell_pump(&candles, 3, 1.0)[2]);
    }
}
