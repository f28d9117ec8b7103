//! Money Flow Index.
//!
//! Raw flow = typical price × volume, signed by the direction of the typical
//! price versus the previous bar. MFI = 100 × pos / (pos + neg) over the last
//! n flows. A window whose total flow is below 1.0 reads 0, as in TA-Lib.
//!
//! Warmup: first n bars are NaN.

use crate::domain::candle::Candle;

pub fn calculate_mfi(candles: &[Candle], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; candles.len()];
    if period == 0 || candles.len() <= period {
        return out;
    }

    // flows[i] describes the move from bar i to bar i+1
    let flows: Vec<(f64, f64)> = candles
        .windows(2)
        .map(|w| {
            let prev = w[0].typical_price();
            let tp = w[1].typical_price();
            let raw = tp * w[1].volume;
            if tp > prev {
                (raw, 0.0)
            } else if tp < prev {
                (0.0, raw)
            } else {
                (0.0, 0.0)
            }
        })
        .collect();

    for i in period..candles.len() {
        let window = &flows[i - period..i];
        let pos: f64 = window.iter().map(|f| f.0).sum();
        let neg: f64 = window.iter().map(|f| f.1).sum();
        let total = pos + neg;
        out[i] = if total < 1.0 { 0.0 } else { 100.0 * pos / total };
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(prices: &[f64], volume: f64) -> Vec<Candle> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Candle {
                timestamp: base + chrono::Duration::minutes(5 * i as i64),
                open: p,
                high: p,
                low: p,
                close: p,
                volume,
            })
            .collect()
    }

    #[test]
    fn mfi_warmup() {
        let s = calculate_mfi(&bars(&[1.0, 2.0, 3.0, 4.0], 10.0), 2);
        assert!(s[0].is_nan());
        assert!(s[1].is_nan());
        assert!(!s[2].is_nan());
    }

    #[test]
    fn mfi_rising_is_100() {
        let s = calculate_mfi(&bars(&[1.0, 2.0, 3.0, 4.0], 10.0), 3);
        assert_eq!(s[3], 100.0);
    }

    #[test]
    fn mfi_without_flow_is_zero() {
        let s = calculate_mfi(&bars(&[5.0; 20], 10.0), 14);
        assert_eq!(s[19], 0.0);
        let s = calculate_mfi(&bars(&[1.0, 2.0, 3.0, 4.0], 0.0), 2);
        assert_eq!(s[3], 0.0);
    }

    #[test]
    fn mfi_tiny_flow_is_zero() {
        // up flow of 2 * 0.1 stays under 1.0
        let s = calculate_mfi(&bars(&[1.0, 2.0, 2.0], 0.1), 2);
        assert_eq!(s[2], 0.0);
    }

    #[test]
    fn mfi_mixed() {
        // up to 2 (flow 20), down to 1 (flow 10)
        let s = calculate_mfi(&bars(&[1.0, 2.0, 1.0], 10.0), 2);
        assert!((s[2] - 100.0 * 20.0 / 30.0).abs() < 1e-12);
    }
}
