//! OHLCV candle representation and bar timeframes.

use crate::domain::error::StrategyError;
use chrono::{Duration, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// One bar, keyed by its open time.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Bar duration, stored in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timeframe {
    minutes: u32,
}

impl Timeframe {
    pub const M5: Timeframe = Timeframe { minutes: 5 };
    pub const H1: Timeframe = Timeframe { minutes: 60 };

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes > 0).then_some(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }

    /// How many bars of `self` fit in one bar of `coarser`, if it divides evenly.
    pub fn bars_per(&self, coarser: Timeframe) -> Option<u32> {
        if coarser.minutes < self.minutes || coarser.minutes % self.minutes != 0 {
            return None;
        }
        Some(coarser.minutes / self.minutes)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.minutes;
        if m % 1440 == 0 {
            write!(f, "{}d", m / 1440)
        } else if m % 60 == 0 {
            write!(f, "{}h", m / 60)
        } else {
            write!(f, "{}m", m)
        }
    }
}

impl FromStr for Timeframe {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || StrategyError::InvalidCandles {
            reason: format!("invalid timeframe '{s}', expected e.g. 5m, 1h, 1d"),
        };
        let split = s.char_indices().last().map_or(0, |(i, _)| i);
        let (count, unit) = s.split_at(split);
        let count: u32 = count.parse().map_err(|_| invalid())?;
        let minutes = match unit {
            "m" => count,
            "h" => count.checked_mul(60).ok_or_else(invalid)?,
            "d" => count.checked_mul(1440).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        Timeframe::from_minutes(minutes).ok_or_else(invalid)
    }
}

/// Rejects tables whose timestamps are not strictly increasing.
pub fn check_ordered(candles: &[Candle], label: &str) -> Result<(), StrategyError> {
    for pair in candles.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(StrategyError::InvalidCandles {
                reason: format!(
                    "{label} candles not strictly increasing at {}",
                    pair[1].timestamp
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample_candle() -> Candle {
        Candle {
            timestamp: at(10, 0),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn typical_price() {
        let c = sample_candle();
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((c.typical_price() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_hl_dominates() {
        assert!((sample_candle().true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // |110-70| = 40
        assert!((sample_candle().true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        // |90-130| = 40
        assert!((sample_candle().true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn timeframe_parse_and_display() {
        assert_eq!("5m".parse::<Timeframe>().unwrap(), Timeframe::M5);
        assert_eq!("1h".parse::<Timeframe>().unwrap(), Timeframe::H1);
        assert_eq!("1d".parse::<Timeframe>().unwrap().minutes(), 1440);
        assert_eq!(Timeframe::M5.to_string(), "5m");
        assert_eq!(Timeframe::H1.to_string(), "1h");
        assert_eq!("4h".parse::<Timeframe>().unwrap().to_string(), "4h");
    }

    #[test]
    fn timeframe_rejects_garbage() {
        assert!("".parse::<Timeframe>().is_err());
        assert!("h".parse::<Timeframe>().is_err());
        assert!("0m".parse::<Timeframe>().is_err());
        assert!("5x".parse::<Timeframe>().is_err());
        assert!("5µ".parse::<Timeframe>().is_err());
        assert!("µ".parse::<Timeframe>().is_err());
    }

    #[test]
    fn bars_per_coarser() {
        assert_eq!(Timeframe::M5.bars_per(Timeframe::H1), Some(12));
        assert_eq!(Timeframe::H1.bars_per(Timeframe::M5), None);
        let m7 = Timeframe::from_minutes(7).unwrap();
        assert_eq!(m7.bars_per(Timeframe::H1), None);
    }

    #[test]
    fn ordered_check() {
        let mut a = sample_candle();
        let mut b = sample_candle();
        b.timestamp = at(10, 5);
        assert!(check_ordered(&[a.clone(), b.clone()], "base").is_ok());
        a.timestamp = at(10, 5);
        assert!(check_ordered(&[a, b], "base").is_err());
    }
}
