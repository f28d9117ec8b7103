//! Indicator frame: candles plus every derived column, index-aligned.

use crate::domain::candle::Candle;
use crate::domain::series::{Flag, Series};
use chrono::NaiveDateTime;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Frame {
    timestamps: Vec<NaiveDateTime>,
    columns: HashMap<Series, Vec<f64>>,
    flags: HashMap<Flag, Vec<bool>>,
    ready: Vec<bool>,
}

impl Frame {
    /// Frame holding the raw OHLCV columns; no row is ready yet.
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut frame = Frame {
            timestamps: candles.iter().map(|c| c.timestamp).collect(),
            columns: HashMap::new(),
            flags: HashMap::new(),
            ready: vec![false; candles.len()],
        };
        frame.insert(Series::Open, candles.iter().map(|c| c.open).collect());
        frame.insert(Series::High, candles.iter().map(|c| c.high).collect());
        frame.insert(Series::Low, candles.iter().map(|c| c.low).collect());
        frame.insert(Series::Close, candles.iter().map(|c| c.close).collect());
        frame.insert(Series::Volume, candles.iter().map(|c| c.volume).collect());
        frame
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn insert(&mut self, series: Series, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.len(), "column {series} misaligned");
        self.columns.insert(series, values);
    }

    pub fn insert_flag(&mut self, flag: Flag, values: Vec<bool>) {
        debug_assert_eq!(values.len(), self.len(), "flag {flag} misaligned");
        self.flags.insert(flag, values);
    }

    pub fn series(&self, series: Series) -> Option<&[f64]> {
        self.columns.get(&series).map(Vec::as_slice)
    }

    pub fn flag(&self, flag: Flag) -> Option<&[bool]> {
        self.flags.get(&flag).map(Vec::as_slice)
    }

    /// Column value at `index`; NaN if the column or row is absent.
    pub fn value(&self, series: Series, index: usize) -> f64 {
        self.columns
            .get(&series)
            .and_then(|v| v.get(index).copied())
            .unwrap_or(f64::NAN)
    }

    /// Flag value at `index`; false if the flag or row is absent.
    pub fn flag_at(&self, flag: Flag, index: usize) -> bool {
        self.flags
            .get(&flag)
            .and_then(|v| v.get(index).copied())
            .unwrap_or(false)
    }

    pub fn set_ready(&mut self, ready: Vec<bool>) {
        debug_assert_eq!(ready.len(), self.len());
        self.ready = ready;
    }

    pub fn is_ready(&self, index: usize) -> bool {
        self.ready.get(index).copied().unwrap_or(false)
    }

    pub fn ready_count(&self) -> usize {
        self.ready.iter().filter(|r| **r).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::Tier;
    use chrono::NaiveDate;

    fn candles() -> Vec<Candle> {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        vec![
            Candle {
                timestamp: t,
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 10.0,
            },
            Candle {
                timestamp: t + chrono::Duration::minutes(5),
                open: 1.5,
                high: 2.5,
                low: 1.0,
                close: 2.0,
                volume: 0.0,
            },
        ]
    }

    #[test]
    fn raw_columns_present() {
        let f = Frame::from_candles(&candles());
        assert_eq!(f.len(), 2);
        assert_eq!(f.value(Series::Close, 1), 2.0);
        assert_eq!(f.value(Series::Volume, 1), 0.0);
        assert_eq!(f.series(Series::High), Some(&[2.0, 2.5][..]));
    }

    #[test]
    fn missing_column_is_nan_and_missing_flag_false() {
        let f = Frame::from_candles(&candles());
        assert!(f.value(Series::Rsi, 0).is_nan());
        assert!(f.value(Series::Close, 9).is_nan());
        assert!(!f.flag_at(Flag::SafeDips(Tier::Normal), 0));
    }

    #[test]
    fn readiness() {
        let mut f = Frame::from_candles(&candles());
        assert!(!f.is_ready(0));
        f.set_ready(vec![false, true]);
        assert!(f.is_ready(1));
        assert!(!f.is_ready(5));
        assert_eq!(f.ready_count(), 1);
    }
}
