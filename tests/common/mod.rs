#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
pub use signaltrader::domain::candle::Candle;
use signaltrader::domain::error::StrategyError;
use signaltrader::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Base row from which every nostalgia row is ready: the 1h bar with index
/// 219 has closed by the end of 5m row 2639.
pub const NOSTALGIA_FIRST_READY: usize = 2639;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Candle>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, source: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(source.to_string(), candles);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(
        &self,
        source: &str,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Result<Vec<Candle>, StrategyError> {
        let candles = self.data.get(source).ok_or_else(|| StrategyError::Data {
            reason: format!("unknown source {source}"),
        })?;
        Ok(candles
            .iter()
            .filter(|c| range.is_none_or(|(s, e)| c.timestamp >= s && c.timestamp <= e))
            .cloned()
            .collect())
    }
}

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Deterministic wavy price with a little hashed noise.
pub fn wave(i: usize) -> f64 {
    let x = i as f64;
    let noise = ((i * 7919) % 97) as f64 / 97.0 - 0.5;
    100.0 + 20.0 * (x / 300.0).sin() + 5.0 * (x / 23.0).sin() + noise
}

pub fn make_candles(closes: &[f64], step: Duration) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: start() + step * i as i32,
                open,
                high: open.max(close) + 0.3,
                low: open.min(close) - 0.3,
                close,
                volume: 1000.0 + (i % 50) as f64 * 10.0,
            }
        })
        .collect()
}

pub fn candles_5m(n: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..n).map(wave).collect();
    make_candles(&closes, Duration::minutes(5))
}

pub fn candles_1h(closes: &[f64]) -> Vec<Candle> {
    make_candles(closes, Duration::hours(1))
}

/// Complete hourly candles built from consecutive groups of twelve 5m bars.
pub fn resample_1h(base: &[Candle]) -> Vec<Candle> {
    base.chunks_exact(12)
        .map(|group| Candle {
            timestamp: group[0].timestamp,
            open: group[0].open,
            high: group.iter().map(|c| c.high).fold(f64::MIN, f64::max),
            low: group.iter().map(|c| c.low).fold(f64::MAX, f64::min),
            close: group[11].close,
            volume: group.iter().map(|c| c.volume).sum(),
        })
        .collect()
}

pub fn to_csv(candles: &[Candle]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for c in candles {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            c.timestamp.format("%Y-%m-%d %H:%M:%S"),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        )
        .unwrap();
    }
    out
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
