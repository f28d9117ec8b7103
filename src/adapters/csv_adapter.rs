//! CSV candle data adapter.
//!
//! Files carry a header row and the columns
//! `timestamp,open,high,low,close,volume`, in that order.

use crate::domain::candle::Candle;
use crate::domain::error::StrategyError;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, source: &str) -> PathBuf {
        self.base_path.join(source)
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, StrategyError> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| StrategyError::Data {
            reason: format!("invalid timestamp '{}'", raw),
        })
}

fn field(record: &csv::StringRecord, index: usize, name: &str, line: u64) -> Result<f64, StrategyError> {
    let raw = record.get(index).ok_or_else(|| StrategyError::Data {
        reason: format!("line {}: missing {} column", line, name),
    })?;
    raw.trim().parse().map_err(|e| StrategyError::Data {
        reason: format!("line {}: invalid {} value '{}': {}", line, name, raw.trim(), e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_candles(
        &self,
        source: &str,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Result<Vec<Candle>, StrategyError> {
        let path = self.csv_path(source);
        let content = fs::read_to_string(&path).map_err(|e| StrategyError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StrategyError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            let ts = record.get(0).ok_or_else(|| StrategyError::Data {
                reason: format!("line {}: missing timestamp column", line),
            })?;
            let timestamp = parse_timestamp(ts).map_err(|e| StrategyError::Data {
                reason: format!("line {}: {}", line, e),
            })?;

            if let Some((start, end)) = range {
                if timestamp < start || timestamp > end {
                    continue;
                }
            }

            candles.push(Candle {
                timestamp,
                open: field(&record, 1, "open", line)?,
                high: field(&record, 2, "high", line)?,
                low: field(&record, 3, "low", line)?,
                close: field(&record, 4, "close", line)?,
                volume: field(&record, 5, "volume", line)?,
            });
        }

        tracing::debug!(file = %path.display(), candles = candles.len(), "candles read");
        Ok(candles)
    }
}
