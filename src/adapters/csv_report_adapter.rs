//! CSV signal report: the input candles with `enter`, `exit` and
//! `enter_tag` columns appended.

use crate::domain::candle::Candle;
use crate::domain::error::StrategyError;
use crate::domain::strategy::Signals;
use crate::ports::report_port::ReportPort;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvReportAdapter;

/// `1`, `0`, or empty while the row is warming up.
fn decision(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "1",
        Some(false) => "0",
        None => "",
    }
}

fn csv_err(e: csv::Error) -> StrategyError {
    StrategyError::Data {
        reason: format!("failed to write report: {}", e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        candles: &[Candle],
        signals: &Signals,
        out: &mut dyn Write,
    ) -> Result<(), StrategyError> {
        if signals.len() != candles.len()
            || signals.enter.len() != candles.len()
            || signals.exit.len() != candles.len()
            || signals.enter_tags.len() != candles.len()
        {
            return Err(StrategyError::Data {
                reason: format!(
                    "signal rows ({}) do not match candle rows ({})",
                    signals.len(),
                    candles.len()
                ),
            });
        }

        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record([
            "timestamp", "open", "high", "low", "close", "volume", "enter", "exit", "enter_tag",
        ])
        .map_err(csv_err)?;

        for (i, c) in candles.iter().enumerate() {
            wtr.write_record([
                c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                c.open.to_string(),
                c.high.to_string(),
                c.low.to_string(),
                c.close.to_string(),
                c.volume.to_string(),
                decision(signals.enter[i]).to_string(),
                decision(signals.exit[i]).to_string(),
                signals.enter_tags[i].clone(),
            ])
            .map_err(csv_err)?;
        }
        wtr.flush()?;

        tracing::debug!(rows = candles.len(), "signal report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candles() -> Vec<Candle> {
        let t = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        (0..3)
            .map(|i| Candle {
                timestamp: t + chrono::Duration::minutes(5 * i),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 10.0,
            })
            .collect()
    }

    fn signals(candles: &[Candle]) -> Signals {
        Signals {
            timestamps: candles.iter().map(|c| c.timestamp).collect(),
            enter: vec![None, Some(true), Some(false)],
            exit: vec![None, Some(false), Some(true)],
            enter_tags: vec![String::new(), "buy_02,buy_11".into(), String::new()],
        }
    }

    #[test]
    fn writes_decisions_and_tags() {
        let c = candles();
        let mut buf = Vec::new();
        CsvReportAdapter.write(&c, &signals(&c), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "timestamp,open,high,low,close,volume,enter,exit,enter_tag"
        );
        assert_eq!(lines[1], "2024-03-01 12:00:00,1,2,0.5,1.5,10,,,");
        assert_eq!(
            lines[2],
            "2024-03-01 12:05:00,1,2,0.5,1.5,10,1,0,\"buy_02,buy_11\""
        );
        assert_eq!(lines[3], "2024-03-01 12:10:00,1,2,0.5,1.5,10,0,1,");
    }

    #[test]
    fn rejects_mismatched_rows() {
        let c = candles();
        let mut s = signals(&c);
        s.exit.pop();
        let mut buf = Vec::new();
        let err = CsvReportAdapter.write(&c, &s, &mut buf).unwrap_err();
        assert!(matches!(err, StrategyError::Data { .. }));
    }
}
