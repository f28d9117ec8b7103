//! Candle data access port.

use crate::domain::candle::Candle;
use crate::domain::error::StrategyError;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Candles of `source` in stored order, optionally limited to
    /// `[start, end]` inclusive.
    fn fetch_candles(
        &self,
        source: &str,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Result<Vec<Candle>, StrategyError>;
}
