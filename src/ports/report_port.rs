//! Signal report port.

use crate::domain::candle::Candle;
use crate::domain::error::StrategyError;
use crate::domain::strategy::Signals;
use std::io::Write;

/// Port for writing per-bar signal decisions next to their candles.
pub trait ReportPort {
    fn write(
        &self,
        candles: &[Candle],
        signals: &Signals,
        out: &mut dyn Write,
    ) -> Result<(), StrategyError>;
}
