//! Strategy interface and the static settings a host reads from it.

use crate::domain::candle::{check_ordered, Candle, Timeframe};
use crate::domain::error::StrategyError;
use crate::domain::exit::ExitReason;
use crate::domain::frame::Frame;
use crate::domain::params::ParamEntry;
use crate::domain::trade::Trade;
use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Limit,
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => f.write_str("limit"),
            OrderType::Market => f.write_str("market"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTypes {
    pub buy: OrderType,
    pub sell: OrderType,
    pub stoploss: OrderType,
    pub trailing_stop_loss: Option<OrderType>,
    pub stoploss_on_exchange: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrailingStop {
    pub enabled: bool,
    pub positive: Option<f64>,
    pub positive_offset: f64,
    pub only_offset_is_reached: bool,
}

/// Minimum return required to exit after a given number of minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiTable(Vec<(u32, f64)>);

impl RoiTable {
    /// Entries are sorted by their minute key.
    pub fn new(mut entries: Vec<(u32, f64)>) -> Self {
        entries.sort_by_key(|(m, _)| *m);
        RoiTable(entries)
    }

    pub fn entries(&self) -> &[(u32, f64)] {
        &self.0
    }

    /// ROI of the last entry whose key is at or below `minutes`.
    pub fn min_roi_at(&self, minutes: u32) -> Option<f64> {
        self.0
            .iter()
            .take_while(|(m, _)| *m <= minutes)
            .last()
            .map(|(_, roi)| *roi)
    }
}

/// Passive configuration exposed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySettings {
    pub timeframe: Timeframe,
    pub informative_timeframe: Option<Timeframe>,
    pub startup_candle_count: usize,
    /// Informative bars required before a merged value counts as warmed up.
    pub informative_startup: usize,
    pub minimal_roi: RoiTable,
    pub stoploss: f64,
    pub trailing: TrailingStop,
    pub order_types: OrderTypes,
    pub use_sell_signal: bool,
    pub sell_profit_only: bool,
    pub sell_profit_offset: Option<f64>,
    pub ignore_roi_if_buy_signal: bool,
    pub process_only_new_candles: bool,
    pub use_custom_stoploss: bool,
}

/// Per-bar decisions; `None` while the row is still warming up.
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    pub timestamps: Vec<NaiveDateTime>,
    pub enter: Vec<Option<bool>>,
    pub exit: Vec<Option<bool>>,
    /// Comma separated labels of the entry sets that fired, empty elsewhere.
    pub enter_tags: Vec<String>,
}

impl Signals {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn enter_count(&self) -> usize {
        self.enter.iter().filter(|v| **v == Some(true)).count()
    }

    pub fn exit_count(&self) -> usize {
        self.exit.iter().filter(|v| **v == Some(true)).count()
    }
}

pub trait Strategy {
    fn name(&self) -> &str;

    fn settings(&self) -> &StrategySettings;

    /// Builds the indicator frame and marks ready rows.
    fn populate_indicators(
        &self,
        candles: &[Candle],
        informative: Option<&[Candle]>,
    ) -> Result<Frame, StrategyError>;

    fn populate_signals(&self, frame: &Frame) -> Signals;

    /// Exit reason for an open trade at the last row of `frame`.
    fn custom_exit(&self, trade: &Trade, _frame: &Frame) -> Result<Option<ExitReason>, StrategyError> {
        trade.validate()?;
        Ok(None)
    }

    /// Replacement stoploss ratio, if the strategy manages its own.
    fn custom_stoploss(&self, _trade: &Trade, _now: NaiveDateTime) -> Option<f64> {
        None
    }

    fn param_entries(&self) -> Vec<ParamEntry>;

    /// Validates ordering, then computes indicators and signals.
    fn analyze(
        &self,
        candles: &[Candle],
        informative: Option<&[Candle]>,
    ) -> Result<(Frame, Signals), StrategyError> {
        check_ordered(candles, "candles")?;
        if let Some(inf) = informative {
            check_ordered(inf, "informative candles")?;
        }
        let frame = self.populate_indicators(candles, informative)?;
        let signals = self.populate_signals(&frame);
        Ok((frame, signals))
    }
}
