//! Normalizer: 1h strategy trading on a summed min/max normalisation score.

use crate::domain::candle::{Candle, Timeframe};
use crate::domain::error::StrategyError;
use crate::domain::frame::Frame;
use crate::domain::indicator::closes;
use crate::domain::indicator::normalize::{min_max_norm, norm_sum, NORM_LOOKBACKS};
use crate::domain::params::{Decimal, ParamEntry};
use crate::domain::rule::{col, Rule};
use crate::domain::series::Series;
use crate::domain::signal::{aggregate, tags, RuleSet};
use crate::domain::strategy::{
    OrderType, OrderTypes, RoiTable, Signals, Strategy, StrategySettings, TrailingStop,
};
use crate::domain::trade::Trade;
use chrono::{Duration, NaiveDateTime};

pub const NAME: &str = "normalizer";

/// Minutes a losing trade may stay open before its stoploss tightens.
const LOSING_TRADE_PATIENCE: i64 = 300;
const TIGHT_STOPLOSS: f64 = 0.01;
const LOOSE_STOPLOSS: f64 = 0.99;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerParams {
    pub entry_below: Decimal,
    pub exit_above: Decimal,
}

impl Default for NormalizerParams {
    fn default() -> Self {
        let max = NORM_LOOKBACKS.len() as f64;
        NormalizerParams {
            entry_below: Decimal::new(0.2, 0.0, max),
            exit_above: Decimal::new(8.0, 0.0, max),
        }
    }
}

impl NormalizerParams {
    pub fn decimals_mut(&mut self) -> Vec<(&'static str, &mut Decimal)> {
        vec![
            ("entry_below", &mut self.entry_below),
            ("exit_above", &mut self.exit_above),
        ]
    }
}

pub fn default_settings() -> StrategySettings {
    StrategySettings {
        timeframe: Timeframe::H1,
        informative_timeframe: None,
        startup_candle_count: 610,
        informative_startup: 0,
        minimal_roi: RoiTable::new(vec![(0, 0.463), (289, 0.174), (995, 0.087), (1638, 0.0)]),
        stoploss: -0.331,
        trailing: TrailingStop {
            enabled: true,
            positive: Some(0.251),
            positive_offset: 0.324,
            only_offset_is_reached: true,
        },
        order_types: OrderTypes {
            buy: OrderType::Limit,
            sell: OrderType::Limit,
            stoploss: OrderType::Market,
            trailing_stop_loss: None,
            stoploss_on_exchange: false,
        },
        use_sell_signal: true,
        sell_profit_only: false,
        sell_profit_offset: Some(0.001),
        ignore_roi_if_buy_signal: true,
        process_only_new_candles: false,
        use_custom_stoploss: true,
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    params: NormalizerParams,
    settings: StrategySettings,
    entry: Vec<RuleSet>,
    exit: Vec<RuleSet>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(NormalizerParams::default())
    }
}

impl Normalizer {
    pub fn new(params: NormalizerParams) -> Self {
        let volume = || col(Series::Volume).gt(0.0);
        let entry = vec![RuleSet {
            label: "buy".into(),
            enabled: true,
            rule: Rule::And(vec![
                col(Series::PctSum).lt(params.entry_below.get()),
                volume(),
            ]),
        }];
        let exit = vec![RuleSet {
            label: "sell".into(),
            enabled: true,
            rule: Rule::And(vec![
                col(Series::PctSum).gt(params.exit_above.get()),
                volume(),
            ]),
        }];
        Normalizer {
            params,
            settings: default_settings(),
            entry,
            exit,
        }
    }

    pub fn params(&self) -> &NormalizerParams {
        &self.params
    }
}

impl Strategy for Normalizer {
    fn name(&self) -> &str {
        NAME
    }

    fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    fn populate_indicators(
        &self,
        candles: &[Candle],
        informative: Option<&[Candle]>,
    ) -> Result<Frame, StrategyError> {
        if informative.is_some() {
            tracing::warn!("normalizer uses no informative series, ignoring it");
        }
        let close = closes(candles);
        let mut frame = Frame::from_candles(candles);

        let norms: Vec<Vec<f64>> = NORM_LOOKBACKS
            .iter()
            .map(|&l| min_max_norm(&close, l))
            .collect();
        frame.insert(
            Series::PctSum,
            norm_sum(&norms, &NORM_LOOKBACKS, candles.len()),
        );
        for (l, values) in NORM_LOOKBACKS.iter().zip(norms) {
            frame.insert(Series::Norm(*l), values);
        }

        let startup = self.settings.startup_candle_count;
        frame.set_ready((0..candles.len()).map(|i| i >= startup).collect());
        tracing::debug!(
            rows = frame.len(),
            ready = frame.ready_count(),
            "normalizer indicators populated"
        );
        Ok(frame)
    }

    fn populate_signals(&self, frame: &Frame) -> Signals {
        let enter = aggregate(&self.entry, frame);
        Signals {
            timestamps: frame.timestamps().to_vec(),
            enter_tags: tags(&self.entry, frame, &enter),
            enter,
            exit: aggregate(&self.exit, frame),
        }
    }

    /// Tightens to 1% once a losing trade has been open longer than 300
    /// minutes, otherwise stays at 99%.
    fn custom_stoploss(&self, trade: &Trade, now: NaiveDateTime) -> Option<f64> {
        let losing = trade.profit_ratio() < 0.0;
        let stale = now - Duration::minutes(LOSING_TRADE_PATIENCE) > trade.open_time;
        Some(if losing && stale {
            TIGHT_STOPLOSS
        } else {
            LOOSE_STOPLOSS
        })
    }

    fn param_entries(&self) -> Vec<ParamEntry> {
        let mut params = self.params.clone();
        params
            .decimals_mut()
            .into_iter()
            .map(|(key, value)| ParamEntry {
                section: NAME.to_string(),
                key: key.to_string(),
                value: *value,
            })
            .collect()
    }
}
