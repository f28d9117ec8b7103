//! Nostalgia: 5m dip-buying strategy with a 1h informative series.
//!
//! Twenty-three buy rule sets and seven sell rule sets are compiled once from
//! [`NostalgiaParams`] when the strategy is built; evaluation only walks the
//! compiled rule trees.

pub mod buy;
pub mod indicators;
pub mod params;
pub mod protection;
pub mod sell;

use crate::domain::candle::{Candle, Timeframe};
use crate::domain::error::StrategyError;
use crate::domain::exit::{ExitClassifier, ExitReason, ExitSnapshot};
use crate::domain::frame::Frame;
use crate::domain::params::ParamEntry;
use crate::domain::signal::{aggregate, tags, RuleSet};
use crate::domain::strategy::{
    OrderType, OrderTypes, RoiTable, Signals, Strategy, StrategySettings, TrailingStop,
};
use crate::domain::trade::Trade;
use indicators::INFORMATIVE_STARTUP;
pub use params::NostalgiaParams;

pub const NAME: &str = "nostalgia";

pub fn default_settings() -> StrategySettings {
    StrategySettings {
        timeframe: Timeframe::M5,
        informative_timeframe: Some(Timeframe::H1),
        startup_candle_count: 400,
        informative_startup: INFORMATIVE_STARTUP,
        minimal_roi: RoiTable::new(vec![(0, 10.0)]),
        stoploss: -0.99,
        trailing: TrailingStop {
            enabled: false,
            positive: Some(0.01),
            positive_offset: 0.03,
            only_offset_is_reached: true,
        },
        order_types: OrderTypes {
            buy: OrderType::Limit,
            sell: OrderType::Limit,
            stoploss: OrderType::Limit,
            trailing_stop_loss: Some(OrderType::Limit),
            stoploss_on_exchange: false,
        },
        use_sell_signal: true,
        sell_profit_only: false,
        sell_profit_offset: None,
        ignore_roi_if_buy_signal: true,
        process_only_new_candles: true,
        use_custom_stoploss: false,
    }
}

#[derive(Debug, Clone)]
pub struct Nostalgia {
    params: NostalgiaParams,
    settings: StrategySettings,
    buy_rules: Vec<RuleSet>,
    sell_rules: Vec<RuleSet>,
    exits: ExitClassifier,
}

impl Default for Nostalgia {
    fn default() -> Self {
        Nostalgia::new(NostalgiaParams::default())
    }
}

impl Nostalgia {
    pub fn new(params: NostalgiaParams) -> Self {
        let buy_rules: Vec<RuleSet> = params
            .buy
            .iter()
            .map(|s| RuleSet {
                label: s.section(),
                enabled: s.enabled,
                rule: s.rule(),
            })
            .collect();
        let sell_rules: Vec<RuleSet> = params
            .sell
            .iter()
            .map(|s| RuleSet {
                label: s.section(),
                enabled: s.enabled,
                rule: s.rule(),
            })
            .collect();
        let exits = ExitClassifier::new(&params.exit);

        tracing::debug!(
            buy_enabled = buy_rules.iter().filter(|r| r.enabled).count(),
            sell_enabled = sell_rules.iter().filter(|r| r.enabled).count(),
            buy_conditions = buy_rules.iter().map(|r| r.rule.leaf_count()).sum::<usize>(),
            exit_bands = exits.bands().len(),
            "nostalgia rule sets compiled"
        );

        Nostalgia {
            params,
            settings: default_settings(),
            buy_rules,
            sell_rules,
            exits,
        }
    }

    pub fn params(&self) -> &NostalgiaParams {
        &self.params
    }

    pub fn buy_rules(&self) -> &[RuleSet] {
        &self.buy_rules
    }

    pub fn sell_rules(&self) -> &[RuleSet] {
        &self.sell_rules
    }

    pub fn exit_classifier(&self) -> &ExitClassifier {
        &self.exits
    }
}

impl Strategy for Nostalgia {
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
        let inf_tf = self.settings.informative_timeframe.unwrap_or(Timeframe::H1);
        let informative = informative.ok_or_else(|| StrategyError::MissingInformative {
            strategy: NAME.to_string(),
            timeframe: inf_tf.to_string(),
        })?;

        let mut frame = Frame::from_candles(candles);
        indicators::populate_base(&mut frame, candles, &self.params);
        let alignment = indicators::populate_informative(
            &mut frame,
            candles,
            self.settings.timeframe,
            informative,
            inf_tf,
            &self.params,
        )?;
        frame.set_ready(indicators::readiness(
            candles.len(),
            self.settings.startup_candle_count,
            &alignment,
        ));

        tracing::debug!(
            rows = frame.len(),
            ready = frame.ready_count(),
            "nostalgia indicators populated"
        );
        Ok(frame)
    }

    fn populate_signals(&self, frame: &Frame) -> Signals {
        let enter = aggregate(&self.buy_rules, frame);
        Signals {
            timestamps: frame.timestamps().to_vec(),
            enter_tags: tags(&self.buy_rules, frame, &enter),
            enter,
            exit: aggregate(&self.sell_rules, frame),
        }
    }

    fn custom_exit(&self, trade: &Trade, frame: &Frame) -> Result<Option<ExitReason>, StrategyError> {
        trade.validate()?;
        let Some(snap) = frame
            .len()
            .checked_sub(1)
            .and_then(|last| ExitSnapshot::from_frame(frame, last))
        else {
            return Ok(None);
        };
        self.exits.decide_exit(trade, &snap)
    }

    fn param_entries(&self) -> Vec<ParamEntry> {
        self.params.entries()
    }
}
