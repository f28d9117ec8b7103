//! Sell rule sets.

use crate::domain::params::Decimal;
use crate::domain::rule::{col, Rule};
use crate::domain::series::{EmaLen, InformativeSeries, Series};

#[derive(Debug, Clone, PartialEq)]
pub enum SellTrigger {
    /// RSI high while close rides above the upper band for `bars` bars.
    RsiBbStreak { rsi: Decimal, bars: usize },
    RsiMain { rsi: Decimal },
    DualRsi { rsi: Decimal, rsi_1h: Decimal },
    RsiUnderEma200 { rsi: Decimal },
    InformativeRsiEmaCross { rsi_1h: Decimal },
    AboveInformativeBb { bb_relative: Decimal },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellSet {
    pub id: u8,
    pub enabled: bool,
    pub trigger: SellTrigger,
}

impl SellSet {
    pub fn section(&self) -> String {
        format!("sell_{:02}", self.id)
    }

    pub fn rule(&self) -> Rule {
        Rule::And(self.trigger.rules())
    }
}

impl SellTrigger {
    pub fn rules(&self) -> Vec<Rule> {
        let rsi = || col(Series::Rsi);
        let rsi_1h = || col(Series::Informative(InformativeSeries::Rsi));

        let mut rules = match self {
            SellTrigger::RsiBbStreak { rsi: level, bars } => vec![
                rsi().gt(level.get()),
                col(Series::Close).gt(Series::BbUpper).consecutive(*bars),
            ],
            SellTrigger::RsiMain { rsi: level } => vec![rsi().gt(level.get())],
            SellTrigger::DualRsi {
                rsi: level,
                rsi_1h: level_1h,
            } => vec![rsi().gt(level.get()), rsi_1h().gt(level_1h.get())],
            SellTrigger::RsiUnderEma200 { rsi: level } => vec![
                col(Series::Close).lt(Series::Ema(EmaLen::E200)),
                col(Series::Close).gt(Series::Ema(EmaLen::E50)),
                rsi().gt(level.get()),
            ],
            SellTrigger::InformativeRsiEmaCross { rsi_1h: level } => vec![
                rsi_1h().gt(level.get()),
                col(Series::Ema(EmaLen::E12)).crosses_below(Series::Ema(EmaLen::E26)),
            ],
            SellTrigger::AboveInformativeBb { bb_relative } => vec![col(Series::Close).gt(
                col(Series::Informative(InformativeSeries::BbUpper)).times(bb_relative.get()),
            )],
        };
        rules.push(col(Series::Volume).gt(0.0));
        rules
    }

    pub fn decimals_mut(&mut self) -> Vec<(&'static str, &mut Decimal)> {
        match self {
            SellTrigger::RsiBbStreak { rsi, .. }
            | SellTrigger::RsiMain { rsi }
            | SellTrigger::RsiUnderEma200 { rsi } => vec![("rsi", rsi)],
            SellTrigger::DualRsi { rsi, rsi_1h } => vec![("rsi", rsi), ("rsi_1h", rsi_1h)],
            SellTrigger::InformativeRsiEmaCross { rsi_1h } => vec![("rsi_1h", rsi_1h)],
            SellTrigger::AboveInformativeBb { bb_relative } => vec![("bb_relative", bb_relative)],
        }
    }
}

/// The shipped sell rule sets. Id 5 carries no logic and is absent.
pub fn default_sell_sets() -> Vec<SellSet> {
    let set = |id: u8, trigger: SellTrigger| SellSet {
        id,
        enabled: true,
        trigger,
    };

    vec![
        set(
            1,
            SellTrigger::RsiBbStreak {
                rsi: Decimal::new(79.5, 60.0, 80.0),
                bars: 6,
            },
        ),
        set(
            2,
            SellTrigger::RsiBbStreak {
                rsi: Decimal::new(81.0, 72.0, 90.0),
                bars: 3,
            },
        ),
        set(
            3,
            SellTrigger::RsiMain {
                rsi: Decimal::new(82.0, 77.0, 90.0),
            },
        ),
        set(
            4,
            SellTrigger::DualRsi {
                rsi: Decimal::new(73.4, 72.0, 84.0),
                rsi_1h: Decimal::new(79.6, 78.0, 92.0),
            },
        ),
        set(
            6,
            SellTrigger::RsiUnderEma200 {
                rsi: Decimal::new(79.0, 72.0, 90.0),
            },
        ),
        set(
            7,
            SellTrigger::InformativeRsiEmaCross {
                rsi_1h: Decimal::new(81.7, 80.0, 95.0),
            },
        ),
        set(
            8,
            SellTrigger::AboveInformativeBb {
                bb_relative: Decimal::new(1.1, 1.05, 1.3),
            },
        ),
    ]
}
