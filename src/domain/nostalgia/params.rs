//! Threshold groups shared across rule sets: dip and pump detectors.

use crate::domain::exit::ExitParams;
use crate::domain::nostalgia::buy::{default_buy_sets, BuySet};
use crate::domain::nostalgia::sell::{default_sell_sets, SellSet};
use crate::domain::params::{Decimal, ParamEntry};
use crate::domain::series::{DipTier, PumpLevel, PumpTier, PumpWindow, Tier};

/// Safe-dip thresholds per tier, one per window in `DIP_WINDOWS`.
#[derive(Debug, Clone, PartialEq)]
pub struct DipParams {
    pub normal: [Decimal; 4],
    pub strict: [Decimal; 4],
    pub loose: [Decimal; 4],
}

impl Default for DipParams {
    fn default() -> Self {
        DipParams {
            normal: [
                Decimal::new(0.02, 0.001, 0.05),
                Decimal::new(0.14, 0.01, 0.2),
                Decimal::new(0.32, 0.05, 0.4),
                Decimal::new(0.5, 0.2, 0.5),
            ],
            strict: [
                Decimal::new(0.015, 0.001, 0.05),
                Decimal::new(0.06, 0.01, 0.2),
                Decimal::new(0.24, 0.05, 0.4),
                Decimal::new(0.4, 0.2, 0.5),
            ],
            loose: [
                Decimal::new(0.026, 0.001, 0.05),
                Decimal::new(0.24, 0.01, 0.2),
                Decimal::new(0.42, 0.05, 0.4),
                Decimal::new(0.66, 0.2, 0.5),
            ],
        }
    }
}

impl DipParams {
    fn tier(&self, tier: DipTier) -> &[Decimal; 4] {
        match tier {
            Tier::Strict => &self.strict,
            Tier::Normal => &self.normal,
            Tier::Loose => &self.loose,
        }
    }

    pub fn thresholds(&self, tier: DipTier) -> [f64; 4] {
        let group = *self.tier(tier);
        group.map(|d| d.get())
    }

    /// Keys `<tier>_<1..4>`.
    pub fn decimals_mut(&mut self) -> Vec<(String, &mut Decimal)> {
        let mut out = Vec::with_capacity(12);
        for (tier, group) in [
            (Tier::Strict, &mut self.strict),
            (Tier::Normal, &mut self.normal),
            (Tier::Loose, &mut self.loose),
        ] {
            for (i, d) in group.iter_mut().enumerate() {
                out.push((format!("{tier}_{}", i + 1), d));
            }
        }
        out
    }
}

/// Threshold and pull-back divisor of one safe-pump flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpGuard {
    pub window: PumpWindow,
    pub tier: PumpTier,
    pub threshold: Decimal,
    pub pull: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PumpParams {
    pub guards: Vec<PumpGuard>,
}

impl Default for PumpParams {
    fn default() -> Self {
        use PumpWindow::{W24, W36, W48};
        use Tier::{Loose, Normal, Strict};

        let g = |window, tier, threshold: (f64, f64, f64), pull: (f64, f64, f64)| PumpGuard {
            window,
            tier,
            threshold: Decimal::new(threshold.0, threshold.1, threshold.2),
            pull: Decimal::new(pull.0, pull.1, pull.2),
        };

        PumpParams {
            guards: vec![
                g(W24, Normal, (0.6, 0.4, 1.0), (1.75, 1.5, 3.0)),
                g(W36, Normal, (0.64, 0.4, 1.0), (1.75, 1.5, 3.0)),
                g(W48, Normal, (0.85, 0.4, 1.0), (1.75, 1.5, 3.0)),
                g(W24, Strict, (0.42, 0.4, 1.0), (2.2, 1.5, 3.0)),
                g(W36, Strict, (0.58, 0.4, 1.0), (2.0, 1.5, 3.0)),
                g(W48, Strict, (0.8, 0.4, 1.0), (2.0, 1.5, 3.0)),
                g(W24, Loose, (0.66, 0.4, 1.0), (1.7, 1.5, 3.0)),
                g(W36, Loose, (0.7, 0.4, 1.0), (1.7, 1.5, 3.0)),
                g(W48, Loose, (1.6, 0.4, 1.8), (1.4, 1.3, 2.0)),
            ],
        }
    }
}

impl PumpParams {
    /// Keys `threshold_<window>_<tier>` and `pull_<window>_<tier>`.
    pub fn decimals_mut(&mut self) -> Vec<(String, &mut Decimal)> {
        let mut out = Vec::with_capacity(self.guards.len() * 2);
        for g in &mut self.guards {
            let suffix = format!("{}_{}", g.window, g.tier);
            out.push((format!("threshold_{suffix}"), &mut g.threshold));
            out.push((format!("pull_{suffix}"), &mut g.pull));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SellPumpLevel {
    pub window: PumpWindow,
    pub level: PumpLevel,
    pub threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellPumpParams {
    pub levels: Vec<SellPumpLevel>,
}

impl Default for SellPumpParams {
    fn default() -> Self {
        use PumpLevel::{L1, L2, L3};
        use PumpWindow::{W24, W36, W48};

        let l = |window, level, v, lo, hi| SellPumpLevel {
            window,
            level,
            threshold: Decimal::new(v, lo, hi),
        };

        SellPumpParams {
            levels: vec![
                l(W48, L1, 0.9, 0.5, 1.2),
                l(W48, L2, 0.7, 0.4, 0.9),
                l(W48, L3, 0.5, 0.3, 0.7),
                l(W36, L1, 0.72, 0.5, 0.9),
                l(W36, L2, 4.0, 3.0, 6.0),
                l(W36, L3, 1.0, 0.8, 1.6),
                l(W24, L1, 0.68, 0.5, 0.9),
                l(W24, L2, 0.4, 0.3, 0.6),
                l(W24, L3, 0.3, 0.2, 0.5),
            ],
        }
    }
}

impl SellPumpParams {
    /// Keys `threshold_<window>_<level>`.
    pub fn decimals_mut(&mut self) -> Vec<(String, &mut Decimal)> {
        self.levels
            .iter_mut()
            .map(|l| {
                (
                    format!("threshold_{}_{}", l.window, l.level.number()),
                    &mut l.threshold,
                )
            })
            .collect()
    }
}

/// Every tunable of the Nostalgia strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct NostalgiaParams {
    pub buy: Vec<BuySet>,
    pub sell: Vec<SellSet>,
    pub dips: DipParams,
    pub pumps: PumpParams,
    pub sell_pumps: SellPumpParams,
    pub exit: ExitParams,
}

impl Default for NostalgiaParams {
    fn default() -> Self {
        NostalgiaParams {
            buy: default_buy_sets(),
            sell: default_sell_sets(),
            dips: DipParams::default(),
            pumps: PumpParams::default(),
            sell_pumps: SellPumpParams::default(),
            exit: ExitParams::default(),
        }
    }
}

impl NostalgiaParams {
    pub fn buy_set_mut(&mut self, id: u8) -> Option<&mut BuySet> {
        self.buy.iter_mut().find(|s| s.id == id)
    }

    pub fn sell_set_mut(&mut self, id: u8) -> Option<&mut SellSet> {
        self.sell.iter_mut().find(|s| s.id == id)
    }

    /// Every decimal grouped by INI section, in a stable order.
    pub fn decimals_mut(&mut self) -> Vec<(String, String, &mut Decimal)> {
        let mut out = Vec::new();
        for set in &mut self.buy {
            let section = set.section();
            for (key, d) in set.trigger.decimals_mut() {
                out.push((section.clone(), key.to_string(), d));
            }
        }
        for set in &mut self.sell {
            let section = set.section();
            for (key, d) in set.trigger.decimals_mut() {
                out.push((section.clone(), key.to_string(), d));
            }
        }
        let groups = [
            ("dips", self.dips.decimals_mut()),
            ("pumps", self.pumps.decimals_mut()),
            ("sell_pumps", self.sell_pumps.decimals_mut()),
            ("exit", self.exit.decimals_mut()),
        ];
        for (section, decimals) in groups {
            for (key, d) in decimals {
                out.push((section.to_string(), key, d));
            }
        }
        out
    }

    pub fn entries(&self) -> Vec<ParamEntry> {
        let mut copy = self.clone();
        copy.decimals_mut()
            .into_iter()
            .map(|(section, key, d)| ParamEntry {
                section,
                key,
                value: *d,
            })
            .collect()
    }
}
