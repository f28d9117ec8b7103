//! Custom exit classification for an open trade.
//!
//! The classifier is an ordered table of bands. Each band combines a profit
//! gate with optional RSI, indicator and trailing conditions; the first band
//! that matches names the exit reason.

use crate::domain::error::StrategyError;
use crate::domain::frame::Frame;
use crate::domain::params::Decimal;
use crate::domain::series::{
    EmaLen, Flag, InformativeFlag, InformativeSeries, PumpLevel, PumpWindow, Series,
};
use crate::domain::trade::Trade;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Profit(u8),
    ProfitUnder(u8),
    /// Window 1 is the 48h pump, 2 the 36h, 3 the 24h.
    ProfitPump { window: u8, band: u8 },
    ProfitDescending(u8),
    ProfitTrail(u8),
    ProfitUnderTrail,
    ProfitUnderAccept,
    StoplossUnder,
    ProfitPumpDescending(u8),
    ProfitPumpUnder,
    ProfitPumpTrail,
    StoplossPump(u8),
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Profit(n) => write!(f, "signal_profit_{n}"),
            ExitReason::ProfitUnder(n) => write!(f, "signal_profit_u_{n}"),
            ExitReason::ProfitPump { window, band } => write!(f, "signal_profit_p_{window}_{band}"),
            ExitReason::ProfitDescending(n) => write!(f, "signal_profit_d_{n}"),
            ExitReason::ProfitTrail(n) => write!(f, "signal_profit_t_{n}"),
            ExitReason::ProfitUnderTrail => f.write_str("signal_profit_u_t_1"),
            ExitReason::ProfitUnderAccept => f.write_str("signal_profit_u_e_1"),
            ExitReason::StoplossUnder => f.write_str("signal_stoploss_u_1"),
            ExitReason::ProfitPumpDescending(n) => write!(f, "signal_profit_p_d_{n}"),
            ExitReason::ProfitPumpUnder => f.write_str("signal_profit_p_u_1"),
            ExitReason::ProfitPumpTrail => f.write_str("signal_profit_p_t_1"),
            ExitReason::StoplossPump(n) => write!(f, "signal_stoploss_p_{n}"),
        }
    }
}

/// Bounds on the current profit ratio. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitGate {
    Above(f64),
    Below(f64),
    Between { low: f64, high: f64 },
}

impl ProfitGate {
    fn admits(&self, profit: f64) -> bool {
        match *self {
            ProfitGate::Above(v) => profit > v,
            ProfitGate::Below(v) => profit < v,
            ProfitGate::Between { low, high } => low < profit && profit < high,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RsiGate {
    Below(f64),
    Between { low: f64, high: f64 },
    /// `rsi > rsi_1h + diff`
    AboveInformative { diff: f64 },
}

impl RsiGate {
    fn admits(&self, snap: &ExitSnapshot) -> bool {
        match *self {
            RsiGate::Below(v) => snap.rsi < v,
            RsiGate::Between { low, high } => low < snap.rsi && snap.rsi < high,
            RsiGate::AboveInformative { diff } => snap.rsi > snap.rsi_1h + diff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    CloseBelowEma200,
    CloseBelowEma100,
    CloseBelowScaledEma200(f64),
    /// `(ema_200 - close) / close < rel`
    NearEma200 { rel: f64 },
    Sma200Dec,
    Sma200DecInformative,
    SellPump(PumpWindow, PumpLevel),
}

impl Condition {
    fn holds(&self, snap: &ExitSnapshot) -> bool {
        match *self {
            Condition::CloseBelowEma200 => snap.close < snap.ema_200,
            Condition::CloseBelowEma100 => snap.close < snap.ema_100,
            Condition::CloseBelowScaledEma200(offset) => snap.close < snap.ema_200 * offset,
            Condition::NearEma200 { rel } => (snap.ema_200 - snap.close) / snap.close < rel,
            Condition::Sma200Dec => snap.sma_200_dec,
            Condition::Sma200DecInformative => snap.sma_200_dec_1h,
            Condition::SellPump(window, level) => snap.sell_pump(window, level),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExitBand {
    pub reason: ExitReason,
    pub profit: ProfitGate,
    pub rsi: Option<RsiGate>,
    pub conditions: Vec<Condition>,
    /// Required `max_profit > profit + drawback`.
    pub drawback: Option<f64>,
    /// Required `max_profit < cap`.
    pub peak_cap: Option<f64>,
}

impl ExitBand {
    fn new(reason: ExitReason, profit: ProfitGate) -> Self {
        ExitBand {
            reason,
            profit,
            rsi: None,
            conditions: Vec::new(),
            drawback: None,
            peak_cap: None,
        }
    }

    fn rsi(mut self, gate: RsiGate) -> Self {
        self.rsi = Some(gate);
        self
    }

    fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    fn drawback(mut self, down: f64) -> Self {
        self.drawback = Some(down);
        self
    }

    fn peak_cap(mut self, cap: f64) -> Self {
        self.peak_cap = Some(cap);
        self
    }

    pub fn matches(&self, profit: f64, max_profit: f64, snap: &ExitSnapshot) -> bool {
        self.profit.admits(profit)
            && self.rsi.is_none_or(|g| g.admits(snap))
            && self.conditions.iter().all(|c| c.holds(snap))
            && self.drawback.is_none_or(|down| max_profit > profit + down)
            && self.peak_cap.is_none_or(|cap| max_profit < cap)
    }
}

/// Indicator values of the latest analysed bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitSnapshot {
    pub close: f64,
    pub rsi: f64,
    pub rsi_1h: f64,
    pub ema_100: f64,
    pub ema_200: f64,
    pub sma_200_dec: bool,
    pub sma_200_dec_1h: bool,
    /// Indexed by window (24, 36, 48) then level (1..3).
    pub sell_pump: [[bool; 3]; 3],
}

fn window_slot(window: PumpWindow) -> usize {
    match window {
        PumpWindow::W24 => 0,
        PumpWindow::W36 => 1,
        PumpWindow::W48 => 2,
    }
}

impl ExitSnapshot {
    pub fn sell_pump(&self, window: PumpWindow, level: PumpLevel) -> bool {
        self.sell_pump[window_slot(window)][usize::from(level.number() - 1)]
    }

    /// Snapshot of row `index`; `None` if the frame has no such row.
    pub fn from_frame(frame: &Frame, index: usize) -> Option<Self> {
        if index >= frame.len() {
            return None;
        }
        let mut sell_pump = [[false; 3]; 3];
        for window in PumpWindow::ALL {
            for level in PumpLevel::ALL {
                let flag = Flag::Informative(InformativeFlag::SellPump(window, level));
                sell_pump[window_slot(window)][usize::from(level.number() - 1)] =
                    frame.flag_at(flag, index);
            }
        }
        Some(ExitSnapshot {
            close: frame.value(Series::Close, index),
            rsi: frame.value(Series::Rsi, index),
            rsi_1h: frame.value(Series::Informative(InformativeSeries::Rsi), index),
            ema_100: frame.value(Series::Ema(EmaLen::E100), index),
            ema_200: frame.value(Series::Ema(EmaLen::E200), index),
            sma_200_dec: frame.flag_at(Flag::Sma200Dec, index),
            sma_200_dec_1h: frame.flag_at(Flag::Informative(InformativeFlag::Sma200Dec), index),
            sell_pump,
        })
    }
}

const fn d(value: f64, low: f64, high: f64) -> Decimal {
    Decimal::new(value, low, high)
}

/// Thresholds of the exit cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitParams {
    pub profit: [Decimal; 7],
    pub rsi: [Decimal; 7],
    pub under_profit: [Decimal; 7],
    pub under_rsi: [Decimal; 7],
    /// `[window][band]`, windows ordered 48h, 36h, 24h.
    pub pump_profit: [[Decimal; 5]; 3],
    pub pump_rsi: [[Decimal; 5]; 3],
    pub dec_profit_min: [Decimal; 2],
    pub dec_profit_max: [Decimal; 2],
    pub trail_profit_min: [Decimal; 3],
    pub trail_profit_max: [Decimal; 3],
    pub trail_down: [Decimal; 3],
    pub trail_rsi_min: [Decimal; 2],
    pub trail_rsi_max: [Decimal; 2],
    pub profit_under_rel: Decimal,
    pub profit_under_rsi_diff: Decimal,
    pub stoploss_under_rel: Decimal,
    pub stoploss_under_rsi_diff: Decimal,
    pub pump_dec_profit_min: [Decimal; 3],
    pub pump_dec_profit_max: [Decimal; 3],
    pub pump_under_profit_min: Decimal,
    pub pump_under_profit_max: Decimal,
    pub pump_trail_profit_min: Decimal,
    pub pump_trail_profit_max: Decimal,
    pub pump_trail_down: Decimal,
    pub pump_trail_rsi_min: Decimal,
    pub pump_trail_rsi_max: Decimal,
    pub stoploss_pump_max_profit: [Decimal; 3],
    pub stoploss_pump_min: Decimal,
    pub stoploss_pump_max: Decimal,
    /// Loss limits of pump stoplosses 2 and 3.
    pub stoploss_pump_loss: [Decimal; 2],
    pub stoploss_pump_ma_offset: [Decimal; 3],
}

impl Default for ExitParams {
    fn default() -> Self {
        let pump_profit = [
            d(0.01, 0.01, 0.03),
            d(0.02, 0.01, 0.6),
            d(0.04, 0.02, 0.1),
            d(0.1, 0.06, 0.12),
            d(0.2, 0.14, 0.24),
        ];
        ExitParams {
            profit: [
                d(0.01, 0.01, 0.1),
                d(0.03, 0.01, 0.1),
                d(0.05, 0.01, 0.1),
                d(0.08, 0.06, 0.3),
                d(0.1, 0.06, 0.3),
                d(0.12, 0.2, 0.45),
                d(0.2, 0.16, 0.45),
            ],
            rsi: [
                d(33.0, 30.0, 40.0),
                d(38.0, 30.0, 50.0),
                d(43.0, 34.0, 50.0),
                d(48.0, 38.0, 55.0),
                d(50.0, 38.0, 55.0),
                d(42.0, 40.0, 58.0),
                d(34.0, 20.0, 40.0),
            ],
            under_profit: [
                d(0.01, 0.01, 0.4),
                d(0.02, 0.01, 0.1),
                d(0.04, 0.01, 0.1),
                d(0.06, 0.01, 0.1),
                d(0.08, 0.05, 0.12),
                d(0.1, 0.06, 0.14),
                d(0.2, 0.16, 0.3),
            ],
            under_rsi: [
                d(33.0, 28.0, 40.0),
                d(56.0, 36.0, 60.0),
                d(60.0, 46.0, 66.0),
                d(62.0, 50.0, 68.0),
                d(56.0, 50.0, 68.0),
                d(42.0, 36.0, 48.0),
                d(34.0, 20.0, 40.0),
            ],
            pump_profit: [pump_profit; 3],
            pump_rsi: [
                [
                    d(34.0, 26.0, 40.0),
                    d(40.0, 36.0, 50.0),
                    d(42.0, 38.0, 50.0),
                    d(42.0, 36.0, 48.0),
                    d(34.0, 20.0, 40.0),
                ],
                [
                    d(34.0, 26.0, 40.0),
                    d(40.0, 36.0, 50.0),
                    d(40.0, 38.0, 50.0),
                    d(42.0, 36.0, 48.0),
                    d(34.0, 20.0, 40.0),
                ],
                [
                    d(34.0, 26.0, 40.0),
                    d(40.0, 34.0, 50.0),
                    d(40.0, 38.0, 50.0),
                    d(42.0, 36.0, 48.0),
                    d(34.0, 20.0, 40.0),
                ],
            ],
            dec_profit_min: [d(0.05, 0.01, 0.1), d(0.07, 0.05, 0.12)],
            dec_profit_max: [d(0.12, 0.06, 0.16), d(0.16, 0.06, 0.2)],
            trail_profit_min: [d(0.16, 0.1, 0.2), d(0.1, 0.08, 0.16), d(0.06, 0.01, 0.12)],
            trail_profit_max: [d(0.6, 0.4, 0.7), d(0.4, 0.3, 0.5), d(0.2, 0.1, 0.3)],
            trail_down: [d(0.03, 0.01, 0.08), d(0.03, 0.02, 0.08), d(0.05, 0.01, 0.06)],
            trail_rsi_min: [d(20.0, 16.0, 36.0), d(20.0, 16.0, 36.0)],
            trail_rsi_max: [d(50.0, 30.0, 50.0), d(50.0, 30.0, 50.0)],
            profit_under_rel: d(0.024, 0.01, 0.04),
            profit_under_rsi_diff: d(4.4, 0.0, 20.0),
            stoploss_under_rel: d(0.004, 0.001, 0.02),
            stoploss_under_rsi_diff: d(8.0, 0.0, 20.0),
            pump_dec_profit_min: [d(0.005, 0.001, 0.04), d(0.04, 0.01, 0.08), d(0.06, 0.02, 0.1)],
            pump_dec_profit_max: [d(0.05, 0.03, 0.08), d(0.06, 0.04, 0.1), d(0.09, 0.06, 0.12)],
            pump_under_profit_min: d(0.04, 0.02, 0.06),
            pump_under_profit_max: d(0.09, 0.04, 0.1),
            pump_trail_profit_min: d(0.05, 0.01, 0.12),
            pump_trail_profit_max: d(0.07, 0.06, 0.16),
            pump_trail_down: d(0.05, 0.01, 0.06),
            pump_trail_rsi_min: d(20.0, 16.0, 36.0),
            pump_trail_rsi_max: d(70.0, 30.0, 50.0),
            stoploss_pump_max_profit: [
                d(0.025, 0.01, 0.04),
                d(0.025, 0.01, 0.04),
                d(0.008, 0.01, 0.04),
            ],
            stoploss_pump_min: d(-0.02, -0.1, -0.01),
            stoploss_pump_max: d(-0.01, -0.1, -0.01),
            stoploss_pump_loss: [d(-0.05, -0.1, -0.01), d(-0.12, -0.16, -0.06)],
            stoploss_pump_ma_offset: [d(0.94, 0.7, 0.99), d(0.92, 0.7, 0.99), d(0.88, 0.7, 0.99)],
        }
    }
}

fn push_group<'a>(
    out: &mut Vec<(String, &'a mut Decimal)>,
    prefix: &str,
    first: usize,
    group: &'a mut [Decimal],
) {
    for (i, d) in group.iter_mut().enumerate() {
        out.push((format!("{prefix}_{}", i + first), d));
    }
}

impl ExitParams {
    /// Every threshold with its `[exit]` key.
    pub fn decimals_mut(&mut self) -> Vec<(String, &mut Decimal)> {
        let mut out = Vec::new();
        push_group(&mut out, "profit", 0, &mut self.profit);
        push_group(&mut out, "rsi", 0, &mut self.rsi);
        push_group(&mut out, "under_profit", 0, &mut self.under_profit);
        push_group(&mut out, "under_rsi", 0, &mut self.under_rsi);
        for (w, group) in self.pump_profit.iter_mut().enumerate() {
            push_group(&mut out, &format!("pump_profit_{}", w + 1), 1, group);
        }
        for (w, group) in self.pump_rsi.iter_mut().enumerate() {
            push_group(&mut out, &format!("pump_rsi_{}", w + 1), 1, group);
        }
        push_group(&mut out, "dec_profit_min", 1, &mut self.dec_profit_min);
        push_group(&mut out, "dec_profit_max", 1, &mut self.dec_profit_max);
        push_group(&mut out, "trail_profit_min", 1, &mut self.trail_profit_min);
        push_group(&mut out, "trail_profit_max", 1, &mut self.trail_profit_max);
        push_group(&mut out, "trail_down", 1, &mut self.trail_down);
        push_group(&mut out, "trail_rsi_min", 1, &mut self.trail_rsi_min);
        push_group(&mut out, "trail_rsi_max", 1, &mut self.trail_rsi_max);
        out.push(("profit_under_rel_1".into(), &mut self.profit_under_rel));
        out.push(("profit_under_rsi_diff_1".into(), &mut self.profit_under_rsi_diff));
        out.push(("stoploss_under_rel_1".into(), &mut self.stoploss_under_rel));
        out.push(("stoploss_under_rsi_diff_1".into(), &mut self.stoploss_under_rsi_diff));
        push_group(&mut out, "pump_dec_profit_min", 1, &mut self.pump_dec_profit_min);
        push_group(&mut out, "pump_dec_profit_max", 1, &mut self.pump_dec_profit_max);
        out.push(("pump_under_profit_min_1".into(), &mut self.pump_under_profit_min));
        out.push(("pump_under_profit_max_1".into(), &mut self.pump_under_profit_max));
        out.push(("pump_trail_profit_min_1".into(), &mut self.pump_trail_profit_min));
        out.push(("pump_trail_profit_max_1".into(), &mut self.pump_trail_profit_max));
        out.push(("pump_trail_down_1".into(), &mut self.pump_trail_down));
        out.push(("pump_trail_rsi_min_1".into(), &mut self.pump_trail_rsi_min));
        out.push(("pump_trail_rsi_max_1".into(), &mut self.pump_trail_rsi_max));
        push_group(&mut out, "stoploss_pump_max_profit", 1, &mut self.stoploss_pump_max_profit);
        out.push(("stoploss_pump_min_1".into(), &mut self.stoploss_pump_min));
        out.push(("stoploss_pump_max_1".into(), &mut self.stoploss_pump_max));
        push_group(&mut out, "stoploss_pump_loss", 2, &mut self.stoploss_pump_loss);
        push_group(&mut out, "stoploss_pump_ma_offset", 1, &mut self.stoploss_pump_ma_offset);
        out
    }
}

/// Windows of the pumped profit bands, in evaluation order.
const PUMP_BAND_WINDOWS: [PumpWindow; 3] = [PumpWindow::W48, PumpWindow::W36, PumpWindow::W24];

/// Band ladder `top..0`: the top band is open-ended, the others sit
/// strictly between their own threshold and the next one up.
fn ladder(
    profits: &[Decimal],
    rsis: &[Decimal],
    reason: impl Fn(usize) -> ExitReason,
) -> Vec<ExitBand> {
    let top = profits.len() - 1;
    (0..=top)
        .rev()
        .map(|i| {
            let gate = if i == top {
                ProfitGate::Above(profits[i].get())
            } else {
                ProfitGate::Between {
                    low: profits[i].get(),
                    high: profits[i + 1].get(),
                }
            };
            ExitBand::new(reason(i), gate).rsi(RsiGate::Below(rsis[i].get()))
        })
        .collect()
}

fn between(low: &Decimal, high: &Decimal) -> ProfitGate {
    ProfitGate::Between {
        low: low.get(),
        high: high.get(),
    }
}

#[derive(Debug, Clone)]
pub struct ExitClassifier {
    bands: Vec<ExitBand>,
}

impl ExitClassifier {
    pub fn new(p: &ExitParams) -> Self {
        use Condition::*;
        let mut bands = Vec::new();

        bands.extend(ladder(&p.profit, &p.rsi, |i| ExitReason::Profit(i as u8)));
        bands.extend(
            ladder(&p.under_profit, &p.under_rsi, |i| ExitReason::ProfitUnder(i as u8))
                .into_iter()
                .map(|b| b.when(CloseBelowEma200)),
        );

        for (w, window) in PUMP_BAND_WINDOWS.into_iter().enumerate() {
            bands.extend(
                ladder(&p.pump_profit[w], &p.pump_rsi[w], |i| ExitReason::ProfitPump {
                    window: w as u8 + 1,
                    band: i as u8 + 1,
                })
                .into_iter()
                .map(|b| b.when(SellPump(window, PumpLevel::L1))),
            );
        }

        bands.push(
            ExitBand::new(
                ExitReason::ProfitDescending(1),
                between(&p.dec_profit_min[0], &p.dec_profit_max[0]),
            )
            .when(Sma200Dec),
        );
        bands.push(
            ExitBand::new(
                ExitReason::ProfitDescending(2),
                between(&p.dec_profit_min[1], &p.dec_profit_max[1]),
            )
            .when(CloseBelowEma100),
        );

        for i in 0..2 {
            bands.push(
                ExitBand::new(
                    ExitReason::ProfitTrail(i as u8 + 1),
                    between(&p.trail_profit_min[i], &p.trail_profit_max[i]),
                )
                .rsi(RsiGate::Between {
                    low: p.trail_rsi_min[i].get(),
                    high: p.trail_rsi_max[i].get(),
                })
                .drawback(p.trail_down[i].get()),
            );
        }
        bands.push(
            ExitBand::new(
                ExitReason::ProfitTrail(3),
                between(&p.trail_profit_min[2], &p.trail_profit_max[2]),
            )
            .drawback(p.trail_down[2].get())
            .when(Sma200DecInformative),
        );

        bands.push(
            ExitBand::new(
                ExitReason::ProfitUnderTrail,
                between(&p.trail_profit_min[2], &p.trail_profit_max[2]),
            )
            .when(CloseBelowEma200)
            .drawback(p.trail_down[2].get()),
        );
        bands.push(
            ExitBand::new(ExitReason::ProfitUnderAccept, ProfitGate::Above(0.0))
                .when(CloseBelowEma200)
                .when(NearEma200 {
                    rel: p.profit_under_rel.get(),
                })
                .rsi(RsiGate::AboveInformative {
                    diff: p.profit_under_rsi_diff.get(),
                }),
        );
        bands.push(
            ExitBand::new(ExitReason::StoplossUnder, ProfitGate::Below(-0.0))
                .when(CloseBelowEma200)
                .when(NearEma200 {
                    rel: p.stoploss_under_rel.get(),
                })
                .rsi(RsiGate::AboveInformative {
                    diff: p.stoploss_under_rsi_diff.get(),
                }),
        );

        for (i, level) in PumpLevel::ALL.into_iter().enumerate() {
            bands.push(
                ExitBand::new(
                    ExitReason::ProfitPumpDescending(i as u8 + 1),
                    between(&p.pump_dec_profit_min[i], &p.pump_dec_profit_max[i]),
                )
                .when(SellPump(PumpWindow::W48, level))
                .when(Sma200Dec)
                .when(CloseBelowEma200),
            );
        }
        bands.push(
            ExitBand::new(
                ExitReason::ProfitPumpUnder,
                between(&p.pump_under_profit_min, &p.pump_under_profit_max),
            )
            .when(SellPump(PumpWindow::W48, PumpLevel::L1))
            .when(CloseBelowEma200),
        );
        bands.push(
            ExitBand::new(
                ExitReason::ProfitPumpTrail,
                between(&p.pump_trail_profit_min, &p.pump_trail_profit_max),
            )
            .when(SellPump(PumpWindow::W36, PumpLevel::L2))
            .rsi(RsiGate::Between {
                low: p.pump_trail_rsi_min.get(),
                high: p.pump_trail_rsi_max.get(),
            })
            .drawback(p.pump_trail_down.get()),
        );

        bands.push(
            ExitBand::new(
                ExitReason::StoplossPump(1),
                between(&p.stoploss_pump_min, &p.stoploss_pump_max),
            )
            .peak_cap(p.stoploss_pump_max_profit[0].get())
            .when(SellPump(PumpWindow::W48, PumpLevel::L1))
            .when(Sma200Dec)
            .when(CloseBelowScaledEma200(p.stoploss_pump_ma_offset[0].get())),
        );
        bands.push(
            ExitBand::new(
                ExitReason::StoplossPump(2),
                ProfitGate::Below(p.stoploss_pump_loss[0].get()),
            )
            .peak_cap(p.stoploss_pump_max_profit[1].get())
            .when(SellPump(PumpWindow::W48, PumpLevel::L1))
            .when(Sma200DecInformative)
            .when(CloseBelowScaledEma200(p.stoploss_pump_ma_offset[1].get())),
        );
        bands.push(
            ExitBand::new(
                ExitReason::StoplossPump(3),
                ProfitGate::Below(p.stoploss_pump_loss[1].get()),
            )
            .peak_cap(p.stoploss_pump_max_profit[2].get())
            .when(SellPump(PumpWindow::W36, PumpLevel::L3))
            .when(CloseBelowScaledEma200(p.stoploss_pump_ma_offset[2].get())),
        );

        ExitClassifier { bands }
    }

    pub fn bands(&self) -> &[ExitBand] {
        &self.bands
    }

    /// First matching band for `trade` given the latest bar.
    pub fn decide_exit(
        &self,
        trade: &Trade,
        snap: &ExitSnapshot,
    ) -> Result<Option<ExitReason>, StrategyError> {
        trade.validate()?;
        let profit = trade.profit_ratio();
        let max_profit = trade.max_profit_ratio();

        let reason = self
            .bands
            .iter()
            .find(|b| b.matches(profit, max_profit, snap))
            .map(|b| b.reason);
        tracing::debug!(
            pair = %trade.pair,
            profit,
            max_profit,
            reason = reason.map(|r| r.to_string()).unwrap_or_else(|| "none".into()),
            "exit classified"
        );
        Ok(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade(open: f64, current: f64, max: f64) -> Trade {
        Trade {
            pair: "BTC/USDT".into(),
            open_time: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open_rate: open,
            current_rate: current,
            max_rate: max,
            is_open: true,
        }
    }

    /// Close well above both EMAs, no flags set.
    fn calm(rsi: f64) -> ExitSnapshot {
        ExitSnapshot {
            close: 110.0,
            rsi,
            rsi_1h: 50.0,
            ema_100: 100.0,
            ema_200: 100.0,
            sma_200_dec: false,
            sma_200_dec_1h: false,
            sell_pump: [[false; 3]; 3],
        }
    }

    fn classify(t: &Trade, snap: &ExitSnapshot) -> Option<String> {
        ExitClassifier::new(&ExitParams::default())
            .decide_exit(t, snap)
            .unwrap()
            .map(|r| r.to_string())
    }

    #[test]
    fn band_table_has_every_reason_once() {
        let c = ExitClassifier::new(&ExitParams::default());
        assert_eq!(c.bands().len(), 45);
        let mut tags: Vec<String> = c.bands().iter().map(|b| b.reason.to_string()).collect();
        assert_eq!(tags[0], "signal_profit_6");
        assert_eq!(tags[44], "signal_stoploss_p_3");
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), 45);
    }

    #[test]
    fn profit_band_between_thresholds() {
        let t = trade(100.0, 109.0, 109.0);
        assert_eq!(classify(&t, &calm(40.0)).as_deref(), Some("signal_profit_3"));
    }

    #[test]
    fn profit_band_top_is_open_ended() {
        let t = trade(100.0, 150.0, 150.0);
        assert_eq!(classify(&t, &calm(30.0)).as_deref(), Some("signal_profit_6"));
    }

    #[test]
    fn profit_band_boundaries_are_strict() {
        // 0.05 is neither above profit_2's floor nor below profit_1's ceiling
        let t = trade(100.0, 105.0, 105.0);
        assert_eq!(classify(&t, &calm(30.0)), None);
    }

    #[test]
    fn under_ema_band() {
        let t = trade(100.0, 104.5, 104.5);
        let mut snap = calm(55.0);
        snap.close = 99.0;
        assert_eq!(classify(&t, &snap).as_deref(), Some("signal_profit_u_2"));
    }

    #[test]
    fn pumped_band_needs_flag() {
        let t = trade(100.0, 104.5, 104.5);
        let mut snap = calm(39.0);
        assert_eq!(classify(&t, &snap), None);
        snap.sell_pump[2][0] = true;
        assert_eq!(classify(&t, &snap).as_deref(), Some("signal_profit_p_1_3"));
    }

    #[test]
    fn trailing_needs_drawback() {
        let snap = calm(45.0);
        assert_eq!(
            classify(&trade(100.0, 130.0, 140.0), &snap).as_deref(),
            Some("signal_profit_t_1")
        );
        assert_eq!(classify(&trade(100.0, 130.0, 132.0), &snap), None);
    }

    #[test]
    fn stoploss_under_ema() {
        let t = trade(100.0, 95.0, 100.0);
        let mut snap = calm(50.0);
        snap.close = 99.0;
        snap.ema_200 = 99.2;
        snap.ema_100 = 98.0;
        snap.rsi_1h = 40.0;
        assert_eq!(classify(&t, &snap).as_deref(), Some("signal_stoploss_u_1"));
        snap.rsi_1h = 45.0;
        assert_eq!(classify(&t, &snap), None);
    }

    #[test]
    fn stoploss_pump_respects_peak_cap() {
        let mut snap = calm(50.0);
        snap.close = 80.0;
        snap.ema_200 = 100.0;
        snap.sell_pump[1][2] = true;
        let t = trade(100.0, 85.0, 100.5);
        assert_eq!(classify(&t, &snap).as_deref(), Some("signal_stoploss_p_3"));
        let t = trade(100.0, 85.0, 101.0);
        assert_eq!(classify(&t, &snap), None);
    }

    #[test]
    fn nan_indicators_never_match_rsi_bands() {
        let t = trade(100.0, 109.0, 109.0);
        assert_eq!(classify(&t, &calm(f64::NAN)), None);
    }

    #[test]
    fn closed_trade_is_rejected() {
        let mut t = trade(100.0, 109.0, 109.0);
        t.is_open = false;
        let c = ExitClassifier::new(&ExitParams::default());
        assert!(matches!(
            c.decide_exit(&t, &calm(40.0)),
            Err(StrategyError::InvalidTrade { .. })
        ));
    }

    #[test]
    fn exit_keys() {
        let mut p = ExitParams::default();
        let keys: Vec<String> = p.decimals_mut().into_iter().map(|(k, _)| k).collect();
        for k in [
            "profit_0",
            "rsi_6",
            "pump_profit_2_5",
            "pump_rsi_3_1",
            "trail_down_3",
            "stoploss_pump_loss_2",
            "stoploss_pump_loss_3",
            "pump_trail_rsi_max_1",
        ] {
            assert!(keys.iter().any(|x| x == k), "{k}");
        }
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
    }
}
