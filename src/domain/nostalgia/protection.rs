//! Standard protection gates shared by every buy rule set.

use crate::domain::rule::{col, Rule};
use crate::domain::series::{
    DipTier, EmaLen, Flag, InformativeEmaLen, InformativeFlag, InformativeSeries, PumpTier,
    PumpWindow, Series, Tier,
};

/// An optional gate: its argument is kept even while disabled so that
/// enabling it later restores a meaningful value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guard<T> {
    pub enabled: bool,
    pub arg: T,
}

impl<T> Guard<T> {
    pub fn off(arg: T) -> Self {
        Guard {
            enabled: false,
            arg,
        }
    }

    pub fn on(arg: T) -> Self {
        Guard { enabled: true, arg }
    }

    pub fn active(&self) -> Option<&T> {
        self.enabled.then_some(&self.arg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Protections {
    /// `ema_<len> > ema_200`
    pub ema_fast: Guard<EmaLen>,
    /// `ema_<len>_1h > ema_200_1h`
    pub ema_slow: Guard<InformativeEmaLen>,
    pub close_above_ema_fast: Guard<EmaLen>,
    pub close_above_ema_slow: Guard<InformativeEmaLen>,
    /// `sma_200 > sma_200[-n]`
    pub sma200_rising: Guard<usize>,
    /// `sma_200_1h > sma_200_1h[-n]`, n in base rows
    pub sma200_1h_rising: Guard<usize>,
    pub safe_dips: Guard<DipTier>,
    pub safe_pump: Guard<(PumpWindow, PumpTier)>,
}

impl Default for Protections {
    fn default() -> Self {
        Protections {
            ema_fast: Guard::off(EmaLen::E50),
            ema_slow: Guard::off(InformativeEmaLen::E50),
            close_above_ema_fast: Guard::off(EmaLen::E200),
            close_above_ema_slow: Guard::off(InformativeEmaLen::E200),
            sma200_rising: Guard::off(50),
            sma200_1h_rising: Guard::off(50),
            safe_dips: Guard::off(Tier::Strict),
            safe_pump: Guard::off((PumpWindow::W24, Tier::Normal)),
        }
    }
}

impl Protections {
    pub fn ema_fast(mut self, len: EmaLen) -> Self {
        self.ema_fast = Guard::on(len);
        self
    }

    pub fn ema_slow(mut self, len: InformativeEmaLen) -> Self {
        self.ema_slow = Guard::on(len);
        self
    }

    pub fn close_above_ema_fast(mut self, len: EmaLen) -> Self {
        self.close_above_ema_fast = Guard::on(len);
        self
    }

    pub fn close_above_ema_slow(mut self, len: InformativeEmaLen) -> Self {
        self.close_above_ema_slow = Guard::on(len);
        self
    }

    pub fn sma200_rising(mut self, bars: usize) -> Self {
        self.sma200_rising = Guard::on(bars);
        self
    }

    pub fn sma200_1h_rising(mut self, bars: usize) -> Self {
        self.sma200_1h_rising = Guard::on(bars);
        self
    }

    pub fn safe_dips(mut self, tier: DipTier) -> Self {
        self.safe_dips = Guard::on(tier);
        self
    }

    pub fn safe_pump(mut self, window: PumpWindow, tier: PumpTier) -> Self {
        self.safe_pump = Guard::on((window, tier));
        self
    }

    /// Active gates as rules; disabled gates are left out.
    pub fn rules(&self) -> Vec<Rule> {
        let ema_200 = Series::Ema(EmaLen::E200);
        let ema_200_1h = Series::Informative(InformativeSeries::Ema(InformativeEmaLen::E200));
        let sma_200_1h = Series::Informative(InformativeSeries::Sma200);
        let mut rules = Vec::new();

        if let Some(len) = self.ema_fast.active() {
            rules.push(col(Series::Ema(*len)).gt(ema_200));
        }
        if let Some(len) = self.ema_slow.active() {
            rules.push(col(Series::Informative(InformativeSeries::Ema(*len))).gt(ema_200_1h));
        }
        if let Some(len) = self.close_above_ema_fast.active() {
            rules.push(col(Series::Close).gt(Series::Ema(*len)));
        }
        if let Some(len) = self.close_above_ema_slow.active() {
            rules.push(col(Series::Close).gt(Series::Informative(InformativeSeries::Ema(*len))));
        }
        if let Some(bars) = self.sma200_rising.active() {
            rules.push(col(Series::Sma200).gt(col(Series::Sma200).shifted(*bars)));
        }
        if let Some(bars) = self.sma200_1h_rising.active() {
            rules.push(col(sma_200_1h).gt(col(sma_200_1h).shifted(*bars)));
        }
        if let Some(tier) = self.safe_dips.active() {
            rules.push(Rule::Flag(Flag::SafeDips(*tier)));
        }
        if let Some((window, tier)) = self.safe_pump.active() {
            rules.push(Rule::Flag(Flag::Informative(InformativeFlag::SafePump(
                *window, *tier,
            ))));
        }

        rules
    }
}
