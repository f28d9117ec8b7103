//! Column identifiers for indicator frames.
//!
//! Categorical parameters (`EmaLen`, `InformativeEmaLen`, `Tier`,
//! `PumpWindow`) only admit values for which a column is computed, so a rule
//! built from them can always be resolved.

use crate::domain::error::StrategyError;
use std::fmt;
use std::str::FromStr;

/// EMA lengths computed on the base timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmaLen {
    E12,
    E20,
    E26,
    E50,
    E100,
    E200,
}

impl EmaLen {
    pub const ALL: [EmaLen; 6] = [
        EmaLen::E12,
        EmaLen::E20,
        EmaLen::E26,
        EmaLen::E50,
        EmaLen::E100,
        EmaLen::E200,
    ];

    pub fn period(self) -> usize {
        match self {
            EmaLen::E12 => 12,
            EmaLen::E20 => 20,
            EmaLen::E26 => 26,
            EmaLen::E50 => 50,
            EmaLen::E100 => 100,
            EmaLen::E200 => 200,
        }
    }
}

/// EMA lengths computed on the informative timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InformativeEmaLen {
    E15,
    E20,
    E26,
    E50,
    E100,
    E200,
}

impl InformativeEmaLen {
    pub const ALL: [InformativeEmaLen; 6] = [
        InformativeEmaLen::E15,
        InformativeEmaLen::E20,
        InformativeEmaLen::E26,
        InformativeEmaLen::E50,
        InformativeEmaLen::E100,
        InformativeEmaLen::E200,
    ];

    pub fn period(self) -> usize {
        match self {
            InformativeEmaLen::E15 => 15,
            InformativeEmaLen::E20 => 20,
            InformativeEmaLen::E26 => 26,
            InformativeEmaLen::E50 => 50,
            InformativeEmaLen::E100 => 100,
            InformativeEmaLen::E200 => 200,
        }
    }
}

/// Strictness of a dip or pump guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Strict,
    Normal,
    Loose,
}

pub type DipTier = Tier;
pub type PumpTier = Tier;

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Strict, Tier::Normal, Tier::Loose];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Strict => "strict",
            Tier::Normal => "normal",
            Tier::Loose => "loose",
        }
    }
}

/// Look-back window, in informative bars, of the pump detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PumpWindow {
    W24,
    W36,
    W48,
}

impl PumpWindow {
    pub const ALL: [PumpWindow; 3] = [PumpWindow::W24, PumpWindow::W36, PumpWindow::W48];

    pub fn bars(self) -> usize {
        match self {
            PumpWindow::W24 => 24,
            PumpWindow::W36 => 36,
            PumpWindow::W48 => 48,
        }
    }
}

fn parse_len<T: Copy>(
    s: &str,
    all: &[T],
    period: fn(T) -> usize,
    what: &str,
) -> Result<T, StrategyError> {
    let n: usize = s.trim().parse().map_err(|_| unknown(what, s))?;
    all.iter()
        .copied()
        .find(|&v| period(v) == n)
        .ok_or_else(|| unknown(what, s))
}

fn unknown(what: &str, value: &str) -> StrategyError {
    StrategyError::invalid("", what, format!("unknown value '{}'", value.trim()))
}

impl FromStr for EmaLen {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_len(s, &EmaLen::ALL, EmaLen::period, "ema length")
    }
}

impl FromStr for InformativeEmaLen {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_len(s, &InformativeEmaLen::ALL, InformativeEmaLen::period, "informative ema length")
    }
}

impl FromStr for PumpWindow {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_len(s, &PumpWindow::ALL, PumpWindow::bars, "pump window")
    }
}

impl FromStr for Tier {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| unknown("tier", s))
    }
}

impl fmt::Display for EmaLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.period())
    }
}

impl fmt::Display for InformativeEmaLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.period())
    }
}

impl fmt::Display for PumpWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bars())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns on the informative timeframe, aligned onto base rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InformativeSeries {
    Ema(InformativeEmaLen),
    Sma200,
    Rsi,
    BbLower,
    BbMiddle,
    BbUpper,
}

/// Numeric columns of an indicator frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Open,
    High,
    Low,
    Close,
    Volume,
    Ema(EmaLen),
    Sma5,
    Sma30,
    Sma200,
    Rsi,
    Mfi,
    Ewo,
    Chop,
    BbLower,
    BbMiddle,
    BbUpper,
    Bb40Lower,
    Bb40Mid,
    BbDelta,
    CloseDelta,
    Tail,
    OpenMin36,
    VolumeMean4,
    VolumeMean30,
    Norm(usize),
    PctSum,
    Informative(InformativeSeries),
}

/// Sell-pump strength, 1 being the widest span threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PumpLevel {
    L1,
    L2,
    L3,
}

impl PumpLevel {
    pub const ALL: [PumpLevel; 3] = [PumpLevel::L1, PumpLevel::L2, PumpLevel::L3];

    pub fn number(self) -> u8 {
        match self {
            PumpLevel::L1 => 1,
            PumpLevel::L2 => 2,
            PumpLevel::L3 => 3,
        }
    }
}

/// Flag columns on the informative timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InformativeFlag {
    Sma200Dec,
    SafePump(PumpWindow, PumpTier),
    SellPump(PumpWindow, PumpLevel),
}

/// Boolean columns of an indicator frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Sma200Dec,
    SafeDips(DipTier),
    Informative(InformativeFlag),
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Open => f.write_str("open"),
            Series::High => f.write_str("high"),
            Series::Low => f.write_str("low"),
            Series::Close => f.write_str("close"),
            Series::Volume => f.write_str("volume"),
            Series::Ema(len) => write!(f, "ema_{len}"),
            Series::Sma5 => f.write_str("sma_5"),
            Series::Sma30 => f.write_str("sma_30"),
            Series::Sma200 => f.write_str("sma_200"),
            Series::Rsi => f.write_str("rsi"),
            Series::Mfi => f.write_str("mfi"),
            Series::Ewo => f.write_str("ewo"),
            Series::Chop => f.write_str("chop"),
            Series::BbLower => f.write_str("bb_lowerband"),
            Series::BbMiddle => f.write_str("bb_middleband"),
            Series::BbUpper => f.write_str("bb_upperband"),
            Series::Bb40Lower => f.write_str("bb40_lower"),
            Series::Bb40Mid => f.write_str("bb40_mid"),
            Series::BbDelta => f.write_str("bbdelta"),
            Series::CloseDelta => f.write_str("closedelta"),
            Series::Tail => f.write_str("tail"),
            Series::OpenMin36 => f.write_str("open_min_36"),
            Series::VolumeMean4 => f.write_str("volume_mean_4"),
            Series::VolumeMean30 => f.write_str("volume_mean_30"),
            Series::Norm(l) => write!(f, "norm_{l}"),
            Series::PctSum => f.write_str("pct_sum"),
            Series::Informative(s) => match s {
                InformativeSeries::Ema(len) => write!(f, "ema_{len}_1h"),
                InformativeSeries::Sma200 => f.write_str("sma_200_1h"),
                InformativeSeries::Rsi => f.write_str("rsi_1h"),
                InformativeSeries::BbLower => f.write_str("bb_lowerband_1h"),
                InformativeSeries::BbMiddle => f.write_str("bb_middleband_1h"),
                InformativeSeries::BbUpper => f.write_str("bb_upperband_1h"),
            },
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Sma200Dec => f.write_str("sma_200_dec"),
            Flag::SafeDips(tier) => write!(f, "safe_dips_{tier}"),
            Flag::Informative(InformativeFlag::Sma200Dec) => f.write_str("sma_200_dec_1h"),
            Flag::Informative(InformativeFlag::SafePump(w, t)) => write!(f, "safe_pump_{w}_{t}_1h"),
            Flag::Informative(InformativeFlag::SellPump(w, l)) => {
                write!(f, "sell_pump_{w}_{}_1h", l.number())
            }
        }
    }
}
