//! Buy rule sets: protection gates plus a trigger conjunction each.

use crate::domain::nostalgia::protection::Protections;
use crate::domain::params::Decimal;
use crate::domain::rule::{col, Operand, Rule};
use crate::domain::series::{
    EmaLen, Flag, InformativeEmaLen, InformativeFlag, InformativeSeries, PumpWindow, Series, Tier,
};

const fn d(value: f64, low: f64, high: f64) -> Decimal {
    Decimal::new(value, low, high)
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuyTrigger {
    /// Price lifted off the 36-bar open low while oscillators stay low.
    RsiMfiIncrease {
        min_inc: Decimal,
        rsi_1h_min: Decimal,
        rsi_1h_max: Decimal,
        rsi: Decimal,
        mfi: Decimal,
    },
    RsiBelowInformative {
        rsi_1h_diff: Decimal,
        mfi: Decimal,
        bb_offset: Decimal,
    },
    /// Close pierces the BB40 lower band on a long lower tail.
    Bb40Reversal {
        ema_rel: Decimal,
        bbdelta_close: Decimal,
        closedelta_close: Decimal,
        tail_bbdelta: Decimal,
    },
    BbLowVolume {
        close_bblowerband: Decimal,
        volume: Decimal,
    },
    EmaSpreadAboveInformative {
        ema_rel: Decimal,
        ema_open_mult: Decimal,
        bb_offset: Decimal,
    },
    EmaSpreadBb {
        ema_open_mult: Decimal,
        bb_offset: Decimal,
    },
    EmaSpreadRsi {
        ema_open_mult: Decimal,
        rsi: Decimal,
    },
    RsiVolumeTail {
        rsi: Decimal,
        volume: Decimal,
        tail_diff: Decimal,
    },
    Ema20Bb {
        ma_offset: Decimal,
        bb_offset: Decimal,
        rsi_1h_min: Decimal,
        rsi_1h_max: Decimal,
        mfi: Decimal,
    },
    Sma30Bb {
        ma_offset: Decimal,
        bb_offset: Decimal,
        rsi_1h: Decimal,
    },
    Sma30Increase {
        ma_offset: Decimal,
        min_inc: Decimal,
        rsi_1h_min: Decimal,
        rsi_1h_max: Decimal,
        rsi: Decimal,
        mfi: Decimal,
    },
    Sma30EwoHigh {
        ma_offset: Decimal,
        ewo: Decimal,
        rsi: Decimal,
    },
    Sma30EwoLow {
        ma_offset: Decimal,
        ewo: Decimal,
    },
    EmaSpreadBbEma20 {
        ema_open_mult: Decimal,
        bb_offset: Decimal,
        ma_offset: Decimal,
    },
    EmaSpreadRsiEma20 {
        ema_rel: Decimal,
        ema_open_mult: Decimal,
        rsi: Decimal,
        ma_offset: Decimal,
    },
    Ema20EwoHigh {
        ma_offset: Decimal,
        ewo: Decimal,
        rsi: Decimal,
    },
    Ema20EwoLow {
        ma_offset: Decimal,
        ewo: Decimal,
    },
    RisingSmaBb {
        rsi: Decimal,
        bb_offset: Decimal,
    },
    /// Dip through the informative EMA100 that closes back above it.
    Ema100Bounce {
        rsi_1h_min: Decimal,
        chop_min: Decimal,
    },
    DeepOversold {
        rsi: Decimal,
        rsi_1h: Decimal,
    },
    VolumeSma30Bb {
        volume: Decimal,
        bb_offset: Decimal,
        ma_offset: Decimal,
        ewo: Decimal,
        rsi: Decimal,
    },
    BbEwoHigh {
        bb_offset: Decimal,
        ewo: Decimal,
        rsi: Decimal,
        rsi_1h: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuySet {
    pub id: u8,
    pub enabled: bool,
    pub protections: Protections,
    pub trigger: BuyTrigger,
}

impl BuySet {
    pub fn section(&self) -> String {
        format!("buy_{:02}", self.id)
    }

    /// Protections AND trigger.
    pub fn rule(&self) -> Rule {
        let mut rules = self.protections.rules();
        rules.extend(self.trigger.rules());
        Rule::And(rules)
    }
}

fn ema(len: EmaLen) -> Operand {
    col(Series::Ema(len))
}

fn ema_1h(len: InformativeEmaLen) -> Operand {
    col(Series::Informative(InformativeSeries::Ema(len)))
}

fn rsi_1h() -> Operand {
    col(Series::Informative(InformativeSeries::Rsi))
}

fn volume_positive() -> Rule {
    col(Series::Volume).gt(0.0)
}

fn safe_pump_1h(window: PumpWindow, tier: Tier) -> Rule {
    Rule::Flag(Flag::Informative(InformativeFlag::SafePump(window, tier)))
}

/// `(close - open_min_36) / open_min_36 > min_inc`
fn lifted_from_open_low(min_inc: &Decimal) -> Rule {
    col(Series::Close)
        .minus(Series::OpenMin36)
        .over(Series::OpenMin36)
        .gt(min_inc.get())
}

/// EMA26 above EMA12 by a margin that was already open on the previous bar.
fn ema_spread(ema_open_mult: &Decimal) -> Vec<Rule> {
    let spread = || ema(EmaLen::E26).minus(ema(EmaLen::E12));
    vec![
        ema(EmaLen::E26).gt(ema(EmaLen::E12)),
        spread().gt(col(Series::Open).times(ema_open_mult.get())),
        spread().shifted(1).gt(col(Series::Open).times(0.01)),
    ]
}

fn close_below(series: Series, factor: &Decimal) -> Rule {
    col(Series::Close).lt(col(series).times(factor.get()))
}

fn close_above_ema_200_1h(ema_rel: &Decimal) -> Rule {
    col(Series::Close).gt(ema_1h(InformativeEmaLen::E200).times(ema_rel.get()))
}

impl BuyTrigger {
    /// The trigger conjunction, including the set-specific fixed gates.
    pub fn rules(&self) -> Vec<Rule> {
        let rsi = || col(Series::Rsi);
        let mfi = || col(Series::Mfi);
        let ewo = || col(Series::Ewo);

        let mut rules = match self {
            BuyTrigger::RsiMfiIncrease {
                min_inc,
                rsi_1h_min,
                rsi_1h_max,
                rsi: rsi_max,
                mfi: mfi_max,
            } => vec![
                lifted_from_open_low(min_inc),
                rsi_1h().gt(rsi_1h_min.get()),
                rsi_1h().lt(rsi_1h_max.get()),
                rsi().lt(rsi_max.get()),
                mfi().lt(mfi_max.get()),
            ],
            BuyTrigger::RsiBelowInformative {
                rsi_1h_diff,
                mfi: mfi_max,
                bb_offset,
            } => vec![
                rsi().lt(rsi_1h().minus(rsi_1h_diff.get())),
                mfi().lt(mfi_max.get()),
                close_below(Series::BbLower, bb_offset),
            ],
            BuyTrigger::Bb40Reversal {
                ema_rel,
                bbdelta_close,
                closedelta_close,
                tail_bbdelta,
            } => vec![
                close_above_ema_200_1h(ema_rel),
                col(Series::Bb40Lower).shifted(1).gt(0.0),
                col(Series::BbDelta).gt(col(Series::Close).times(bbdelta_close.get())),
                col(Series::CloseDelta).gt(col(Series::Close).times(closedelta_close.get())),
                col(Series::Tail).lt(col(Series::BbDelta).times(tail_bbdelta.get())),
                col(Series::Close).lt(col(Series::Bb40Lower).shifted(1)),
                col(Series::Close).le(col(Series::Close).shifted(1)),
            ],
            BuyTrigger::BbLowVolume {
                close_bblowerband,
                volume,
            } => {
                return vec![
                    col(Series::Close).lt(ema(EmaLen::E50)),
                    close_below(Series::BbLower, close_bblowerband),
                    col(Series::Volume)
                        .lt(col(Series::VolumeMean30).shifted(1).times(volume.get())),
                ];
            }
            BuyTrigger::EmaSpreadAboveInformative {
                ema_rel,
                ema_open_mult,
                bb_offset,
            } => {
                let mut r = vec![close_above_ema_200_1h(ema_rel)];
                r.extend(ema_spread(ema_open_mult));
                r.push(close_below(Series::BbLower, bb_offset));
                r
            }
            BuyTrigger::EmaSpreadBb {
                ema_open_mult,
                bb_offset,
            } => {
                let mut r = ema_spread(ema_open_mult);
                r.push(close_below(Series::BbLower, bb_offset));
                r
            }
            BuyTrigger::EmaSpreadRsi {
                ema_open_mult,
                rsi: rsi_max,
            } => {
                let mut r = ema_spread(ema_open_mult);
                r.push(rsi().lt(rsi_max.get()));
                r
            }
            BuyTrigger::RsiVolumeTail {
                rsi: rsi_max,
                volume,
                tail_diff,
            } => vec![
                rsi().lt(rsi_max.get()),
                col(Series::Volume).gt(col(Series::Volume).shifted(1).times(volume.get())),
                col(Series::Close).gt(Series::Open),
                col(Series::Close)
                    .minus(Series::Low)
                    .gt(col(Series::Close).minus(Series::Open).times(tail_diff.get())),
            ],
            BuyTrigger::Ema20Bb {
                ma_offset,
                bb_offset,
                rsi_1h_min,
                rsi_1h_max,
                mfi: mfi_max,
            } => vec![
                ema(EmaLen::E50).gt(ema(EmaLen::E200)),
                close_below(Series::Ema(EmaLen::E20), ma_offset),
                close_below(Series::BbLower, bb_offset),
                rsi_1h().gt(rsi_1h_min.get()),
                rsi_1h().lt(rsi_1h_max.get()),
                mfi().lt(mfi_max.get()),
            ],
            BuyTrigger::Sma30Bb {
                ma_offset,
                bb_offset,
                rsi_1h: rsi_1h_max,
            } => vec![
                ema_1h(InformativeEmaLen::E50).gt(ema_1h(InformativeEmaLen::E100)),
                close_below(Series::Sma30, ma_offset),
                close_below(Series::BbLower, bb_offset),
                rsi_1h().lt(rsi_1h_max.get()),
            ],
            BuyTrigger::Sma30Increase {
                ma_offset,
                min_inc,
                rsi_1h_min,
                rsi_1h_max,
                rsi: rsi_max,
                mfi: mfi_max,
            } => vec![
                ema_1h(InformativeEmaLen::E50).gt(ema_1h(InformativeEmaLen::E100)),
                safe_pump_1h(PumpWindow::W36, Tier::Normal),
                safe_pump_1h(PumpWindow::W48, Tier::Loose),
                lifted_from_open_low(min_inc),
                close_below(Series::Sma30, ma_offset),
                rsi_1h().gt(rsi_1h_min.get()),
                rsi_1h().lt(rsi_1h_max.get()),
                rsi().lt(rsi_max.get()),
                mfi().lt(mfi_max.get()),
            ],
            BuyTrigger::Sma30EwoHigh {
                ma_offset,
                ewo: ewo_min,
                rsi: rsi_max,
            } => vec![
                close_below(Series::Sma30, ma_offset),
                ewo().gt(ewo_min.get()),
                rsi().lt(rsi_max.get()),
            ],
            BuyTrigger::Sma30EwoLow {
                ma_offset,
                ewo: ewo_max,
            } => vec![
                ema_1h(InformativeEmaLen::E50).gt(ema_1h(InformativeEmaLen::E100)),
                close_below(Series::Sma30, ma_offset),
                ewo().lt(ewo_max.get()),
            ],
            BuyTrigger::EmaSpreadBbEma20 {
                ema_open_mult,
                bb_offset,
                ma_offset,
            } => {
                let mut r = ema_spread(ema_open_mult);
                r.push(close_below(Series::BbLower, bb_offset));
                r.push(close_below(Series::Ema(EmaLen::E20), ma_offset));
                r
            }
            BuyTrigger::EmaSpreadRsiEma20 {
                ema_rel,
                ema_open_mult,
                rsi: rsi_max,
                ma_offset,
            } => {
                let mut r = vec![close_above_ema_200_1h(ema_rel)];
                r.extend(ema_spread(ema_open_mult));
                r.push(rsi().lt(rsi_max.get()));
                r.push(close_below(Series::Ema(EmaLen::E20), ma_offset));
                r
            }
            BuyTrigger::Ema20EwoHigh {
                ma_offset,
                ewo: ewo_min,
                rsi: rsi_max,
            } => vec![
                close_below(Series::Ema(EmaLen::E20), ma_offset),
                ewo().gt(ewo_min.get()),
                rsi().lt(rsi_max.get()),
            ],
            BuyTrigger::Ema20EwoLow {
                ma_offset,
                ewo: ewo_max,
            } => vec![
                close_below(Series::Ema(EmaLen::E20), ma_offset),
                ewo().lt(ewo_max.get()),
            ],
            BuyTrigger::RisingSmaBb {
                rsi: rsi_max,
                bb_offset,
            } => {
                let sma_1h = || col(Series::Informative(InformativeSeries::Sma200));
                vec![
                    col(Series::Sma200).gt(col(Series::Sma200).shifted(20)),
                    sma_1h().gt(sma_1h().shifted(36)),
                    rsi().lt(rsi_max.get()),
                    close_below(Series::BbLower, bb_offset),
                ]
            }
            BuyTrigger::Ema100Bounce {
                rsi_1h_min,
                chop_min,
            } => {
                let ema_100_1h = || ema_1h(InformativeEmaLen::E100);
                vec![
                    ema_1h(InformativeEmaLen::E50).gt(ema_1h(InformativeEmaLen::E200)),
                    col(Series::Close).shifted(1).gt(ema_100_1h()),
                    col(Series::Low).lt(ema_100_1h()),
                    col(Series::Close).gt(ema_100_1h()),
                    rsi_1h().gt(rsi_1h_min.get()),
                    col(Series::Chop).lt(chop_min.get()),
                ]
            }
            BuyTrigger::DeepOversold {
                rsi: rsi_max,
                rsi_1h: rsi_1h_max,
            } => vec![rsi().lt(rsi_max.get()), rsi_1h().lt(rsi_1h_max.get())],
            BuyTrigger::VolumeSma30Bb {
                volume,
                bb_offset,
                ma_offset,
                ewo: ewo_min,
                rsi: rsi_max,
            } => {
                let e100 = || ema_1h(InformativeEmaLen::E100);
                let e200 = || ema_1h(InformativeEmaLen::E200);
                vec![
                    e100().gt(e100().shifted(12)),
                    e200().gt(e200().shifted(36)),
                    col(Series::VolumeMean4)
                        .times(volume.get())
                        .gt(Series::Volume),
                    close_below(Series::Sma30, ma_offset),
                    close_below(Series::BbLower, bb_offset),
                    ewo().gt(ewo_min.get()),
                    rsi().lt(rsi_max.get()),
                ]
            }
            BuyTrigger::BbEwoHigh {
                bb_offset,
                ewo: ewo_min,
                rsi: rsi_max,
                rsi_1h: rsi_1h_max,
            } => vec![
                close_below(Series::BbLower, bb_offset),
                ewo().gt(ewo_min.get()),
                rsi().lt(rsi_max.get()),
                rsi_1h().lt(rsi_1h_max.get()),
            ],
        };
        rules.push(volume_positive());
        rules
    }

    /// Every threshold with its configuration key.
    pub fn decimals_mut(&mut self) -> Vec<(&'static str, &mut Decimal)> {
        match self {
            BuyTrigger::RsiMfiIncrease {
                min_inc,
                rsi_1h_min,
                rsi_1h_max,
                rsi,
                mfi,
            } => vec![
                ("min_inc", min_inc),
                ("rsi_1h_min", rsi_1h_min),
                ("rsi_1h_max", rsi_1h_max),
                ("rsi", rsi),
                ("mfi", mfi),
            ],
            BuyTrigger::RsiBelowInformative {
                rsi_1h_diff,
                mfi,
                bb_offset,
            } => vec![
                ("rsi_1h_diff", rsi_1h_diff),
                ("mfi", mfi),
                ("bb_offset", bb_offset),
            ],
            BuyTrigger::Bb40Reversal {
                ema_rel,
                bbdelta_close,
                closedelta_close,
                tail_bbdelta,
            } => vec![
                ("ema_rel", ema_rel),
                ("bbdelta_close", bbdelta_close),
                ("closedelta_close", closedelta_close),
                ("tail_bbdelta", tail_bbdelta),
            ],
            BuyTrigger::BbLowVolume {
                close_bblowerband,
                volume,
            } => vec![("close_bblowerband", close_bblowerband), ("volume", volume)],
            BuyTrigger::EmaSpreadAboveInformative {
                ema_rel,
                ema_open_mult,
                bb_offset,
            } => vec![
                ("ema_rel", ema_rel),
                ("ema_open_mult", ema_open_mult),
                ("bb_offset", bb_offset),
            ],
            BuyTrigger::EmaSpreadBb {
                ema_open_mult,
                bb_offset,
            } => vec![("ema_open_mult", ema_open_mult), ("bb_offset", bb_offset)],
            BuyTrigger::EmaSpreadRsi { ema_open_mult, rsi } => {
                vec![("ema_open_mult", ema_open_mult), ("rsi", rsi)]
            }
            BuyTrigger::RsiVolumeTail {
                rsi,
                volume,
                tail_diff,
            } => vec![("rsi", rsi), ("volume", volume), ("tail_diff", tail_diff)],
            BuyTrigger::Ema20Bb {
                ma_offset,
                bb_offset,
                rsi_1h_min,
                rsi_1h_max,
                mfi,
            } => vec![
                ("ma_offset", ma_offset),
                ("bb_offset", bb_offset),
                ("rsi_1h_min", rsi_1h_min),
                ("rsi_1h_max", rsi_1h_max),
                ("mfi", mfi),
            ],
            BuyTrigger::Sma30Bb {
                ma_offset,
                bb_offset,
                rsi_1h,
            } => vec![
                ("ma_offset", ma_offset),
                ("bb_offset", bb_offset),
                ("rsi_1h", rsi_1h),
            ],
            BuyTrigger::Sma30Increase {
                ma_offset,
                min_inc,
                rsi_1h_min,
                rsi_1h_max,
                rsi,
                mfi,
            } => vec![
                ("ma_offset", ma_offset),
                ("min_inc", min_inc),
                ("rsi_1h_min", rsi_1h_min),
                ("rsi_1h_max", rsi_1h_max),
                ("rsi", rsi),
                ("mfi", mfi),
            ],
            BuyTrigger::Sma30EwoHigh {
                ma_offset,
                ewo,
                rsi,
            }
            | BuyTrigger::Ema20EwoHigh {
                ma_offset,
                ewo,
                rsi,
            } => vec![("ma_offset", ma_offset), ("ewo", ewo), ("rsi", rsi)],
            BuyTrigger::Sma30EwoLow { ma_offset, ewo }
            | BuyTrigger::Ema20EwoLow { ma_offset, ewo } => {
                vec![("ma_offset", ma_offset), ("ewo", ewo)]
            }
            BuyTrigger::EmaSpreadBbEma20 {
                ema_open_mult,
                bb_offset,
                ma_offset,
            } => vec![
                ("ema_open_mult", ema_open_mult),
                ("bb_offset", bb_offset),
                ("ma_offset", ma_offset),
            ],
            BuyTrigger::EmaSpreadRsiEma20 {
                ema_rel,
                ema_open_mult,
                rsi,
                ma_offset,
            } => vec![
                ("ema_rel", ema_rel),
                ("ema_open_mult", ema_open_mult),
                ("rsi", rsi),
                ("ma_offset", ma_offset),
            ],
            BuyTrigger::RisingSmaBb { rsi, bb_offset } => {
                vec![("rsi", rsi), ("bb_offset", bb_offset)]
            }
            BuyTrigger::Ema100Bounce {
                rsi_1h_min,
                chop_min,
            } => vec![("rsi_1h_min", rsi_1h_min), ("chop_min", chop_min)],
            BuyTrigger::DeepOversold { rsi, rsi_1h } => vec![("rsi", rsi), ("rsi_1h", rsi_1h)],
            BuyTrigger::VolumeSma30Bb {
                volume,
                bb_offset,
                ma_offset,
                ewo,
                rsi,
            } => vec![
                ("volume", volume),
                ("bb_offset", bb_offset),
                ("ma_offset", ma_offset),
                ("ewo", ewo),
                ("rsi", rsi),
            ],
            BuyTrigger::BbEwoHigh {
                bb_offset,
                ewo,
                rsi,
                rsi_1h,
            } => vec![
                ("bb_offset", bb_offset),
                ("ewo", ewo),
                ("rsi", rsi),
                ("rsi_1h", rsi_1h),
            ],
        }
    }
}

/// The 23 shipped buy rule sets, all enabled.
pub fn default_buy_sets() -> Vec<BuySet> {
    use EmaLen as E;
    use InformativeEmaLen as I;
    use PumpWindow as W;
    use Tier::{Loose, Normal, Strict};

    let p = Protections::default;
    let set = |id: u8, protections: Protections, trigger: BuyTrigger| BuySet {
        id,
        enabled: true,
        protections,
        trigger,
    };

    vec![
        set(
            1,
            p().close_above_ema_fast(E::E200)
                .ema_slow(I::E100)
                .safe_dips(Normal)
                .safe_pump(W::W36, Loose)
                .sma200_rising(36),
            BuyTrigger::RsiMfiIncrease {
                min_inc: d(0.022, 0.01, 0.05),
                rsi_1h_min: d(30.0, 25.0, 40.0),
                rsi_1h_max: d(84.0, 70.0, 90.0),
                rsi: d(36.0, 20.0, 40.0),
                mfi: d(36.0, 20.0, 40.0),
            },
        ),
        set(
            2,
            p().safe_dips(Normal).sma200_1h_rising(50),
            BuyTrigger::RsiBelowInformative {
                rsi_1h_diff: d(39.0, 30.0, 50.0),
                mfi: d(49.0, 30.0, 56.0),
                bb_offset: d(0.983, 0.97, 0.999),
            },
        ),
        set(
            3,
            p().ema_fast(E::E100)
                .ema_slow(I::E100)
                .safe_pump(W::W36, Loose),
            BuyTrigger::Bb40Reversal {
                ema_rel: d(0.986, 0.97, 0.999),
                bbdelta_close: d(0.057, 0.005, 0.06),
                closedelta_close: d(0.023, 0.01, 0.03),
                tail_bbdelta: d(0.418, 0.15, 0.45),
            },
        ),
        set(
            4,
            p().safe_dips(Normal)
                .safe_pump(W::W48, Normal)
                .sma200_1h_rising(20)
                .sma200_rising(50),
            BuyTrigger::BbLowVolume {
                close_bblowerband: d(0.979, 0.96, 0.99),
                volume: d(10.0, 1.0, 20.0),
            },
        ),
        set(
            5,
            p().ema_fast(E::E100)
                .safe_dips(Loose)
                .safe_pump(W::W36, Strict),
            BuyTrigger::EmaSpreadAboveInformative {
                ema_rel: d(0.982, 0.97, 0.999),
                ema_open_mult: d(0.018, 0.016, 0.03),
                bb_offset: d(0.996, 0.98, 1.0),
            },
        ),
        set(
            6,
            p().ema_slow(I::E100)
                .safe_dips(Normal)
                .safe_pump(W::W36, Strict),
            BuyTrigger::EmaSpreadBb {
                ema_open_mult: d(0.024, 0.02, 0.03),
                bb_offset: d(0.984, 0.98, 0.999),
            },
        ),
        set(
            7,
            p().ema_fast(E::E100).ema_slow(I::E50).safe_dips(Normal),
            BuyTrigger::EmaSpreadRsi {
                ema_open_mult: d(0.03, 0.02, 0.04),
                rsi: d(36.0, 24.0, 50.0),
            },
        ),
        set(
            8,
            p().ema_slow(I::E50)
                .safe_dips(Loose)
                .safe_pump(W::W24, Loose),
            BuyTrigger::RsiVolumeTail {
                rsi: d(20.0, 16.0, 30.0),
                volume: d(2.0, 1.0, 6.0),
                tail_diff: d(3.5, 3.0, 10.0),
            },
        ),
        set(
            9,
            p().ema_fast(E::E100),
            BuyTrigger::Ema20Bb {
                ma_offset: d(0.922, 0.94, 0.99),
                bb_offset: d(0.965, 0.97, 0.99),
                rsi_1h_min: d(30.0, 26.0, 40.0),
                rsi_1h_max: d(88.0, 70.0, 90.0),
                mfi: d(50.0, 26.0, 40.0),
            },
        ),
        set(
            10,
            p().safe_dips(Loose).sma200_1h_rising(24),
            BuyTrigger::Sma30Bb {
                ma_offset: d(0.948, 0.93, 0.97),
                bb_offset: d(0.994, 0.97, 0.99),
                rsi_1h: d(37.0, 20.0, 40.0),
            },
        ),
        set(
            11,
            p().safe_dips(Loose).safe_pump(W::W24, Loose),
            BuyTrigger::Sma30Increase {
                ma_offset: d(0.939, 0.93, 0.99),
                min_inc: d(0.01, 0.005, 0.05),
                rsi_1h_min: d(56.0, 40.0, 60.0),
                rsi_1h_max: d(84.0, 70.0, 90.0),
                rsi: d(48.0, 30.0, 48.0),
                mfi: d(36.0, 36.0, 56.0),
            },
        ),
        set(
            12,
            p().safe_dips(Strict).sma200_1h_rising(24),
            BuyTrigger::Sma30EwoHigh {
                ma_offset: d(0.922, 0.93, 0.97),
                ewo: d(1.8, 2.0, 6.0),
                rsi: d(30.0, 26.0, 40.0),
            },
        ),
        set(
            13,
            p().safe_dips(Strict).sma200_1h_rising(24),
            BuyTrigger::Sma30EwoLow {
                ma_offset: d(0.99, 0.93, 0.98),
                ewo: d(-11.8, -14.0, -7.0),
            },
        ),
        set(
            14,
            p().safe_dips(Strict)
                .safe_pump(W::W24, Normal)
                .sma200_rising(30)
                .sma200_1h_rising(50),
            BuyTrigger::EmaSpreadBbEma20 {
                ema_open_mult: d(0.014, 0.01, 0.03),
                bb_offset: d(0.988, 0.98, 1.0),
                ma_offset: d(0.98, 0.93, 0.99),
            },
        ),
        set(
            15,
            p().ema_slow(I::E50)
                .safe_dips(Normal)
                .safe_pump(W::W36, Strict),
            BuyTrigger::EmaSpreadRsiEma20 {
                ema_rel: d(0.988, 0.97, 0.999),
                ema_open_mult: d(0.018, 0.01, 0.03),
                rsi: d(28.0, 20.0, 36.0),
                ma_offset: d(0.954, 0.93, 0.99),
            },
        ),
        set(
            16,
            p().ema_slow(I::E50)
                .safe_dips(Strict)
                .safe_pump(W::W24, Strict),
            BuyTrigger::Ema20EwoHigh {
                ma_offset: d(0.952, 0.93, 0.97),
                ewo: d(2.8, 2.0, 6.0),
                rsi: d(31.0, 26.0, 50.0),
            },
        ),
        set(
            17,
            p().safe_dips(Strict).safe_pump(W::W24, Loose),
            BuyTrigger::Ema20EwoLow {
                ma_offset: d(0.952, 0.93, 0.98),
                ewo: d(-12.0, -18.0, -10.0),
            },
        ),
        set(
            18,
            p().close_above_ema_slow(I::E200)
                .ema_fast(E::E100)
                .ema_slow(I::E50)
                .safe_dips(Normal)
                .safe_pump(W::W24, Strict)
                .sma200_rising(44)
                .sma200_1h_rising(72),
            BuyTrigger::RisingSmaBb {
                rsi: d(26.0, 16.0, 32.0),
                bb_offset: d(0.982, 0.98, 1.0),
            },
        ),
        set(
            19,
            p().ema_slow(I::E100)
                .safe_dips(Normal)
                .safe_pump(W::W24, Normal)
                .sma200_rising(36),
            BuyTrigger::Ema100Bounce {
                rsi_1h_min: d(50.0, 40.0, 70.0),
                chop_min: d(24.1, 20.0, 60.0),
            },
        ),
        set(
            20,
            p().ema_slow(I::E50),
            BuyTrigger::DeepOversold {
                rsi: d(27.0, 20.0, 36.0),
                rsi_1h: d(20.0, 14.0, 30.0),
            },
        ),
        set(
            21,
            p().ema_slow(I::E50).safe_dips(Normal),
            BuyTrigger::DeepOversold {
                rsi: d(23.0, 10.0, 28.0),
                rsi_1h: d(24.0, 18.0, 40.0),
            },
        ),
        set(
            22,
            p(),
            BuyTrigger::VolumeSma30Bb {
                volume: d(3.0, 0.5, 6.0),
                bb_offset: d(0.98, 0.98, 1.0),
                ma_offset: d(0.94, 0.93, 0.98),
                ewo: d(4.2, 2.0, 10.0),
                rsi: d(37.0, 26.0, 56.0),
            },
        ),
        set(
            23,
            p().close_above_ema_slow(I::E200)
                .close_above_ema_fast(E::E200)
                .safe_dips(Loose),
            BuyTrigger::BbEwoHigh {
                bb_offset: d(0.987, 0.97, 1.0),
                ewo: d(7.0, 2.0, 10.0),
                rsi: d(30.0, 20.0, 40.0),
                rsi_1h: d(70.0, 60.0, 80.0),
            },
        ),
    ]
}
