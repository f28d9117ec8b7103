//! Indicator columns of the Nostalgia strategy.

use crate::domain::candle::{Candle, Timeframe};
use crate::domain::error::StrategyError;
use crate::domain::frame::Frame;
use crate::domain::indicator::bollinger::{calculate_bollinger, calculate_bollinger_typical};
use crate::domain::indicator::chop::calculate_chop;
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::ewo::calculate_ewo;
use crate::domain::indicator::mfi::calculate_mfi;
use crate::domain::indicator::range::{safe_dips, safe_pump, sell_pump};
use crate::domain::indicator::rolling::{calculate_sma, rolling_mean, rolling_min};
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::{closes, declining, shift};
use crate::domain::informative::{align, merge_flags, merge_series};
use crate::domain::nostalgia::params::NostalgiaParams;
use crate::domain::series::{
    EmaLen, Flag, InformativeEmaLen, InformativeFlag, InformativeSeries, Series, Tier,
};

/// Informative bars needed before every informative column is defined:
/// SMA200 plus the 20-bar slope shift.
pub const INFORMATIVE_STARTUP: usize = 219;

const SMA200_SLOPE_BARS: usize = 20;

pub fn populate_base(frame: &mut Frame, candles: &[Candle], params: &NostalgiaParams) {
    let close = closes(candles);
    let open: Vec<f64> = candles.iter().map(|c| c.open).collect();
    let volume: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let bb40 = calculate_bollinger(&close, 40, 2.0);
    let bbdelta = bb40
        .middle
        .iter()
        .zip(&bb40.lower)
        .map(|(m, l)| (m - l).abs())
        .collect();
    let prev_close = shift(&close, 1);
    let closedelta = close
        .iter()
        .zip(&prev_close)
        .map(|(c, p)| (c - p).abs())
        .collect();
    let tail = candles.iter().map(|c| (c.close - c.low).abs()).collect();
    frame.insert(Series::Bb40Lower, bb40.lower);
    frame.insert(Series::Bb40Mid, bb40.middle);
    frame.insert(Series::BbDelta, bbdelta);
    frame.insert(Series::CloseDelta, closedelta);
    frame.insert(Series::Tail, tail);

    let bb20 = calculate_bollinger_typical(candles, 20, 2.0);
    frame.insert(Series::BbLower, bb20.lower);
    frame.insert(Series::BbMiddle, bb20.middle);
    frame.insert(Series::BbUpper, bb20.upper);

    for len in EmaLen::ALL {
        frame.insert(Series::Ema(len), calculate_ema(&close, len.period()));
    }

    let sma_200 = calculate_sma(&close, 200);
    frame.insert_flag(Flag::Sma200Dec, declining(&sma_200, SMA200_SLOPE_BARS));
    frame.insert(Series::Sma5, calculate_sma(&close, 5));
    frame.insert(Series::Sma30, calculate_sma(&close, 30));
    frame.insert(Series::Sma200, sma_200);

    frame.insert(Series::Mfi, calculate_mfi(candles, 14));
    frame.insert(Series::Ewo, calculate_ewo(&close, 50, 200));
    frame.insert(Series::Rsi, calculate_rsi(&close, 14));
    frame.insert(Series::Chop, calculate_chop(candles, 14));

    frame.insert(Series::OpenMin36, rolling_min(&open, 36));
    frame.insert(Series::VolumeMean4, shift(&rolling_mean(&volume, 4), 1));
    frame.insert(Series::VolumeMean30, rolling_mean(&volume, 30));

    for tier in Tier::ALL {
        frame.insert_flag(
            Flag::SafeDips(tier),
            safe_dips(candles, params.dips.thresholds(tier)),
        );
    }
}

/// Computes informative columns on their own timeframe and merges them onto
/// base rows. Returns the row alignment used for the merge.
pub fn populate_informative(
    frame: &mut Frame,
    candles: &[Candle],
    base_tf: Timeframe,
    informative: &[Candle],
    inf_tf: Timeframe,
    params: &NostalgiaParams,
) -> Result<Vec<Option<usize>>, StrategyError> {
    let alignment = align(candles, base_tf, informative, inf_tf)?;
    let close = closes(informative);
    let mut put = |series: InformativeSeries, values: Vec<f64>| {
        frame.insert(Series::Informative(series), merge_series(&values, &alignment));
    };

    for len in InformativeEmaLen::ALL {
        put(InformativeSeries::Ema(len), calculate_ema(&close, len.period()));
    }
    let sma_200 = calculate_sma(&close, 200);
    let sma_200_dec = declining(&sma_200, SMA200_SLOPE_BARS);
    put(InformativeSeries::Sma200, sma_200);
    put(InformativeSeries::Rsi, calculate_rsi(&close, 14));
    let bb = calculate_bollinger_typical(informative, 20, 2.0);
    put(InformativeSeries::BbLower, bb.lower);
    put(InformativeSeries::BbMiddle, bb.middle);
    put(InformativeSeries::BbUpper, bb.upper);

    frame.insert_flag(
        Flag::Informative(InformativeFlag::Sma200Dec),
        merge_flags(&sma_200_dec, &alignment),
    );
    for g in &params.pumps.guards {
        let flag = safe_pump(
            informative,
            g.window.bars(),
            g.threshold.get(),
            g.pull.get(),
        );
        frame.insert_flag(
            Flag::Informative(InformativeFlag::SafePump(g.window, g.tier)),
            merge_flags(&flag, &alignment),
        );
    }
    for l in &params.sell_pumps.levels {
        let flag = sell_pump(informative, l.window.bars(), l.threshold.get());
        frame.insert_flag(
            Flag::Informative(InformativeFlag::SellPump(l.window, l.level)),
            merge_flags(&flag, &alignment),
        );
    }

    let visible = alignment.iter().filter(|a| a.is_some()).count();
    tracing::info!(
        base_rows = candles.len(),
        informative_rows = informative.len(),
        visible,
        timeframe = %inf_tf,
        "informative series merged"
    );
    Ok(alignment)
}

/// Ready once the base warm-up has elapsed and the merged informative bar is
/// itself past its warm-up.
pub fn readiness(
    len: usize,
    startup: usize,
    alignment: &[Option<usize>],
) -> Vec<bool> {
    (0..len)
        .map(|i| {
            i >= startup
                && alignment
                    .get(i)
                    .copied()
                    .flatten()
                    .is_some_and(|j| j >= INFORMATIVE_STARTUP)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_needs_both_warmups() {
        let alignment = vec![None, Some(218), Some(219), Some(220)];
        assert_eq!(
            readiness(4, 2, &alignment),
            vec![false, false, true, true]
        );
        assert_eq!(
            readiness(4, 0, &alignment),
            vec![false, false, true, true]
        );
        assert_eq!(readiness(4, 3, &alignment), vec![false, false, false, true]);
    }
}
