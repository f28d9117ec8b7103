//! Alignment of a coarser informative series onto base rows.
//!
//! An informative bar opening at `T` closes at `T + inf`. It becomes visible
//! to the base bar opening at `t` once it has closed by the time that base
//! bar closes: `T + inf <= t + base`. The latest visible bar is then carried
//! forward until the next one closes.

use crate::domain::candle::{Candle, Timeframe};
use crate::domain::error::StrategyError;

/// For each base row, the index of the latest visible informative bar.
pub fn align(
    base: &[Candle],
    base_tf: Timeframe,
    informative: &[Candle],
    inf_tf: Timeframe,
) -> Result<Vec<Option<usize>>, StrategyError> {
    if base_tf.bars_per(inf_tf).is_none() {
        return Err(StrategyError::InvalidCandles {
            reason: format!("informative timeframe {inf_tf} is not a multiple of {base_tf}"),
        });
    }

    let base_dur = base_tf.duration();
    let inf_dur = inf_tf.duration();
    let mut out = Vec::with_capacity(base.len());
    let mut next = 0;
    let mut visible = None;

    for bar in base {
        let base_close = bar.timestamp + base_dur;
        while next < informative.len() && informative[next].timestamp + inf_dur <= base_close {
            visible = Some(next);
            next += 1;
        }
        out.push(visible);
    }

    Ok(out)
}

/// Projects an informative column onto base rows; NaN before the first
/// visible bar.
pub fn merge_series(values: &[f64], alignment: &[Option<usize>]) -> Vec<f64> {
    alignment
        .iter()
        .map(|idx| idx.and_then(|i| values.get(i).copied()).unwrap_or(f64::NAN))
        .collect()
}

/// Projects an informative flag onto base rows; false before the first
/// visible bar.
pub fn merge_flags(values: &[bool], alignment: &[Option<usize>]) -> Vec<bool> {
    alignment
        .iter()
        .map(|idx| idx.and_then(|i| values.get(i).copied()).unwrap_or(false))
        .collect()
}
