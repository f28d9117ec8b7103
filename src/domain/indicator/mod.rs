//! Technical indicator implementations.
//!
//! Every indicator returns a `Vec<f64>` index-aligned with its input. Bars
//! inside the warm-up window hold `NaN`; comparisons against `NaN` are false,
//! so a warming-up column can never satisfy a rule.

pub mod bollinger;
pub mod chop;
pub mod ema;
pub mod ewo;
pub mod mfi;
pub mod normalize;
pub mod range;
pub mod rolling;
pub mod rsi;

/// Value `bars` positions back; `NaN` where that reaches before the start.
pub fn shift(values: &[f64], bars: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| if i >= bars { values[i - bars] } else { f64::NAN })
        .collect()
}

/// `values[i] < values[i - bars]`, false during warm-up.
pub fn declining(values: &[f64], bars: usize) -> Vec<bool> {
    let prev = shift(values, bars);
    values.iter().zip(&prev).map(|(v, p)| v < p).collect()
}

pub(crate) fn closes(candles: &[crate::domain::candle::Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
