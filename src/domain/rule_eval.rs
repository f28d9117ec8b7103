//! Rule evaluation engine.
//!
//! Evaluates rules against a pre-computed indicator frame.
//!
//! # Evaluation Semantics
//!
//! - Comparison rules: Evaluate at the given row; NaN on either side is false
//! - `CrossBelow`: Requires `index >= 1`, returns `false` at index 0
//! - `Shifted` operands reaching before row 0 resolve to NaN
//! - `And`: Short-circuits on first `false`; an empty `And` is true
//! - `Or`: Short-circuits on first `true`; an empty `Or` is false
//! - `Consecutive(rule, N)`: Child must be true for N consecutive rows ending at current

use crate::domain::frame::Frame;
use crate::domain::rule::{Operand, Rule};

pub fn evaluate(rule: &Rule, frame: &Frame, index: usize) -> bool {
    match rule {
        Rule::Above { left, right } => {
            resolve_operand(left, frame, index) > resolve_operand(right, frame, index)
        }
        Rule::Below { left, right } => {
            resolve_operand(left, frame, index) < resolve_operand(right, frame, index)
        }
        Rule::AtMost { left, right } => {
            resolve_operand(left, frame, index) <= resolve_operand(right, frame, index)
        }
        Rule::CrossBelow { left, right } => {
            if index == 0 {
                return false;
            }
            let left_curr = resolve_operand(left, frame, index);
            let right_curr = resolve_operand(right, frame, index);
            let left_prev = resolve_operand(left, frame, index - 1);
            let right_prev = resolve_operand(right, frame, index - 1);

            left_curr < right_curr && left_prev >= right_prev
        }
        Rule::Flag(flag) => frame.flag_at(*flag, index),
        Rule::And(rules) => rules.iter().all(|r| evaluate(r, frame, index)),
        Rule::Or(rules) => rules.iter().any(|r| evaluate(r, frame, index)),
        Rule::Consecutive { rule, count } => {
            if index + 1 < *count {
                return false;
            }
            ((index + 1 - *count)..=index).all(|i| evaluate(rule, frame, i))
        }
    }
}

/// Evaluates `rule` on every row of the frame.
pub fn evaluate_all(rule: &Rule, frame: &Frame) -> Vec<bool> {
    (0..frame.len()).map(|i| evaluate(rule, frame, i)).collect()
}

fn resolve_operand(operand: &Operand, frame: &Frame, index: usize) -> f64 {
    match operand {
        Operand::Series(series) => frame.value(*series, index),
        Operand::Constant(v) => *v,
        Operand::Shifted { operand, bars } => match index.checked_sub(*bars) {
            Some(i) => resolve_operand(operand, frame, i),
            None => f64::NAN,
        },
        Operand::Scaled { operand, factor } => resolve_operand(operand, frame, index) * factor,
        Operand::Difference(a, b) => {
            resolve_operand(a, frame, index) - resolve_operand(b, frame, index)
        }
        Operand::Ratio(a, b) => resolve_operand(a, frame, index) / resolve_operand(b, frame, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use crate::domain::rule::col;
    use crate::domain::series::{EmaLen, Flag, Series, Tier};
    use chrono::NaiveDate;

    fn make_frame(closes: &[f64]) -> Frame {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let candles: Vec<Candle> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle {
                timestamp: t + chrono::Duration::minutes(5 * i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 1000.0,
            })
            .collect();
        Frame::from_candles(&candles)
    }

    #[test]
    fn evaluate_above_close_gt_constant() {
        let frame = make_frame(&[105.0]);
        assert!(evaluate(&col(Series::Close).gt(100.0), &frame, 0));
        assert!(!evaluate(&col(Series::Close).gt(105.0), &frame, 0));
    }

    #[test]
    fn evaluate_below_and_at_most() {
        let frame = make_frame(&[100.0]);
        assert!(!evaluate(&col(Series::Close).lt(100.0), &frame, 0));
        assert!(evaluate(&col(Series::Close).le(100.0), &frame, 0));
    }

    #[test]
    fn evaluate_nan_comparisons_false() {
        let frame = make_frame(&[100.0]);
        assert!(!evaluate(&col(Series::Rsi).lt(50.0), &frame, 0));
        assert!(!evaluate(&col(Series::Rsi).gt(50.0), &frame, 0));
        assert!(!evaluate(&col(Series::Rsi).le(50.0), &frame, 0));
    }

    #[test]
    fn evaluate_shifted_operand() {
        let frame = make_frame(&[10.0, 9.0]);
        let rule = col(Series::Close).le(col(Series::Close).shifted(1));
        assert!(!evaluate(&rule, &frame, 0));
        assert!(evaluate(&rule, &frame, 1));
    }

    #[test]
    fn evaluate_arithmetic_operands() {
        let frame = make_frame(&[200.0]);
        // (high - low) / close = 2 / 200
        let rule = col(Series::High)
            .minus(Series::Low)
            .over(Series::Close)
            .gt(0.009);
        assert!(evaluate(&rule, &frame, 0));
        assert!(evaluate(&col(Series::Close).gt(col(Series::Open).times(0.99)), &frame, 0));
    }

    #[test]
    fn evaluate_cross_below_at_index_0() {
        let frame = make_frame(&[100.0]);
        let rule = col(Series::Close).crosses_below(50.0);
        assert!(!evaluate(&rule, &frame, 0));
    }

    #[test]
    fn evaluate_cross_below_true() {
        let mut frame = make_frame(&[100.0, 100.0, 100.0]);
        frame.insert(Series::Ema(EmaLen::E12), vec![11.0, 10.0, 9.0]);
        frame.insert(Series::Ema(EmaLen::E26), vec![10.0, 10.0, 10.0]);
        let rule = col(Series::Ema(EmaLen::E12)).crosses_below(Series::Ema(EmaLen::E26));
        assert!(!evaluate(&rule, &frame, 1));
        // prev equal counts as not-yet-below
        assert!(evaluate(&rule, &frame, 2));
    }

    #[test]
    fn evaluate_flag() {
        let mut frame = make_frame(&[1.0, 2.0]);
        frame.insert_flag(Flag::SafeDips(Tier::Loose), vec![false, true]);
        let rule = Rule::Flag(Flag::SafeDips(Tier::Loose));
        assert!(!evaluate(&rule, &frame, 0));
        assert!(evaluate(&rule, &frame, 1));
        assert!(!evaluate(&Rule::Flag(Flag::Sma200Dec), &frame, 1));
    }

    #[test]
    fn evaluate_and_or() {
        let frame = make_frame(&[105.0]);
        let t = col(Series::Close).gt(100.0);
        let f = col(Series::Close).lt(100.0);
        assert!(evaluate(&Rule::And(vec![t.clone(), t.clone()]), &frame, 0));
        assert!(!evaluate(&Rule::And(vec![t.clone(), f.clone()]), &frame, 0));
        assert!(evaluate(&Rule::Or(vec![f.clone(), t]), &frame, 0));
        assert!(!evaluate(&Rule::Or(vec![f]), &frame, 0));
        assert!(evaluate(&Rule::And(vec![]), &frame, 0));
        assert!(!evaluate(&Rule::Or(vec![]), &frame, 0));
    }

    #[test]
    fn evaluate_consecutive() {
        let frame = make_frame(&[101.0, 102.0, 103.0, 99.0]);
        let rule = col(Series::Close).gt(100.0).consecutive(3);
        assert!(!evaluate(&rule, &frame, 1));
        assert!(evaluate(&rule, &frame, 2));
        assert!(!evaluate(&rule, &frame, 3));
    }

    #[test]
    fn evaluate_all_rows() {
        let frame = make_frame(&[99.0, 101.0]);
        assert_eq!(
            evaluate_all(&col(Series::Close).gt(100.0), &frame),
            vec![false, true]
        );
    }
}
