//! Rule AST data structures.
//!
//! This module defines the abstract syntax tree for signal rules:
//! - `Operand`: What can be compared (frame columns, constants, arithmetic over them)
//! - `Rule`: The rule AST with comparison, flag, composite, and temporal variants
//!
//! Rule sets are compiled into this form once, when a strategy is built, and
//! evaluated per bar by `rule_eval`.

use crate::domain::series::{Flag, Series};

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Series(Series),
    Constant(f64),
    /// Value of the inner operand `bars` rows earlier.
    Shifted {
        operand: Box<Operand>,
        bars: usize,
    },
    Scaled {
        operand: Box<Operand>,
        factor: f64,
    },
    Difference(Box<Operand>, Box<Operand>),
    Ratio(Box<Operand>, Box<Operand>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Above {
        left: Operand,
        right: Operand,
    },
    Below {
        left: Operand,
        right: Operand,
    },
    AtMost {
        left: Operand,
        right: Operand,
    },
    CrossBelow {
        left: Operand,
        right: Operand,
    },
    Flag(Flag),
    And(Vec<Rule>),
    Or(Vec<Rule>),
    Consecutive {
        rule: Box<Rule>,
        count: usize,
    },
}

impl Operand {
    pub fn shifted(self, bars: usize) -> Operand {
        Operand::Shifted {
            operand: Box::new(self),
            bars,
        }
    }

    pub fn times(self, factor: f64) -> Operand {
        Operand::Scaled {
            operand: Box::new(self),
            factor,
        }
    }

    pub fn minus(self, other: impl Into<Operand>) -> Operand {
        Operand::Difference(Box::new(self), Box::new(other.into()))
    }

    pub fn over(self, other: impl Into<Operand>) -> Operand {
        Operand::Ratio(Box::new(self), Box::new(other.into()))
    }

    pub fn gt(self, right: impl Into<Operand>) -> Rule {
        Rule::Above {
            left: self,
            right: right.into(),
        }
    }

    pub fn lt(self, right: impl Into<Operand>) -> Rule {
        Rule::Below {
            left: self,
            right: right.into(),
        }
    }

    pub fn le(self, right: impl Into<Operand>) -> Rule {
        Rule::AtMost {
            left: self,
            right: right.into(),
        }
    }

    pub fn crosses_below(self, right: impl Into<Operand>) -> Rule {
        Rule::CrossBelow {
            left: self,
            right: right.into(),
        }
    }
}

impl From<Series> for Operand {
    fn from(s: Series) -> Self {
        Operand::Series(s)
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Constant(v)
    }
}

/// Shorthand for a column operand.
pub fn col(s: Series) -> Operand {
    Operand::Series(s)
}

impl Rule {
    pub fn consecutive(self, count: usize) -> Rule {
        Rule::Consecutive {
            rule: Box::new(self),
            count,
        }
    }

    /// Number of leaf conditions, for logging.
    pub fn leaf_count(&self) -> usize {
        match self {
            Rule::And(rules) | Rule::Or(rules) => rules.iter().map(Rule::leaf_count).sum(),
            Rule::Consecutive { rule, .. } => rule.leaf_count(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{EmaLen, Tier};

    #[test]
    fn builders_produce_comparisons() {
        let r = col(Series::Close).lt(col(Series::BbLower).times(0.98));
        assert_eq!(
            r,
            Rule::Below {
                left: Operand::Series(Series::Close),
                right: Operand::Scaled {
                    operand: Box::new(Operand::Series(Series::BbLower)),
                    factor: 0.98,
                },
            }
        );
    }

    #[test]
    fn constants_convert() {
        let r = col(Series::Rsi).gt(30.0);
        assert!(matches!(
            r,
            Rule::Above {
                right: Operand::Constant(c),
                ..
            } if c == 30.0
        ));
    }

    #[test]
    fn shifted_and_ratio_nest() {
        let op = col(Series::Close).minus(Series::OpenMin36).over(Series::OpenMin36);
        assert!(matches!(op, Operand::Ratio(_, _)));
        let s = col(Series::Close).shifted(1);
        assert!(matches!(s, Operand::Shifted { bars: 1, .. }));
    }

    #[test]
    fn leaf_count_walks_tree() {
        let rule = Rule::And(vec![
            Rule::Flag(Flag::SafeDips(Tier::Normal)),
            Rule::Or(vec![
                col(Series::Ema(EmaLen::E50)).gt(Series::Ema(EmaLen::E200)),
                col(Series::Close).gt(1.0),
            ]),
            col(Series::Close).gt(Series::BbUpper).consecutive(6),
        ]);
        assert_eq!(rule.leaf_count(), 4);
    }
}
