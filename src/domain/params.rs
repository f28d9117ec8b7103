//! Tunable parameters.

use crate::domain::error::StrategyError;
use std::fmt;

/// A numeric threshold plus the range an optimiser may search.
///
/// The range is informational only. Loaded values are not clamped to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decimal {
    pub value: f64,
    pub low: f64,
    pub high: f64,
}

impl Decimal {
    pub const fn new(value: f64, low: f64, high: f64) -> Self {
        Self { value, low, high }
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn in_range(&self) -> bool {
        self.value >= self.low && self.value <= self.high
    }

    /// Replaces the value from its textual form.
    pub fn set_from_str(&mut self, section: &str, key: &str, raw: &str) -> Result<(), StrategyError> {
        let v: f64 = raw
            .trim()
            .parse()
            .map_err(|_| StrategyError::invalid(section, key, format!("'{}' is not a number", raw.trim())))?;
        if !v.is_finite() {
            return Err(StrategyError::invalid(section, key, "value must be finite"));
        }
        self.value = v;
        Ok(())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}]", self.value, self.low, self.high)
    }
}

/// A named decimal parameter, as listed for an optimiser.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    pub section: String,
    pub key: String,
    pub value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_from_str_parses() {
        let mut d = Decimal::new(0.5, 0.1, 1.0);
        d.set_from_str("buy_01", "rsi", " 0.25 ").unwrap();
        assert_eq!(d.get(), 0.25);
    }

    #[test]
    fn set_from_str_rejects_garbage() {
        let mut d = Decimal::new(0.5, 0.1, 1.0);
        let err = d.set_from_str("buy_01", "rsi", "abc").unwrap_err();
        assert!(err.to_string().contains("[buy_01] rsi"));
        assert!(d.set_from_str("buy_01", "rsi", "inf").is_err());
        assert_eq!(d.get(), 0.5);
    }

    #[test]
    fn range_is_not_enforced() {
        let mut d = Decimal::new(0.5, 0.1, 1.0);
        d.set_from_str("s", "k", "7").unwrap();
        assert_eq!(d.get(), 7.0);
        assert!(!d.in_range());
    }

    #[test]
    fn display_shows_range() {
        assert_eq!(Decimal::new(0.5, 0.1, 1.0).to_string(), "0.5 [0.1, 1]");
    }
}
