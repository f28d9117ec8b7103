//! Open trade state as handed over by the host.

use crate::domain::error::StrategyError;
use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct Trade {
    pub pair: String,
    pub open_time: NaiveDateTime,
    pub open_rate: f64,
    pub current_rate: f64,
    /// Highest rate seen since entry.
    pub max_rate: f64,
    pub is_open: bool,
}

impl Trade {
    pub fn profit_ratio(&self) -> f64 {
        (self.current_rate - self.open_rate) / self.open_rate
    }

    pub fn max_profit_ratio(&self) -> f64 {
        (self.max_rate - self.open_rate) / self.open_rate
    }

    pub fn elapsed(&self, now: NaiveDateTime) -> Duration {
        now - self.open_time
    }

    /// Rejects closed trades and rates that are not finite and positive.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if !self.is_open {
            return Err(StrategyError::InvalidTrade {
                reason: format!("trade on {} is closed", self.pair),
            });
        }
        for (name, rate) in [
            ("open_rate", self.open_rate),
            ("current_rate", self.current_rate),
            ("max_rate", self.max_rate),
        ] {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(StrategyError::InvalidTrade {
                    reason: format!("{name} must be finite and positive, got {rate}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn sample_trade() -> Trade {
        Trade {
            pair: "ETH/USDT".into(),
            open_time: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            open_rate: 100.0,
            current_rate: 105.0,
            max_rate: 112.0,
            is_open: true,
        }
    }

    #[test]
    fn profit_ratios() {
        let t = sample_trade();
        assert_relative_eq!(t.profit_ratio(), 0.05);
        assert_relative_eq!(t.max_profit_ratio(), 0.12);
    }

    #[test]
    fn elapsed_since_open() {
        let t = sample_trade();
        let now = t.open_time + Duration::minutes(301);
        assert_eq!(t.elapsed(now).num_minutes(), 301);
    }

    #[test]
    fn validate_accepts_open_trade() {
        assert!(sample_trade().validate().is_ok());
    }

    #[test]
    fn validate_rejects_closed_or_bad_rates() {
        let mut t = sample_trade();
        t.is_open = false;
        assert!(matches!(t.validate(), Err(StrategyError::InvalidTrade { .. })));

        let mut t = sample_trade();
        t.open_rate = 0.0;
        assert!(t.validate().is_err());

        let mut t = sample_trade();
        t.max_rate = f64::NAN;
        assert!(t.validate().is_err());
    }
}
