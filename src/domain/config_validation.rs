//! Loads strategy parameters from a [`ConfigPort`], rejecting anything that
//! does not name a known section, key or value.
//!
//! Keys that are absent keep their defaults. Every problem is reported as
//! [`StrategyError::ConfigInvalid`] naming the offending section and key.

use crate::domain::error::StrategyError;
use crate::domain::nostalgia::protection::{Guard, Protections};
use crate::domain::nostalgia::{self, NostalgiaParams};
use crate::domain::normalizer::{self, NormalizerParams};
use crate::domain::params::Decimal;
use crate::domain::series::{PumpWindow, Tier};
use crate::ports::config_port::ConfigPort;
use std::str::FromStr;

pub const STRATEGY_SECTION: &str = "strategy";

/// Strategy names a parameter file may declare.
pub const STRATEGY_NAMES: [&str; 2] = [nostalgia::NAME, normalizer::NAME];

const PROTECTION_KEYS: [&str; 17] = [
    "ema_fast",
    "ema_fast_len",
    "ema_slow",
    "ema_slow_len",
    "close_above_ema_fast",
    "close_above_ema_fast_len",
    "close_above_ema_slow",
    "close_above_ema_slow_len",
    "sma200_rising",
    "sma200_rising_val",
    "sma200_1h_rising",
    "sma200_1h_rising_val",
    "safe_dips",
    "safe_dips_type",
    "safe_pump",
    "safe_pump_type",
    "safe_pump_period",
];

/// Reads `[strategy] name`, if present.
pub fn strategy_name(config: &dyn ConfigPort) -> Result<Option<&'static str>, StrategyError> {
    check_keys(config, STRATEGY_SECTION, &["name"])?;
    let Some(raw) = config.get_string(STRATEGY_SECTION, "name") else {
        return Ok(None);
    };
    let name = raw.trim().to_lowercase();
    STRATEGY_NAMES
        .iter()
        .copied()
        .find(|n| *n == name)
        .map(Some)
        .ok_or_else(|| {
            StrategyError::invalid(
                STRATEGY_SECTION,
                "name",
                format!("unknown strategy '{}'", raw.trim()),
            )
        })
}

pub fn load_nostalgia_params(config: &dyn ConfigPort) -> Result<NostalgiaParams, StrategyError> {
    let mut params = NostalgiaParams::default();
    let mut applied = 0usize;

    for section in config.sections() {
        match section.as_str() {
            STRATEGY_SECTION => {
                strategy_name(config)?;
            }
            "dips" => applied += apply_decimals(config, &section, params.dips.decimals_mut(), &[])?,
            "pumps" => {
                applied += apply_decimals(config, &section, params.pumps.decimals_mut(), &[])?
            }
            "sell_pumps" => {
                applied += apply_decimals(config, &section, params.sell_pumps.decimals_mut(), &[])?
            }
            "exit" => applied += apply_decimals(config, &section, params.exit.decimals_mut(), &[])?,
            other => {
                if let Some(id) = set_id(other, "buy_") {
                    let set = params.buy_set_mut(id).ok_or_else(|| unknown_section(other))?;
                    let mut allowed = vec!["enabled"];
                    allowed.extend(PROTECTION_KEYS);
                    let decimals = set
                        .trigger
                        .decimals_mut()
                        .into_iter()
                        .map(|(k, d)| (k.to_string(), d))
                        .collect();
                    applied += apply_decimals(config, other, decimals, &allowed)?;
                    load_protections(config, other, &mut set.protections)?;
                    if let Some(enabled) = get_bool(config, other, "enabled")? {
                        set.enabled = enabled;
                    }
                } else if let Some(id) = set_id(other, "sell_") {
                    let set = params.sell_set_mut(id).ok_or_else(|| unknown_section(other))?;
                    let decimals = set
                        .trigger
                        .decimals_mut()
                        .into_iter()
                        .map(|(k, d)| (k.to_string(), d))
                        .collect();
                    applied += apply_decimals(config, other, decimals, &["enabled"])?;
                    if let Some(enabled) = get_bool(config, other, "enabled")? {
                        set.enabled = enabled;
                    }
                } else {
                    return Err(unknown_section(other));
                }
            }
        }
    }

    tracing::info!(
        decimals = applied,
        buy_enabled = params.buy.iter().filter(|s| s.enabled).count(),
        sell_enabled = params.sell.iter().filter(|s| s.enabled).count(),
        "nostalgia parameters loaded"
    );
    Ok(params)
}

pub fn load_normalizer_params(config: &dyn ConfigPort) -> Result<NormalizerParams, StrategyError> {
    let mut params = NormalizerParams::default();
    let mut applied = 0usize;

    for section in config.sections() {
        match section.as_str() {
            STRATEGY_SECTION => {
                strategy_name(config)?;
            }
            normalizer::NAME => {
                let decimals = params
                    .decimals_mut()
                    .into_iter()
                    .map(|(k, d)| (k.to_string(), d))
                    .collect();
                applied += apply_decimals(config, &section, decimals, &[])?;
            }
            other => return Err(unknown_section(other)),
        }
    }

    tracing::info!(decimals = applied, "normalizer parameters loaded");
    Ok(params)
}

/// `buy_07` -> 7. Only the two-digit form is accepted, so `buy_7` yields
/// `None`.
fn set_id(section: &str, prefix: &str) -> Option<u8> {
    let digits = section.strip_prefix(prefix)?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn unknown_section(section: &str) -> StrategyError {
    StrategyError::invalid(section, "", "unknown section")
}

fn check_keys(config: &dyn ConfigPort, section: &str, allowed: &[&str]) -> Result<(), StrategyError> {
    match config.keys(section).into_iter().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(StrategyError::invalid(section, &key, "unknown key")),
        None => Ok(()),
    }
}

/// Writes every present decimal key of `section`. Keys outside `decimals`
/// and `extra` are rejected. Returns the number of decimals set.
fn apply_decimals(
    config: &dyn ConfigPort,
    section: &str,
    decimals: Vec<(String, &mut Decimal)>,
    extra: &[&str],
) -> Result<usize, StrategyError> {
    let mut allowed: Vec<&str> = decimals.iter().map(|(k, _)| k.as_str()).collect();
    allowed.extend_from_slice(extra);
    check_keys(config, section, &allowed)?;

    let mut applied = 0;
    for (key, decimal) in decimals {
        if let Some(raw) = config.get_string(section, &key) {
            decimal.set_from_str(section, &key, &raw)?;
            if !decimal.in_range() {
                tracing::warn!(
                    section,
                    key = %key,
                    value = decimal.value,
                    low = decimal.low,
                    high = decimal.high,
                    "parameter outside its search range"
                );
            }
            applied += 1;
        }
    }
    Ok(applied)
}

fn get_bool(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<bool>, StrategyError> {
    config
        .get_string(section, key)
        .map(|raw| parse_bool(section, key, &raw))
        .transpose()
}

fn parse_bool(section: &str, key: &str, raw: &str) -> Result<bool, StrategyError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(StrategyError::invalid(
            section,
            key,
            format!("'{}' is not a boolean", other),
        )),
    }
}

fn get_parsed<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, StrategyError> {
    config
        .get_string(section, key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                StrategyError::invalid(section, key, format!("unknown value '{}'", raw.trim()))
            })
        })
        .transpose()
}

fn load_guard<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    name: &str,
    arg_key: &str,
    guard: &mut Guard<T>,
) -> Result<(), StrategyError> {
    if let Some(arg) = get_parsed(config, section, arg_key)? {
        guard.arg = arg;
    }
    if let Some(enabled) = get_bool(config, section, name)? {
        guard.enabled = enabled;
    }
    Ok(())
}

fn load_rising(
    config: &dyn ConfigPort,
    section: &str,
    name: &str,
    guard: &mut Guard<usize>,
) -> Result<(), StrategyError> {
    let key = format!("{}_val", name);
    load_guard(config, section, name, &key, guard)?;
    if guard.arg == 0 {
        return Err(StrategyError::invalid(section, &key, "must be a positive bar count"));
    }
    Ok(())
}

fn load_protections(
    config: &dyn ConfigPort,
    section: &str,
    p: &mut Protections,
) -> Result<(), StrategyError> {
    load_guard(config, section, "ema_fast", "ema_fast_len", &mut p.ema_fast)?;
    load_guard(config, section, "ema_slow", "ema_slow_len", &mut p.ema_slow)?;
    load_guard(
        config,
        section,
        "close_above_ema_fast",
        "close_above_ema_fast_len",
        &mut p.close_above_ema_fast,
    )?;
    load_guard(
        config,
        section,
        "close_above_ema_slow",
        "close_above_ema_slow_len",
        &mut p.close_above_ema_slow,
    )?;
    load_rising(config, section, "sma200_rising", &mut p.sma200_rising)?;
    load_rising(config, section, "sma200_1h_rising", &mut p.sma200_1h_rising)?;
    load_guard(config, section, "safe_dips", "safe_dips_type", &mut p.safe_dips)?;

    let (mut window, mut tier) = p.safe_pump.arg;
    if let Some(w) = get_parsed::<PumpWindow>(config, section, "safe_pump_period")? {
        window = w;
    }
    if let Some(t) = get_parsed::<Tier>(config, section, "safe_pump_type")? {
        tier = t;
    }
    p.safe_pump.arg = (window, tier);
    if let Some(enabled) = get_bool(config, section, "safe_pump")? {
        p.safe_pump.enabled = enabled;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use crate::domain::nostalgia::buy::BuyTrigger;
    use crate::domain::series::{EmaLen, InformativeEmaLen};

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_at(err: StrategyError) -> (String, String) {
        match err {
            StrategyError::ConfigInvalid { section, key, .. } => (section, key),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let params = load_nostalgia_params(&config("")).unwrap();
        assert_eq!(params, NostalgiaParams::default());
    }

    #[test]
    fn overrides_decimals_and_flags() {
        let params = load_nostalgia_params(&config(
            "[buy_03]\nenabled = no\nema_rel = 0.97\n\n[exit]\nprofit_6 = 0.25\n[dips]\nstrict_1 = 0.01\n",
        ))
        .unwrap();
        let set = &params.buy[2];
        assert!(!set.enabled);
        match &set.trigger {
            BuyTrigger::EmaSpreadAboveInformative { ema_rel, .. } => {
                assert_eq!(ema_rel.get(), 0.97)
            }
            other => panic!("unexpected trigger {other:?}"),
        }
        assert_eq!(params.exit.profit[6].get(), 0.25);
        assert_eq!(params.dips.thresholds(Tier::Strict)[0], 0.01);
    }

    #[test]
    fn protections_are_loaded() {
        let params = load_nostalgia_params(&config(
            "[buy_05]\nema_fast = true\nema_fast_len = 26\nclose_above_ema_slow = 1\nclose_above_ema_slow_len = 15\nsma200_rising = yes\nsma200_rising_val = 44\nsafe_pump = true\nsafe_pump_type = loose\nsafe_pump_period = 48\n",
        ))
        .unwrap();
        let p = &params.buy[4].protections;
        assert_eq!(p.ema_fast.active(), Some(&EmaLen::E26));
        assert_eq!(p.close_above_ema_slow.active(), Some(&InformativeEmaLen::E15));
        assert_eq!(p.sma200_rising.active(), Some(&44));
        assert_eq!(p.safe_pump.active(), Some(&(PumpWindow::W48, Tier::Loose)));
    }

    #[test]
    fn disabling_keeps_argument() {
        let params =
            load_nostalgia_params(&config("[buy_01]\nema_fast = false\nema_fast_len = 100\n"))
                .unwrap();
        let guard = params.buy[0].protections.ema_fast;
        assert!(!guard.enabled);
        assert_eq!(guard.arg, EmaLen::E100);
    }

    #[test]
    fn rejects_unknown_categorical_value() {
        let err =
            load_nostalgia_params(&config("[buy_02]\nema_fast_len = 33\n")).unwrap_err();
        assert_eq!(invalid_at(err), ("buy_02".into(), "ema_fast_len".into()));

        let err = load_nostalgia_params(&config("[buy_02]\nsafe_dips_type = medium\n"))
            .unwrap_err();
        assert_eq!(invalid_at(err), ("buy_02".into(), "safe_dips_type".into()));

        // informative EMAs have no 12 period column
        let err = load_nostalgia_params(&config("[buy_02]\nema_slow_len = 12\n")).unwrap_err();
        assert_eq!(invalid_at(err), ("buy_02".into(), "ema_slow_len".into()));
    }

    #[test]
    fn rejects_bad_boolean_and_number() {
        let err = load_nostalgia_params(&config("[sell_01]\nenabled = maybe\n")).unwrap_err();
        assert_eq!(invalid_at(err), ("sell_01".into(), "enabled".into()));

        let err = load_nostalgia_params(&config("[sell_01]\nrsi = high\n")).unwrap_err();
        assert_eq!(invalid_at(err), ("sell_01".into(), "rsi".into()));
    }

    #[test]
    fn rejects_unknown_sections_and_keys() {
        let err = load_nostalgia_params(&config("[buy_24]\nenabled = true\n")).unwrap_err();
        assert_eq!(invalid_at(err).0, "buy_24");

        let err = load_nostalgia_params(&config("[sell_05]\nenabled = true\n")).unwrap_err();
        assert_eq!(invalid_at(err).0, "sell_05");

        let err = load_nostalgia_params(&config("[exit]\nprofit_9 = 0.1\n")).unwrap_err();
        assert_eq!(invalid_at(err), ("exit".into(), "profit_9".into()));

        let err = load_nostalgia_params(&config("[normalizer]\nentry_below = 1\n")).unwrap_err();
        assert_eq!(invalid_at(err).0, "normalizer");
    }

    #[test]
    fn rejects_zero_rising_window() {
        let err = load_nostalgia_params(&config("[buy_09]\nsma200_1h_rising_val = 0\n"))
            .unwrap_err();
        assert_eq!(invalid_at(err), ("buy_09".into(), "sma200_1h_rising_val".into()));
    }

    #[test]
    fn out_of_range_value_is_kept() {
        let params = load_normalizer_params(&config("[normalizer]\nentry_below = 12\n")).unwrap();
        assert_eq!(params.entry_below.get(), 12.0);
        assert_eq!(params.exit_above.get(), 8.0);
    }

    #[test]
    fn strategy_section() {
        assert_eq!(
            strategy_name(&config("[strategy]\nname = Normalizer\n")).unwrap(),
            Some("normalizer")
        );
        assert_eq!(strategy_name(&config("")).unwrap(), None);
        assert!(strategy_name(&config("[strategy]\nname = other\n")).is_err());
        assert!(strategy_name(&config("[strategy]\nversion = 2\n")).is_err());
    }

    #[test]
    fn set_id_shapes() {
        assert_eq!(set_id("buy_07", "buy_"), Some(7));
        assert_eq!(set_id("buy_", "buy_"), None);
        assert_eq!(set_id("buy_x1", "buy_"), None);
        assert_eq!(set_id("sell_04", "buy_"), None);
        assert_eq!(set_id("buy_7", "buy_"), None);
        assert_eq!(set_id("buy_007", "buy_"), None);
    }

    #[test]
    fn rejects_unpadded_set_section() {
        let content = "[buy_07]\nenabled = true\n\n[buy_7]\nenabled = false\n";
        let err = load_nostalgia_params(&config(content)).unwrap_err();
        assert_eq!(invalid_at(err).0, "buy_7");

        let err = load_nostalgia_params(&config("[sell_1]\nenabled = false\n")).unwrap_err();
        assert_eq!(invalid_at(err).0, "sell_1");
    }
}
