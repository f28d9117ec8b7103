//! Property tests: determinism, warm-up, union semantics and absence of
//! look-ahead.

mod common;

use common::*;
use proptest::prelude::*;
use signaltrader::domain::frame::Frame;
use signaltrader::domain::normalizer::Normalizer;
use signaltrader::domain::nostalgia::Nostalgia;
use signaltrader::domain::signal::{aggregate, RuleSet};
use signaltrader::domain::strategy::{Signals, Strategy as _};
use std::sync::OnceLock;

const NORMALIZER_STARTUP: usize = 610;
const NOSTALGIA_ROWS: usize = 3000;

/// Positive random walk of hourly closes.
fn walk(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.03f64..0.03, len).prop_map(|steps| {
        let mut price = 100.0;
        steps
            .into_iter()
            .map(|s| {
                price *= 1.0 + s;
                price
            })
            .collect()
    })
}

fn nostalgia_full() -> &'static (Vec<Candle>, Vec<Candle>, Signals) {
    static FULL: OnceLock<(Vec<Candle>, Vec<Candle>, Signals)> = OnceLock::new();
    FULL.get_or_init(|| {
        let base = candles_5m(NOSTALGIA_ROWS);
        let informative = resample_1h(&base);
        let (_, signals) = Nostalgia::default()
            .analyze(&base, Some(informative.as_slice()))
            .unwrap();
        (base, informative, signals)
    })
}

fn prefix(signals: &Signals, n: usize) -> (Vec<Option<bool>>, Vec<Option<bool>>) {
    (signals.enter[..n].to_vec(), signals.exit[..n].to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn normalizer_is_deterministic(closes in walk(620..700)) {
        let candles = candles_1h(&closes);
        let strategy = Normalizer::default();
        let (_, a) = strategy.analyze(&candles, None).unwrap();
        let (_, b) = strategy.analyze(&candles, None).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn normalizer_warmup_rows_are_none(closes in walk(620..700)) {
        let candles = candles_1h(&closes);
        let (_, signals) = Normalizer::default().analyze(&candles, None).unwrap();
        for i in 0..signals.len() {
            prop_assert_eq!(signals.enter[i].is_none(), i < NORMALIZER_STARTUP);
            prop_assert_eq!(signals.exit[i].is_none(), i < NORMALIZER_STARTUP);
        }
    }

    #[test]
    fn normalizer_has_no_look_ahead(closes in walk(640..700), cut in 611usize..640) {
        let candles = candles_1h(&closes);
        let strategy = Normalizer::default();
        let (_, full) = strategy.analyze(&candles, None).unwrap();
        let (_, head) = strategy.analyze(&candles[..cut], None).unwrap();
        prop_assert_eq!(prefix(&full, cut), prefix(&head, cut));
    }

    #[test]
    fn disabled_sets_give_false_on_ready_rows(ready in prop::collection::vec(any::<bool>(), 1..60)) {
        let closes: Vec<f64> = (0..ready.len()).map(wave).collect();
        let mut frame = Frame::from_candles(&candles_1h(&closes));
        frame.set_ready(ready.clone());
        let sets: Vec<RuleSet> = Nostalgia::default()
            .buy_rules()
            .iter()
            .cloned()
            .map(|s| RuleSet { enabled: false, ..s })
            .collect();
        let expected: Vec<Option<bool>> = ready.iter().map(|r| r.then_some(false)).collect();
        prop_assert_eq!(aggregate(&sets, &frame), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    #[test]
    fn nostalgia_has_no_look_ahead(cut in (NOSTALGIA_FIRST_READY + 1)..NOSTALGIA_ROWS) {
        let (base, informative, full) = nostalgia_full();
        // the whole informative series is passed: only closed bars may be seen
        let (_, head) = Nostalgia::default()
            .analyze(&base[..cut], Some(informative.as_slice()))
            .unwrap();
        prop_assert_eq!(prefix(full, cut), prefix(&head, cut));
    }
}
