//! CLI definition and dispatch.

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{parse_timestamp, CsvAdapter};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::candle::Candle;
use crate::domain::config_validation::{
    load_normalizer_params, load_nostalgia_params, strategy_name, STRATEGY_SECTION,
};
use crate::domain::error::StrategyError;
use crate::domain::normalizer::{self, Normalizer, NormalizerParams};
use crate::domain::nostalgia::{self, Nostalgia, NostalgiaParams};
use crate::domain::strategy::{Strategy, StrategySettings};
use crate::domain::trade::Trade;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "signaltrader",
    about = "Evaluate trading strategy signals over candle data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    Nostalgia,
    Normalizer,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Nostalgia => nostalgia::NAME,
            StrategyKind::Normalizer => normalizer::NAME,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        [StrategyKind::Nostalgia, StrategyKind::Normalizer]
            .into_iter()
            .find(|k| k.name() == name)
    }
}

#[derive(Args, Debug)]
pub struct DataArgs {
    /// Strategy to run; defaults to `[strategy] name` of the parameter file
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyKind>,
    /// Base timeframe candles (CSV)
    #[arg(short, long)]
    pub candles: PathBuf,
    /// Informative timeframe candles (CSV)
    #[arg(short, long)]
    pub informative: Option<PathBuf>,
    /// INI parameter file
    #[arg(short, long)]
    pub params: Option<PathBuf>,
    /// Ignore base candles before this time
    #[arg(long, value_parser = parse_time)]
    pub start: Option<NaiveDateTime>,
    /// Ignore base candles after this time
    #[arg(long, value_parser = parse_time)]
    pub end: Option<NaiveDateTime>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute entry and exit signals for every candle
    Signals {
        #[command(flatten)]
        data: DataArgs,
        /// Report path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Classify an open trade against the latest candle
    Exit {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, default_value = "UNKNOWN")]
        pair: String,
        #[arg(long)]
        open_rate: f64,
        /// Highest rate since entry; defaults to max(open, current)
        #[arg(long)]
        max_rate: Option<f64>,
        /// Defaults to the last candle close
        #[arg(long)]
        current_rate: Option<f64>,
        #[arg(long, value_parser = parse_time)]
        open_time: NaiveDateTime,
        /// Defaults to the last candle timestamp
        #[arg(long, value_parser = parse_time)]
        now: Option<NaiveDateTime>,
    },
    /// Load and validate a parameter file
    Validate {
        #[arg(short, long)]
        params: PathBuf,
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyKind>,
    },
    /// Print the static strategy settings
    Settings {
        #[arg(short, long, value_enum)]
        strategy: StrategyKind,
    },
    /// List every tunable decimal with its value and search range
    Params {
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyKind>,
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
}

fn parse_time(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).map_err(|e| e.to_string())
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Signals { data, output } => run_signals(&data, output.as_deref()),
        Command::Exit {
            data,
            pair,
            open_rate,
            max_rate,
            current_rate,
            open_time,
            now,
        } => run_exit(
            &data,
            ExitArgs {
                pair,
                open_rate,
                max_rate,
                current_rate,
                open_time,
                now,
            },
        ),
        Command::Validate { params, strategy } => run_validate(&params, strategy),
        Command::Settings { strategy } => run_settings(strategy),
        Command::Params { strategy, params } => run_params(strategy, params.as_deref()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StrategyError> {
    tracing::info!(file = %path.display(), "loading parameters");
    FileConfigAdapter::from_file(path)
}

/// Picks the strategy from the flag, else from the parameter file. Both
/// present must agree.
pub fn resolve_kind(
    flag: Option<StrategyKind>,
    config: Option<&dyn ConfigPort>,
) -> Result<StrategyKind, StrategyError> {
    let declared = match config {
        Some(c) => strategy_name(c)?.and_then(StrategyKind::from_name),
        None => None,
    };
    match (flag, declared) {
        (Some(f), Some(d)) if f != d => Err(StrategyError::invalid(
            STRATEGY_SECTION,
            "name",
            format!("file is for {} but {} was requested", d.name(), f.name()),
        )),
        (Some(k), _) | (None, Some(k)) => Ok(k),
        (None, None) => Err(StrategyError::ConfigMissing {
            section: STRATEGY_SECTION.into(),
            key: "name".into(),
        }),
    }
}

pub fn build_strategy(
    kind: StrategyKind,
    config: Option<&dyn ConfigPort>,
) -> Result<Box<dyn Strategy>, StrategyError> {
    Ok(match kind {
        StrategyKind::Nostalgia => {
            let params = match config {
                Some(c) => load_nostalgia_params(c)?,
                None => NostalgiaParams::default(),
            };
            Box::new(Nostalgia::new(params))
        }
        StrategyKind::Normalizer => {
            let params = match config {
                Some(c) => load_normalizer_params(c)?,
                None => NormalizerParams::default(),
            };
            Box::new(Normalizer::new(params))
        }
    })
}

fn strategy_from_args(
    flag: Option<StrategyKind>,
    params: Option<&Path>,
) -> Result<Box<dyn Strategy>, StrategyError> {
    let config = params.map(load_config).transpose()?;
    let config = config.as_ref().map(|c| c as &dyn ConfigPort);
    let kind = resolve_kind(flag, config)?;
    build_strategy(kind, config)
}

struct Loaded {
    strategy: Box<dyn Strategy>,
    candles: Vec<Candle>,
    informative: Option<Vec<Candle>>,
}

fn load_inputs(data: &DataArgs) -> Result<Loaded, StrategyError> {
    let strategy = strategy_from_args(data.strategy, data.params.as_deref())?;
    let port = CsvAdapter::new(PathBuf::new());

    let range = match (data.start, data.end) {
        (None, None) => None,
        (start, end) => Some((
            start.unwrap_or(NaiveDateTime::MIN),
            end.unwrap_or(NaiveDateTime::MAX),
        )),
    };
    let candles = port.fetch_candles(&data.candles.to_string_lossy(), range)?;
    let informative = data
        .informative
        .as_ref()
        .map(|p| port.fetch_candles(&p.to_string_lossy(), None))
        .transpose()?;

    tracing::info!(
        strategy = strategy.name(),
        candles = candles.len(),
        informative = informative.as_ref().map_or(0, |i| i.len()),
        "inputs loaded"
    );
    Ok(Loaded {
        strategy,
        candles,
        informative,
    })
}

fn run_signals(data: &DataArgs, output: Option<&Path>) -> Result<(), StrategyError> {
    let loaded = load_inputs(data)?;
    let (frame, signals) = loaded
        .strategy
        .analyze(&loaded.candles, loaded.informative.as_deref())?;

    tracing::info!(
        rows = signals.len(),
        ready = frame.ready_count(),
        enter = signals.enter_count(),
        exit = signals.exit_count(),
        "signals computed"
    );

    let report = CsvReportAdapter;
    match output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            report.write(&loaded.candles, &signals, &mut out)?;
            out.flush()?;
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            report.write(&loaded.candles, &signals, &mut out)?;
        }
    }
    Ok(())
}

struct ExitArgs {
    pair: String,
    open_rate: f64,
    max_rate: Option<f64>,
    current_rate: Option<f64>,
    open_time: NaiveDateTime,
    now: Option<NaiveDateTime>,
}

fn run_exit(data: &DataArgs, args: ExitArgs) -> Result<(), StrategyError> {
    let loaded = load_inputs(data)?;
    let last = loaded.candles.last().ok_or_else(|| StrategyError::Data {
        reason: "no candles to evaluate".into(),
    })?;

    let current_rate = args.current_rate.unwrap_or(last.close);
    let trade = Trade {
        pair: args.pair,
        open_time: args.open_time,
        open_rate: args.open_rate,
        current_rate,
        max_rate: args
            .max_rate
            .unwrap_or_else(|| args.open_rate.max(current_rate)),
        is_open: true,
    };
    let now = args.now.unwrap_or(last.timestamp);

    let (frame, _) = loaded
        .strategy
        .analyze(&loaded.candles, loaded.informative.as_deref())?;
    let reason = loaded.strategy.custom_exit(&trade, &frame)?;
    let stoploss = loaded.strategy.custom_stoploss(&trade, now);

    tracing::info!(
        pair = %trade.pair,
        profit = trade.profit_ratio(),
        max_profit = trade.max_profit_ratio(),
        open_minutes = trade.elapsed(now).num_minutes(),
        "trade evaluated"
    );

    match reason {
        Some(r) => println!("exit: {r}"),
        None => println!("exit: none"),
    }
    if let Some(s) = stoploss {
        println!("stoploss: {s}");
    }
    Ok(())
}

fn run_validate(params: &Path, flag: Option<StrategyKind>) -> Result<(), StrategyError> {
    let strategy = strategy_from_args(flag, Some(params))?;
    println!(
        "{}: {} is valid ({} parameters)",
        strategy.name(),
        params.display(),
        strategy.param_entries().len()
    );
    Ok(())
}

fn run_settings(kind: StrategyKind) -> Result<(), StrategyError> {
    let strategy = build_strategy(kind, None)?;
    print!("{}", format_settings(strategy.name(), strategy.settings()));
    Ok(())
}

fn run_params(flag: Option<StrategyKind>, params: Option<&Path>) -> Result<(), StrategyError> {
    let strategy = strategy_from_args(flag, params)?;
    for entry in strategy.param_entries() {
        println!("[{}] {} = {}", entry.section, entry.key, entry.value);
    }
    Ok(())
}

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "none".to_string(), |v| v.to_string())
}

pub fn format_settings(name: &str, s: &StrategySettings) -> String {
    let mut out = String::new();
    let mut line = |k: &str, v: String| out.push_str(&format!("{k}: {v}\n"));

    line("strategy", name.to_string());
    line("timeframe", s.timeframe.to_string());
    line("informative_timeframe", opt(s.informative_timeframe));
    line("startup_candle_count", s.startup_candle_count.to_string());
    line("stoploss", s.stoploss.to_string());
    let roi: Vec<String> = s
        .minimal_roi
        .entries()
        .iter()
        .map(|(m, r)| format!("{m}={r}"))
        .collect();
    line("minimal_roi", roi.join(" "));
    line("trailing_stop", s.trailing.enabled.to_string());
    line("trailing_stop_positive", opt(s.trailing.positive));
    line(
        "trailing_stop_positive_offset",
        s.trailing.positive_offset.to_string(),
    );
    line(
        "trailing_only_offset_is_reached",
        s.trailing.only_offset_is_reached.to_string(),
    );
    line(
        "order_types",
        format!(
            "buy={} sell={} stoploss={} trailing_stop_loss={} stoploss_on_exchange={}",
            s.order_types.buy,
            s.order_types.sell,
            s.order_types.stoploss,
            opt(s.order_types.trailing_stop_loss),
            s.order_types.stoploss_on_exchange
        ),
    );
    line("use_sell_signal", s.use_sell_signal.to_string());
    line("sell_profit_only", s.sell_profit_only.to_string());
    line("sell_profit_offset", opt(s.sell_profit_offset));
    line("ignore_roi_if_buy_signal", s.ignore_roi_if_buy_signal.to_string());
    line("process_only_new_candles", s.process_only_new_candles.to_string());
    line("use_custom_stoploss", s.use_custom_stoploss.to_string());
    out
}
