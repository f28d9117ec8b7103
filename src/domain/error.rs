//! Domain error types.

/// Top-level error type for signaltrader.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid candle data: {reason}")]
    InvalidCandles { reason: String },

    #[error("strategy {strategy} requires an informative {timeframe} series")]
    MissingInformative { strategy: String, timeframe: String },

    #[error("invalid trade: {reason}")]
    InvalidTrade { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StrategyError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        StrategyError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StrategyError> for std::process::ExitCode {
    fn from(err: &StrategyError) -> Self {
        let code: u8 = match err {
            StrategyError::Io(_) => 1,
            StrategyError::ConfigParse { .. }
            | StrategyError::ConfigMissing { .. }
            | StrategyError::ConfigInvalid { .. } => 2,
            StrategyError::Data { .. } | StrategyError::InvalidCandles { .. } => 3,
            StrategyError::MissingInformative { .. } => 4,
            StrategyError::InvalidTrade { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
