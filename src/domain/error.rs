//! Domain error types.

/// Top-level error type for stocksignal.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("empty bar sequence: at least one bar is required")]
    EmptyBars,

    #[error("bar dates not strictly ascending at index {index}: {previous} then {current}")]
    NonMonotonicDates {
        index: usize,
        previous: String,
        current: String,
    },

    #[error("invalid bar at index {index} ({date}): {reason}")]
    InvalidBar {
        index: usize,
        date: String,
        reason: String,
    },

    #[error("invalid backtest config: {reason}")]
    InvalidBacktestConfig { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    /// Process exit status for this error class.
    pub fn exit_status(&self) -> u8 {
        match self {
            SignalError::Io(_) | SignalError::Json(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigInvalid { .. }
            | SignalError::InvalidBacktestConfig { .. } => 2,
            SignalError::Data { .. } => 3,
            SignalError::EmptyBars
            | SignalError::NonMonotonicDates { .. }
            | SignalError::InvalidBar { .. } => 4,
            SignalError::NoData { .. } => 5,
        }
    }
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
