//! Domain error types.

use chrono::NaiveDate;

use crate::domain::universe::UniverseError;

/// Why an instrument's input series was rejected by the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedInput {
    #[error("{bars} price bars but {frames} indicator frames")]
    LengthMismatch { bars: usize, frames: usize },

    #[error("indicator frame dated {frame} is aligned with bar dated {bar}")]
    DateMismatch { bar: NaiveDate, frame: NaiveDate },

    #[error("date {date} does not follow {previous}")]
    NonIncreasingDate { previous: NaiveDate, date: NaiveDate },

    #[error("bar dated {date} has a missing or non-positive price")]
    BadPrice { date: NaiveDate },
}

/// Top-level error type for signalscan.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("data access error: {reason}")]
    Data { reason: String },

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

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("insufficient history for {code}: have {bars} bars, need {minimum}")]
    InsufficientHistory {
        code: String,
        bars: usize,
        minimum: usize,
    },

    #[error("malformed input for {code}: {source}")]
    Malformed {
        code: String,
        #[source]
        source: MalformedInput,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    pub fn malformed(code: &str, source: MalformedInput) -> Self {
        SignalError::Malformed {
            code: code.to_string(),
            source,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. }
            | SignalError::Universe(_) => 2,
            SignalError::Data { .. } => 3,
            SignalError::NoData { .. } | SignalError::InsufficientHistory { .. } => 5,
            SignalError::Malformed { .. } => 6,
        }
    }
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
