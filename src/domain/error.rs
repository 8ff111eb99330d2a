//! Domain error types.

/// Top-level error type for maplescan.
#[derive(Debug, thiserror::Error)]
pub enum MaplescanError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error("indicator column {column} not present in feed")]
    MissingIndicator { column: String },

    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MaplescanError> for std::process::ExitCode {
    fn from(err: &MaplescanError) -> Self {
        let code: u8 = match err {
            MaplescanError::Io(_) => 1,
            MaplescanError::ConfigParse { .. }
            | MaplescanError::ConfigMissing { .. }
            | MaplescanError::ConfigInvalid { .. } => 2,
            MaplescanError::Database { .. } | MaplescanError::DatabaseQuery { .. } => 3,
            MaplescanError::MissingIndicator { .. } => 4,
            MaplescanError::NoData { .. } | MaplescanError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
