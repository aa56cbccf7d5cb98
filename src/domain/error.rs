//! Domain error types.
//!
//! Optional data gaps never surface here; they travel as absence markers
//! and quality flags. Errors are reserved for broken stores, bad
//! configuration, and the one unscoreable condition: an empty central-bank
//! store.

/// Top-level error type for goldmon.
#[derive(Debug, thiserror::Error)]
pub enum GoldmonError {
    #[error("store error: {reason}")]
    Store { reason: String },

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

    #[error("no central bank record exists for any quarter")]
    MissingCentralBankData,

    #[error("central bank record for {quarter} already exists")]
    DuplicateQuarter { quarter: String },

    #[error("invalid quarter label {label:?} (expected e.g. Q1_2025)")]
    InvalidQuarter { label: String },

    #[error("no data for series {name}")]
    NoSeriesData { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&GoldmonError> for std::process::ExitCode {
    fn from(err: &GoldmonError) -> Self {
        let code: u8 = match err {
            GoldmonError::Io(_) => 1,
            GoldmonError::ConfigParse { .. }
            | GoldmonError::ConfigMissing { .. }
            | GoldmonError::ConfigInvalid { .. } => 2,
            GoldmonError::Store { .. } => 3,
            GoldmonError::MissingCentralBankData
            | GoldmonError::DuplicateQuarter { .. }
            | GoldmonError::InvalidQuarter { .. } => 4,
            GoldmonError::NoSeriesData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
