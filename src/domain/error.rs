//! Domain error types.
//!
//! Only the outer surfaces (configuration, price files, universe parsing)
//! fail. Missing data, undefined correlations and an unavailable reference
//! degrade inside the scoring pipeline and never surface here.

use crate::domain::universe::UniverseError;
use chrono::NaiveDate;

/// Top-level error type for trendrank.
#[derive(Debug, thiserror::Error)]
pub enum TrendrankError {
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

    #[error("price data error for {instrument}: {reason}")]
    PriceData { instrument: String, reason: String },

    #[error("duplicate date {date} in price series for {instrument}")]
    DuplicateDate { instrument: String, date: NaiveDate },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrendrankError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TrendrankError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn price_data(instrument: &str, reason: impl Into<String>) -> Self {
        TrendrankError::PriceData {
            instrument: instrument.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TrendrankError> for std::process::ExitCode {
    fn from(err: &TrendrankError) -> Self {
        let code: u8 = match err {
            TrendrankError::Io(_) => 1,
            TrendrankError::ConfigParse { .. }
            | TrendrankError::ConfigMissing { .. }
            | TrendrankError::ConfigInvalid { .. } => 2,
            TrendrankError::PriceData { .. } | TrendrankError::DuplicateDate { .. } => 3,
            TrendrankError::Universe(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
