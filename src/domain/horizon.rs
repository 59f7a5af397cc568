//! Look-back horizons measured in trading sessions.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Horizon {
    pub label: String,
    pub sessions: usize,
}

impl Horizon {
    pub fn new(label: impl Into<String>, sessions: usize) -> Self {
        Self {
            label: label.into(),
            sessions,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Approximate trading sessions per calendar month.
pub const SESSIONS_PER_MONTH: usize = 21;

pub const DEFAULT_HORIZONS: [(&str, usize); 5] = [
    ("1mo", SESSIONS_PER_MONTH),
    ("2mo", 2 * SESSIONS_PER_MONTH),
    ("3mo", 3 * SESSIONS_PER_MONTH),
    ("6mo", 6 * SESSIONS_PER_MONTH),
    ("12mo", 12 * SESSIONS_PER_MONTH),
];

pub fn default_horizons() -> Vec<Horizon> {
    DEFAULT_HORIZONS
        .iter()
        .map(|&(label, sessions)| Horizon::new(label, sessions))
        .collect()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HorizonParseError {
    #[error("empty horizon entry")]
    EmptyEntry,

    #[error("horizon '{0}' must be written as label:sessions")]
    MissingSessions(String),

    #[error("horizon '{label}' has invalid session count '{value}'")]
    InvalidSessions { label: String, value: String },

    #[error("horizon '{0}' must span at least 2 sessions")]
    TooShort(String),

    #[error("duplicate horizon label: {0}")]
    DuplicateLabel(String),
}

/// Parses `1mo:21, 3mo:63` into horizons, preserving order.
pub fn parse_horizons(input: &str) -> Result<Vec<Horizon>, HorizonParseError> {
    let mut horizons: Vec<Horizon> = Vec::new();

    for entry in input.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(HorizonParseError::EmptyEntry);
        }

        let (label, sessions) = entry
            .split_once(':')
            .ok_or_else(|| HorizonParseError::MissingSessions(entry.to_string()))?;
        let label = label.trim();
        let sessions = sessions.trim();
        if label.is_empty() {
            return Err(HorizonParseError::EmptyEntry);
        }

        let count: usize = sessions
            .parse()
            .map_err(|_| HorizonParseError::InvalidSessions {
                label: label.to_string(),
                value: sessions.to_string(),
            })?;
        if count < 2 {
            return Err(HorizonParseError::TooShort(label.to_string()));
        }
        if horizons.iter().any(|h| h.label == label) {
            return Err(HorizonParseError::DuplicateLabel(label.to_string()));
        }

        horizons.push(Horizon::new(label, count));
    }

    Ok(horizons)
}
