//! Instrument universe: parsing the configured symbol list and reference.

use std::collections::HashSet;

/// Sector and asset-class ETFs ranked when no list is configured.
pub const DEFAULT_INSTRUMENTS: [&str; 22] = [
    "XLK", "XLY", "XLV", "XLP", "XLB", "XLU", "XLI", "XLC", "XLRE", "XLF", "XLE", "BIZD", "TLT",
    "SPY", "SOXX", "QQQ", "GLD", "JEPI", "SHY", "XME", "LQD", "IEF",
];

pub const DEFAULT_REFERENCE: &str = "XLK";

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub instruments: Vec<String>,
    pub reference: String,
}

impl Universe {
    pub fn new(instruments: Vec<String>, reference: &str) -> Result<Self, UniverseError> {
        if instruments.is_empty() {
            return Err(UniverseError::Empty);
        }
        let reference = reference.trim().to_uppercase();
        if !instruments.contains(&reference) {
            return Err(UniverseError::ReferenceNotInUniverse(reference));
        }
        Ok(Self {
            instruments,
            reference,
        })
    }

    pub fn count(&self) -> usize {
        self.instruments.len()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            instruments: DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect(),
            reference: DEFAULT_REFERENCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in instrument list")]
    EmptyToken,

    #[error("duplicate instrument: {0}")]
    DuplicateInstrument(String),

    #[error("instrument list is empty")]
    Empty,

    #[error("reference instrument {0} is not part of the universe")]
    ReferenceNotInUniverse(String),
}

pub fn parse_instruments(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut instruments = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateInstrument(symbol));
        }
        instruments.push(symbol);
    }

    Ok(instruments)
}
