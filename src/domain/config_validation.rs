//! Configuration validation.
//!
//! Checks every recognised key before any price data is loaded so a bad
//! config fails fast with the offending section and key.

use crate::domain::error::TrendrankError;
use crate::domain::horizon::{default_horizons, parse_horizons, Horizon};
use crate::domain::lookback::{LookbackParseError, LookbackPeriod};
use crate::domain::reweight::ReweightParams;
use crate::domain::universe::{parse_instruments, Universe, DEFAULT_REFERENCE};
use crate::ports::config_port::ConfigPort;

pub const REPORT_FORMATS: [&str; 2] = ["text", "csv"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TrendrankError> {
    validate_scoring_config(config)?;
    validate_universe(config)
}

/// Every check except `[universe]`, which command-line overrides may replace.
pub fn validate_scoring_config(config: &dyn ConfigPort) -> Result<(), TrendrankError> {
    validate_lookback(config)?;
    validate_horizons(config)?;
    validate_reweight(config)?;
    validate_report_format(config)?;
    Ok(())
}

/// Reads an optional float, rejecting values that are present but unparseable.
pub fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, TrendrankError> {
    if !config.has(section, key) {
        return Ok(default);
    }
    let value = config.get_double(section, key, f64::NAN);
    if value.is_finite() {
        Ok(value)
    } else {
        let raw = config.get_string(section, key).unwrap_or_default();
        Err(TrendrankError::invalid(
            section,
            key,
            format!("'{}' is not a number", raw.trim()),
        ))
    }
}

pub fn read_lookback(config: &dyn ConfigPort) -> Result<LookbackPeriod, TrendrankError> {
    match config.get_string("data", "lookback") {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse()
            .map_err(|e: LookbackParseError| {
                TrendrankError::invalid("data", "lookback", e.to_string())
            }),
        _ => Ok(LookbackPeriod::default()),
    }
}

pub fn read_universe(config: &dyn ConfigPort) -> Result<Universe, TrendrankError> {
    let reference = config
        .get_string("universe", "reference")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REFERENCE.to_string());

    match config.get_string("universe", "instruments") {
        Some(list) if !list.trim().is_empty() => {
            Ok(Universe::new(parse_instruments(&list)?, &reference)?)
        }
        _ => Ok(Universe::new(Universe::default().instruments, &reference)?),
    }
}

pub fn read_horizons(config: &dyn ConfigPort) -> Result<Vec<Horizon>, TrendrankError> {
    match config.get_string("horizons", "windows") {
        Some(raw) if !raw.trim().is_empty() => parse_horizons(&raw)
            .map_err(|e| TrendrankError::invalid("horizons", "windows", e.to_string())),
        _ => Ok(default_horizons()),
    }
}

pub fn read_reweight_params(config: &dyn ConfigPort) -> Result<ReweightParams, TrendrankError> {
    let defaults = ReweightParams::default();
    Ok(ReweightParams {
        self_correlation_threshold: read_double(
            config,
            "reweight",
            "self_correlation_threshold",
            defaults.self_correlation_threshold,
        )?,
        min_correlation_threshold: read_double(
            config,
            "reweight",
            "min_correlation_threshold",
            defaults.min_correlation_threshold,
        )?,
        max_inverse: read_double(config, "reweight", "max_inverse", defaults.max_inverse)?,
    })
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), TrendrankError> {
    read_lookback(config).map(|_| ())
}

fn validate_universe(config: &dyn ConfigPort) -> Result<(), TrendrankError> {
    read_universe(config).map(|_| ())
}

fn validate_horizons(config: &dyn ConfigPort) -> Result<(), TrendrankError> {
    read_horizons(config).map(|_| ())
}

fn validate_reweight(config: &dyn ConfigPort) -> Result<(), TrendrankError> {
    let params = read_reweight_params(config)?;

    let upper = params.self_correlation_threshold;
    if upper <= 0.0 || upper > 1.0 {
        return Err(TrendrankError::invalid(
            "reweight",
            "self_correlation_threshold",
            "must be in (0, 1]",
        ));
    }

    let lower = params.min_correlation_threshold;
    if lower <= 0.0 || lower >= upper {
        return Err(TrendrankError::invalid(
            "reweight",
            "min_correlation_threshold",
            "must be positive and below self_correlation_threshold",
        ));
    }

    if params.max_inverse < 1.0 {
        return Err(TrendrankError::invalid(
            "reweight",
            "max_inverse",
            "must be at least 1",
        ));
    }
    Ok(())
}

fn validate_report_format(config: &dyn ConfigPort) -> Result<(), TrendrankError> {
    match config.get_string("report", "format") {
        Some(f) if !f.trim().is_empty() => {
            let f = f.trim().to_lowercase();
            if REPORT_FORMATS.contains(&f.as_str()) {
                Ok(())
            } else {
                Err(TrendrankError::invalid(
                    "report",
                    "format",
                    format!("unknown format '{f}' (expected text or csv)"),
                ))
            }
        }
        _ => Ok(()),
    }
}
