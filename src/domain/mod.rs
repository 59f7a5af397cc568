//! Core scoring logic: clarity estimation, horizon aggregation, return
//! correlation, reweighting and ranking.

pub mod price_series;
pub mod horizon;
pub mod lookback;
pub mod clarity;
pub mod aggregate;
pub mod returns;
pub mod reweight;
pub mod ranking;
pub mod pipeline;
pub mod universe;
pub mod config_validation;
pub mod error;
