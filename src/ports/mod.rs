//! Port traits for price retrieval, configuration and report output.

pub mod config_port;
pub mod price_port;
pub mod report_port;
