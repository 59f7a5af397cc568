//! Report output port.

use crate::domain::error::TrendrankError;
use crate::domain::pipeline::RankingReport;
use std::io::Write;

/// Renders a finished ranking to a byte sink.
pub trait ReportPort {
    fn write(&self, report: &RankingReport, out: &mut dyn Write) -> Result<(), TrendrankError>;

    /// Renders into a string; used for tests and small outputs.
    fn render(&self, report: &RankingReport) -> Result<String, TrendrankError> {
        let mut buf = Vec::new();
        self.write(report, &mut buf)?;
        String::from_utf8(buf).map_err(|e| TrendrankError::Io(std::io::Error::other(e)))
    }
}
