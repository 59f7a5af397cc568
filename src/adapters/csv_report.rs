//! CSV ranking export.

use crate::domain::error::TrendrankError;
use crate::domain::pipeline::RankingReport;
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub const HEADER: [&str; 6] = [
    "rank",
    "instrument",
    "aggregated_clarity",
    "inverse_weight",
    "weighted_clarity",
    "correlation",
];

pub struct CsvReport;

fn opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn csv_err(e: csv::Error) -> TrendrankError {
    TrendrankError::Io(std::io::Error::other(e))
}

impl ReportPort for CsvReport {
    fn write(&self, report: &RankingReport, out: &mut dyn Write) -> Result<(), TrendrankError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(HEADER).map_err(csv_err)?;

        for entry in &report.ranking {
            wtr.write_record([
                entry.rank.to_string(),
                entry.instrument.clone(),
                format!("{:.6}", entry.aggregated),
                opt(entry.inverse),
                format!("{:.6}", entry.score),
                opt(entry.correlation),
            ])
            .map_err(csv_err)?;
        }

        wtr.flush()?;
        Ok(())
    }
}
