//! Plain-text console report.

use crate::domain::error::TrendrankError;
use crate::domain::pipeline::RankingReport;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDateTime;
use std::io::Write;

const RULE_WIDTH: usize = 64;

pub struct TextReport {
    pub show_horizons: bool,
    pub generated_at: NaiveDateTime,
}

impl TextReport {
    pub fn now(show_horizons: bool) -> Self {
        Self {
            show_horizons,
            generated_at: chrono::Local::now().naive_local(),
        }
    }

    fn write_horizons(report: &RankingReport, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "Trend clarity by horizon")?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        for clarity in &report.clarities {
            if !clarity.has_scores() {
                writeln!(out, "{:<5} insufficient data", clarity.instrument)?;
                continue;
            }
            for score in &clarity.horizons {
                writeln!(
                    out,
                    "{:<5} {:>4} ({} - {}, {:>3} obs) clarity = {:>6.3}",
                    clarity.instrument,
                    score.horizon.label,
                    score.start_date,
                    score.end_date,
                    score.observations,
                    score.clarity,
                )?;
            }
            for horizon in &clarity.skipped {
                writeln!(out, "{:<5} {:>4} skipped: not enough data", clarity.instrument, horizon.label)?;
            }
        }
        writeln!(out)
    }
}

impl ReportPort for TextReport {
    fn write(&self, report: &RankingReport, out: &mut dyn Write) -> Result<(), TrendrankError> {
        if self.show_horizons {
            Self::write_horizons(report, out)?;
        }

        writeln!(
            out,
            "Weighted trend clarity ranking (reference {}, calculated {})",
            report.reference,
            self.generated_at.format("%Y-%m-%d %H:%M:%S"),
        )?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        if !report.reference_available {
            writeln!(
                out,
                "note: no monthly returns for {}; scores are unweighted",
                report.reference
            )?;
        }

        for entry in &report.ranking {
            let corr = match entry.correlation {
                Some(c) => format!("(corr with {}: {:.3})", report.reference, c),
                None => "(corr: N/A)".to_string(),
            };
            writeln!(
                out,
                "Rank {}: {:<5} - weighted clarity = {:>7.3} {}",
                entry.rank, entry.instrument, entry.score, corr
            )?;
        }

        Ok(())
    }
}
