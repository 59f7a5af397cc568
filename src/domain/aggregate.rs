//! Per-instrument aggregation of clarity across horizons.

use crate::domain::clarity::window_clarity;
use crate::domain::horizon::Horizon;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Clarity over one horizon, tagged with the window actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonScore {
    pub horizon: Horizon,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub observations: usize,
    pub clarity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentClarity {
    pub instrument: String,
    /// Scored horizons, in configured order.
    pub horizons: Vec<HorizonScore>,
    /// Horizons whose window held fewer than two observations.
    pub skipped: Vec<Horizon>,
    pub total: f64,
}

impl InstrumentClarity {
    pub fn has_scores(&self) -> bool {
        !self.horizons.is_empty()
    }
}

pub fn aggregate_clarity(series: &PriceSeries, horizons: &[Horizon]) -> InstrumentClarity {
    let mut scored = Vec::with_capacity(horizons.len());
    let mut skipped = Vec::new();
    let mut total = 0.0;

    for horizon in horizons {
        let window = series.tail(horizon.sessions);
        let (first, last) = match (window.first(), window.last()) {
            (Some(first), Some(last)) if window.len() >= 2 => (first, last),
            _ => {
                debug!(
                    instrument = series.instrument(),
                    horizon = %horizon,
                    observations = window.len(),
                    "skipping horizon: not enough observations"
                );
                skipped.push(horizon.clone());
                continue;
            }
        };

        let clarity = window_clarity(window);
        debug!(
            instrument = series.instrument(),
            horizon = %horizon,
            start = %first.date,
            end = %last.date,
            clarity,
            "horizon scored"
        );
        total += clarity;
        scored.push(HorizonScore {
            horizon: horizon.clone(),
            start_date: first.date,
            end_date: last.date,
            observations: window.len(),
            clarity,
        });
    }

    if scored.is_empty() {
        warn!(
            instrument = series.instrument(),
            observations = series.len(),
            "no horizon could be scored; using neutral clarity"
        );
    }

    InstrumentClarity {
        instrument: series.instrument().to_string(),
        horizons: scored,
        skipped,
        total,
    }
}

/// Scores every series independently on the rayon pool. Output order
/// follows input order.
pub fn aggregate_universe(series: &[PriceSeries], horizons: &[Horizon]) -> Vec<InstrumentClarity> {
    series
        .par_iter()
        .map(|s| aggregate_clarity(s, horizons))
        .collect()
}
