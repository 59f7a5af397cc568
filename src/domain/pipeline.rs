//! Two-phase ranking pipeline.
//!
//! Phase 1 scores every instrument's horizons independently (parallel).
//! Phase 2 waits for all series, builds the monthly return correlation
//! matrix, reweights against the reference and ranks.

use crate::domain::aggregate::{aggregate_universe, InstrumentClarity};
use crate::domain::horizon::{default_horizons, Horizon};
use crate::domain::price_series::PriceSeries;
use crate::domain::ranking::{rank, RankedEntry};
use crate::domain::returns::ReturnCorrelationMatrix;
use crate::domain::reweight::{reweight, ReweightParams};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Ranking universe; order defines the tie-break.
    pub instruments: Vec<String>,
    pub reference: String,
    pub horizons: Vec<Horizon>,
    pub reweight: ReweightParams,
}

impl RankingConfig {
    pub fn new(instruments: Vec<String>, reference: impl Into<String>) -> Self {
        Self {
            instruments,
            reference: reference.into(),
            horizons: default_horizons(),
            reweight: ReweightParams::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankingReport {
    pub reference: String,
    pub reference_available: bool,
    /// Per-instrument horizon diagnostics, in configured instrument order.
    pub clarities: Vec<InstrumentClarity>,
    pub ranking: Vec<RankedEntry>,
}

impl RankingReport {
    pub fn entry(&self, instrument: &str) -> Option<&RankedEntry> {
        self.ranking.iter().find(|e| e.instrument == instrument)
    }

    pub fn clarity(&self, instrument: &str) -> Option<&InstrumentClarity> {
        self.clarities.iter().find(|c| c.instrument == instrument)
    }
}

/// Ranks the configured universe. Instruments without a series in `prices`
/// are scored as empty and still ranked.
pub fn run(prices: &HashMap<String, PriceSeries>, config: &RankingConfig) -> RankingReport {
    let universe: Vec<PriceSeries> = config
        .instruments
        .iter()
        .map(|instrument| match prices.get(instrument) {
            Some(series) => series.clone(),
            None => {
                warn!(instrument = %instrument, "no price series supplied");
                PriceSeries::empty(instrument.as_str())
            }
        })
        .collect();

    info!(
        instruments = universe.len(),
        horizons = config.horizons.len(),
        "scoring horizons"
    );
    let clarities = aggregate_universe(&universe, &config.horizons);

    info!(reference = %config.reference, "computing monthly return correlations");
    let matrix = ReturnCorrelationMatrix::from_series(&universe);
    let weighting = reweight(&clarities, &matrix, &config.reference, &config.reweight);
    let ranking = rank(&weighting.entries);

    RankingReport {
        reference: weighting.reference,
        reference_available: weighting.reference_available,
        clarities,
        ranking,
    }
}
