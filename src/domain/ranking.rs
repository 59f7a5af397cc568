//! Final ordering of weighted clarity.
//!
//! Scores sort descending. Equal scores keep the order in which instruments
//! were configured; that stable order is the tie-break. NaN scores sort last.

use crate::domain::reweight::WeightedClarity;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// 1-based position.
    pub rank: usize,
    pub instrument: String,
    pub score: f64,
    pub aggregated: f64,
    pub inverse: Option<f64>,
    pub correlation: Option<f64>,
}

pub fn rank(entries: &[WeightedClarity]) -> Vec<RankedEntry> {
    let mut ordered: Vec<&WeightedClarity> = entries.iter().collect();
    ordered.sort_by(|a, b| descending(a.weighted, b.weighted));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, e)| RankedEntry {
            rank: i + 1,
            instrument: e.instrument.clone(),
            score: e.weighted,
            aggregated: e.aggregated,
            inverse: e.inverse,
            correlation: e.correlation,
        })
        .collect()
}

/// Total descending order with NaN last; -0.0 and 0.0 compare equal.
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
