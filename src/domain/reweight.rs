//! Correlation-based reweighting of aggregated clarity against a reference.
//!
//! Each instrument's aggregated clarity is multiplied by the inverse of its
//! absolute monthly-return correlation to the reference instrument, so a
//! clean trend that moves independently of the reference is amplified while
//! one that mirrors the reference keeps its raw value.

use crate::domain::aggregate::InstrumentClarity;
use crate::domain::returns::ReturnCorrelationMatrix;
use tracing::{info, warn};

/// Thresholds for turning a correlation into an inverse weight.
///
/// The defaults are heuristics carried over unchanged and have not been
/// calibrated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReweightParams {
    /// |c| at or above this counts as the reference itself: weight 1.
    pub self_correlation_threshold: f64,
    /// |c| at or below this is treated as uncorrelated: weight `max_inverse`.
    pub min_correlation_threshold: f64,
    pub max_inverse: f64,
}

impl Default for ReweightParams {
    fn default() -> Self {
        Self {
            self_correlation_threshold: 0.99,
            min_correlation_threshold: 0.01,
            max_inverse: 100.0,
        }
    }
}

impl ReweightParams {
    pub fn inverse_weight(&self, correlation: f64) -> f64 {
        let magnitude = correlation.abs();
        if magnitude >= self.self_correlation_threshold {
            1.0
        } else if magnitude <= self.min_correlation_threshold {
            self.max_inverse
        } else {
            1.0 / magnitude
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedClarity {
    pub instrument: String,
    pub aggregated: f64,
    /// Correlation of monthly returns with the reference, when defined.
    pub correlation: Option<f64>,
    /// Weight applied; `None` when the instrument was left unweighted.
    pub inverse: Option<f64>,
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reweighting {
    pub reference: String,
    /// False when the reference had no monthly returns and nothing was reweighted.
    pub reference_available: bool,
    /// One entry per input instrument, in input order.
    pub entries: Vec<WeightedClarity>,
}

pub fn reweight(
    clarities: &[InstrumentClarity],
    matrix: &ReturnCorrelationMatrix,
    reference: &str,
    params: &ReweightParams,
) -> Reweighting {
    if !matrix.has_returns(reference) {
        warn!(
            reference,
            "reference has no monthly returns; skipping reweighting"
        );
        let entries = clarities
            .iter()
            .map(|c| WeightedClarity {
                instrument: c.instrument.clone(),
                aggregated: c.total,
                correlation: None,
                inverse: None,
                weighted: c.total,
            })
            .collect();
        return Reweighting {
            reference: reference.to_string(),
            reference_available: false,
            entries,
        };
    }

    let entries = clarities
        .iter()
        .map(|c| {
            let correlation = matrix.correlation(reference, &c.instrument);
            let inverse = if c.instrument == reference {
                Some(1.0)
            } else {
                correlation.map(|r| params.inverse_weight(r))
            };
            if inverse.is_none() {
                warn!(
                    instrument = %c.instrument,
                    reference,
                    "correlation with reference undefined; leaving clarity unweighted"
                );
            }
            WeightedClarity {
                instrument: c.instrument.clone(),
                aggregated: c.total,
                correlation,
                inverse,
                weighted: c.total * inverse.unwrap_or(1.0),
            }
        })
        .collect::<Vec<_>>();

    info!(
        reference,
        weighted = entries.iter().filter(|e| e.inverse.is_some()).count(),
        total = entries.len(),
        "reweighted clarity"
    );

    Reweighting {
        reference: reference.to_string(),
        reference_available: true,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_series::{PricePoint, PriceSeries};
    use approx::assert_abs_diff_eq;
    use chrono::{Months, NaiveDate};

    fn monthly_series(instrument: &str, prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 20).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                PricePoint::new(start.checked_add_months(Months::new(i as u32)).unwrap(), p)
            })
            .collect();
        PriceSeries::new(instrument, points).unwrap()
    }

    fn clarity(instrument: &str, total: f64) -> InstrumentClarity {
        InstrumentClarity {
            instrument: instrument.to_string(),
            horizons: Vec::new(),
            skipped: Vec::new(),
            total,
        }
    }

    #[test]
    fn inverse_weight_boundaries() {
        let params = ReweightParams::default();
        assert_eq!(params.inverse_weight(0.99), 1.0);
        assert_eq!(params.inverse_weight(-0.995), 1.0);
        assert_eq!(params.inverse_weight(1.0), 1.0);
        assert_eq!(params.inverse_weight(0.01), 100.0);
        assert_eq!(params.inverse_weight(-0.005), 100.0);
        assert_eq!(params.inverse_weight(0.0), 100.0);
        assert_abs_diff_eq!(params.inverse_weight(0.5), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(params.inverse_weight(-0.25), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_weight_respects_custom_params() {
        let params = ReweightParams {
            self_correlation_threshold: 0.9,
            min_correlation_threshold: 0.1,
            max_inverse: 10.0,
        };
        assert_eq!(params.inverse_weight(0.95), 1.0);
        assert_eq!(params.inverse_weight(0.05), 10.0);
        assert_abs_diff_eq!(params.inverse_weight(0.2), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn reference_against_itself_gets_unit_weight() {
        let r = monthly_series("REF", &[100.0, 103.0, 101.0, 106.0, 104.0]);
        let matrix = ReturnCorrelationMatrix::from_series(&[r]);
        let result = reweight(
            &[clarity("REF", 2.5)],
            &matrix,
            "REF",
            &ReweightParams::default(),
        );

        assert!(result.reference_available);
        let entry = &result.entries[0];
        assert_eq!(entry.inverse, Some(1.0));
        assert_eq!(entry.weighted, 2.5);
    }

    #[test]
    fn missing_reference_skips_reweighting_wholesale() {
        let a = monthly_series("A", &[100.0, 103.0, 101.0, 106.0]);
        let matrix = ReturnCorrelationMatrix::from_series(&[a]);
        let result = reweight(
            &[clarity("A", 1.5), clarity("B", -0.5)],
            &matrix,
            "REF",
            &ReweightParams::default(),
        );

        assert!(!result.reference_available);
        assert_eq!(result.entries[0].weighted, 1.5);
        assert_eq!(result.entries[1].weighted, -0.5);
        assert!(result.entries.iter().all(|e| e.inverse.is_none()));
    }

    #[test]
    fn undefined_correlation_leaves_single_instrument_unweighted() {
        let r = monthly_series("REF", &[100.0, 103.0, 101.0, 106.0]);
        let flat = monthly_series("FLAT", &[10.0; 4]);
        let partial = monthly_series("HALF", &[10.0, 11.0, 12.0, 11.0]);
        let matrix = ReturnCorrelationMatrix::from_series(&[r, flat, partial]);

        let result = reweight(
            &[clarity("FLAT", 0.0), clarity("HALF", 1.0), clarity("GONE", 0.7)],
            &matrix,
            "REF",
            &ReweightParams::default(),
        );

        assert!(result.reference_available);
        assert_eq!(result.entries[0].correlation, None);
        assert_eq!(result.entries[0].weighted, 0.0);
        assert!(result.entries[1].inverse.is_some());
        assert_eq!(result.entries[2].inverse, None);
        assert_eq!(result.entries[2].weighted, 0.7);
    }

    #[test]
    fn perfectly_correlated_instrument_keeps_raw_clarity() {
        let r = monthly_series("REF", &[100.0, 110.0, 99.0, 108.9, 98.01]);
        let twin = monthly_series("TWIN", &[50.0, 55.0, 49.5, 54.45, 49.005]);
        let matrix = ReturnCorrelationMatrix::from_series(&[r, twin]);

        let result = reweight(
            &[clarity("TWIN", 2.0)],
            &matrix,
            "REF",
            &ReweightParams::default(),
        );
        let entry = &result.entries[0];
        assert_abs_diff_eq!(entry.correlation.unwrap(), 1.0, epsilon = 1e-9);
        assert_eq!(entry.inverse, Some(1.0));
        assert_eq!(entry.weighted, 2.0);
    }

    #[test]
    fn negative_clarity_is_scaled_by_inverse() {
        let r = monthly_series("REF", &[100.0, 104.0, 102.0, 107.0, 105.0, 109.0]);
        let other = monthly_series("OTH", &[100.0, 101.0, 103.0, 102.0, 105.0, 104.0]);
        let matrix = ReturnCorrelationMatrix::from_series(&[r, other]);

        let c = matrix.correlation("REF", "OTH").unwrap();
        let params = ReweightParams::default();
        let result = reweight(&[clarity("OTH", -1.0)], &matrix, "REF", &params);

        assert_abs_diff_eq!(
            result.entries[0].weighted,
            -params.inverse_weight(c),
            epsilon = 1e-12
        );
    }
}
