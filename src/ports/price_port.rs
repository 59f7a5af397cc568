//! Price retrieval port.

use crate::domain::error::TrendrankError;
use crate::domain::lookback::LookbackPeriod;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::warn;

pub trait PricePort {
    fn fetch_daily_prices(
        &self,
        instrument: &str,
        lookback: LookbackPeriod,
    ) -> Result<PriceSeries, TrendrankError>;

    /// Fetches every instrument. A failed fetch becomes an empty series so
    /// the ranking treats it as missing data.
    fn fetch_daily_prices_batch(
        &self,
        instruments: &[String],
        lookback: LookbackPeriod,
    ) -> HashMap<String, PriceSeries> {
        instruments
            .iter()
            .map(|instrument| {
                let series = self
                    .fetch_daily_prices(instrument, lookback)
                    .unwrap_or_else(|e| {
                        warn!(instrument = %instrument, error = %e, "price fetch failed");
                        PriceSeries::empty(instrument.as_str())
                    });
                (instrument.clone(), series)
            })
            .collect()
    }

    fn list_instruments(&self) -> Result<Vec<String>, TrendrankError>;

    /// First date, last date and observation count, if any data exists.
    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendrankError>;
}
