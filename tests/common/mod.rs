#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use trendrank::domain::error::TrendrankError;
use trendrank::domain::lookback::LookbackPeriod;
pub use trendrank::domain::price_series::{PricePoint, PriceSeries};
use trendrank::ports::price_port::PricePort;

pub struct MockPricePort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.data.insert(series.instrument().to_string(), series);
        self
    }

    pub fn with_error(mut self, instrument: &str, reason: &str) -> Self {
        self.errors
            .insert(instrument.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_daily_prices(
        &self,
        instrument: &str,
        _lookback: LookbackPeriod,
    ) -> Result<PriceSeries, TrendrankError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(TrendrankError::PriceData {
                instrument: instrument.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(instrument)
            .cloned()
            .unwrap_or_else(|| PriceSeries::empty(instrument)))
    }

    fn list_instruments(&self) -> Result<Vec<String>, TrendrankError> {
        let mut names: Vec<_> = self.data.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendrankError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(TrendrankError::PriceData {
                instrument: instrument.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(instrument).and_then(|s| {
            Some((s.first_date()?, s.last_date()?, s.len()))
        }))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days from 2024-01-01, one price per day.
pub fn daily_series(instrument: &str, prices: &[f64]) -> PriceSeries {
    let start = date(2024, 1, 1);
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(start + Days::new(i as u64), p))
        .collect();
    PriceSeries::new(instrument, points).unwrap()
}

/// `n` prices following `start * exp(log_slope * i)`.
pub fn log_linear(start: f64, log_slope: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| start * (log_slope * i as f64).exp())
        .collect()
}

/// Daily prices whose month-end closes follow `monthly_returns`.
///
/// Each month gets 21 daily points; prices are flat within a month and jump
/// on the first point of the next month, so month-over-month returns match
/// the input exactly.
pub fn series_with_monthly_returns(
    instrument: &str,
    start_price: f64,
    monthly_returns: &[f64],
) -> PriceSeries {
    let mut prices = Vec::new();
    let mut dates = Vec::new();
    let mut price = start_price;

    for (month, r) in std::iter::once(&0.0).chain(monthly_returns).enumerate() {
        price *= 1.0 + r;
        let first = date(2023, 1, 1)
            .checked_add_months(chrono::Months::new(month as u32))
            .unwrap();
        for day in 0..21u64 {
            dates.push(first + Days::new(day));
            prices.push(price);
        }
    }

    let points = dates
        .into_iter()
        .zip(prices)
        .map(|(d, p)| PricePoint::new(d, p))
        .collect();
    PriceSeries::new(instrument, points).unwrap()
}
