//! CSV price-file adapter.
//!
//! One file per instrument, `<dir>/<INSTRUMENT>.csv`, with a header row
//! naming at least `date` and one of `adj_close` / `close`. Adjusted close is
//! preferred row by row; `close` fills in where it is blank. The look-back
//! window is measured back from the newest date in the file.

use crate::domain::error::TrendrankError;
use crate::domain::lookback::LookbackPeriod;
use crate::domain::price_series::{PricePoint, PriceSeries};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    adj_close: Option<usize>,
    close: Option<usize>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", instrument))
    }

    fn columns(instrument: &str, headers: &csv::StringRecord) -> Result<Columns, TrendrankError> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase().replace(' ', "_");
                names.contains(&h.as_str())
            })
        };

        let date = find(&["date"])
            .ok_or_else(|| TrendrankError::price_data(instrument, "missing date column"))?;
        let adj_close = find(&["adj_close", "adjclose", "adjusted_close"]);
        let close = find(&["close"]);
        if adj_close.is_none() && close.is_none() {
            return Err(TrendrankError::price_data(
                instrument,
                "missing close or adj_close column",
            ));
        }

        Ok(Columns {
            date,
            adj_close,
            close,
        })
    }

    fn read_all(&self, instrument: &str) -> Result<Vec<PricePoint>, TrendrankError> {
        let path = self.csv_path(instrument);
        let content = fs::read_to_string(&path).map_err(|e| {
            TrendrankError::price_data(
                instrument,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| TrendrankError::price_data(instrument, format!("CSV header error: {e}")))?
            .clone();
        let cols = Self::columns(instrument, &headers)?;

        let mut points = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result
                .map_err(|e| TrendrankError::price_data(instrument, format!("CSV parse error: {e}")))?;

            let date_str = record.get(cols.date).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TrendrankError::price_data(
                    instrument,
                    format!("invalid date '{}' on row {}: {}", date_str, line + 1, e),
                )
            })?;

            let parse = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .and_then(|s| s.parse::<f64>().ok())
            };

            match parse(cols.adj_close).or_else(|| parse(cols.close)) {
                Some(price) => points.push(PricePoint::new(date, price)),
                None => warn!(instrument, %date, "row has no usable price; skipping"),
            }
        }

        Ok(points)
    }
}

impl PricePort for CsvAdapter {
    fn fetch_daily_prices(
        &self,
        instrument: &str,
        lookback: LookbackPeriod,
    ) -> Result<PriceSeries, TrendrankError> {
        let points = self.read_all(instrument)?;
        let series = PriceSeries::new(instrument, points)?;

        let Some(end) = series.last_date() else {
            return Ok(series);
        };
        let start = lookback.start_from(end);
        let window: Vec<PricePoint> = series
            .points()
            .iter()
            .filter(|p| p.date > start)
            .copied()
            .collect();

        debug!(
            instrument,
            %start,
            %end,
            observations = window.len(),
            "loaded price file"
        );
        PriceSeries::new(instrument, window)
    }

    fn list_instruments(&self) -> Result<Vec<String>, TrendrankError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut instruments = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    instruments.push(stem.to_string_lossy().to_string());
                }
            }
        }

        instruments.sort();
        Ok(instruments)
    }

    fn data_range(
        &self,
        instrument: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TrendrankError> {
        if !self.csv_path(instrument).exists() {
            return Ok(None);
        }
        let series = PriceSeries::new(instrument, self.read_all(instrument)?)?;
        Ok(match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => Some((first, last, series.len())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::write(
            path.join("XLK.csv"),
            "date,open,close,adj_close\n\
             2024-01-17,1,210.0,209.0\n\
             2024-01-15,1,200.0,199.0\n\
             2024-01-16,1,205.0,\n",
        )
        .unwrap();
        fs::write(
            path.join("GLD.csv"),
            "Date,Close\n2023-01-02,180.0\n2023-06-01,190.0\n2024-01-02,200.0\n",
        )
        .unwrap();
        fs::write(path.join("EMPTY.csv"), "date,close\n").unwrap();
        fs::write(path.join("notes.txt"), "ignore me").unwrap();

        (dir, path)
    }

    #[test]
    fn prefers_adjusted_close_and_falls_back_to_close() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter
            .fetch_daily_prices("XLK", LookbackPeriod::default())
            .unwrap();
        let prices: Vec<_> = series.points().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![199.0, 205.0, 209.0]);
        assert_eq!(series.first_date(), Some(date(2024, 1, 15)));
    }

    #[test]
    fn close_only_file_with_capitalised_headers() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter
            .fetch_daily_prices("GLD", LookbackPeriod::Years(5))
            .unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn lookback_is_measured_from_latest_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter
            .fetch_daily_prices("GLD", LookbackPeriod::Years(1))
            .unwrap();
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2023, 6, 1), date(2024, 1, 2)]);
    }

    #[test]
    fn header_only_file_yields_empty_series() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter
            .fetch_daily_prices("EMPTY", LookbackPeriod::default())
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn missing_file_is_an_error_but_batch_degrades() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_daily_prices("NOPE", LookbackPeriod::default());
        assert!(matches!(result, Err(TrendrankError::PriceData { .. })));

        let batch = adapter.fetch_daily_prices_batch(
            &["XLK".to_string(), "NOPE".to_string()],
            LookbackPeriod::default(),
        );
        assert_eq!(batch["XLK"].len(), 3);
        assert!(batch["NOPE"].is_empty());
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("DUP.csv"),
            "date,close\n2024-01-02,10\n2024-01-02,11\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let result = adapter.fetch_daily_prices("DUP", LookbackPeriod::default());
        assert!(matches!(result, Err(TrendrankError::DuplicateDate { .. })));
    }

    #[test]
    fn invalid_date_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("BAD.csv"), "date,close\n01/02/2024,10\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let result = adapter.fetch_daily_prices("BAD", LookbackPeriod::default());
        assert!(matches!(result, Err(TrendrankError::PriceData { .. })));
    }

    #[test]
    fn missing_price_columns_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("VOL.csv"), "date,volume\n2024-01-02,100\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let result = adapter.fetch_daily_prices("VOL", LookbackPeriod::default());
        assert!(matches!(result, Err(TrendrankError::PriceData { .. })));
    }

    #[test]
    fn list_instruments_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert_eq!(adapter.list_instruments().unwrap(), vec!["EMPTY", "GLD", "XLK"]);
    }

    #[test]
    fn data_range_reports_full_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(
            adapter.data_range("GLD").unwrap(),
            Some((date(2023, 1, 2), date(2024, 1, 2), 3))
        );
        assert_eq!(adapter.data_range("EMPTY").unwrap(), None);
        assert_eq!(adapter.data_range("NOPE").unwrap(), None);
    }
}
