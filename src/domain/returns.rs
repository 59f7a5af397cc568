//! Month-over-month returns and pairwise return correlation.
//!
//! All series share one calendar-month grid spanning the earliest to the
//! latest month observed in any series. Each instrument's month-end value is
//! its last usable price on or before the end of that month, so quiet months
//! carry the previous value forward. Correlation between two instruments only
//! uses months where both have a defined return.

use crate::domain::price_series::PriceSeries;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Mean squared deviation below which a return sequence counts as constant.
const MIN_VARIANCE: f64 = 1e-18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub type MonthlyReturns = BTreeMap<YearMonth, f64>;

#[derive(Debug, Clone, Default)]
pub struct ReturnCorrelationMatrix {
    returns: HashMap<String, MonthlyReturns>,
}

impl ReturnCorrelationMatrix {
    pub fn from_series(series: &[PriceSeries]) -> Self {
        let month_ends: Vec<(&str, BTreeMap<YearMonth, f64>)> = series
            .iter()
            .map(|s| (s.instrument(), last_price_per_month(s)))
            .filter(|(_, by_month)| !by_month.is_empty())
            .collect();

        let first = month_ends
            .iter()
            .filter_map(|(_, m)| m.keys().next().copied())
            .min();
        let last = month_ends
            .iter()
            .filter_map(|(_, m)| m.keys().next_back().copied())
            .max();

        let months = match (first, last) {
            (Some(first), Some(last)) => month_grid(first, last),
            _ => Vec::new(),
        };

        let returns = month_ends
            .into_iter()
            .map(|(instrument, by_month)| {
                (instrument.to_string(), returns_on_grid(&months, &by_month))
            })
            .collect();

        Self { returns }
    }

    pub fn monthly_returns(&self, instrument: &str) -> Option<&MonthlyReturns> {
        self.returns.get(instrument)
    }

    /// At least one defined monthly return.
    pub fn has_returns(&self, instrument: &str) -> bool {
        self.returns
            .get(instrument)
            .is_some_and(|r| !r.is_empty())
    }

    /// Pearson correlation of monthly returns over the months both define.
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        let ra = self.returns.get(a)?;
        let rb = self.returns.get(b)?;

        let (xs, ys): (Vec<f64>, Vec<f64>) = ra
            .iter()
            .filter_map(|(month, &x)| rb.get(month).map(|&y| (x, y)))
            .unzip();

        pearson(&xs, &ys)
    }
}

/// Pearson correlation coefficient, clamped into [-1, 1].
///
/// `None` for fewer than two pairs, mismatched lengths, or a constant input.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx / n as f64 <= MIN_VARIANCE || syy / n as f64 <= MIN_VARIANCE {
        return None;
    }

    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn last_price_per_month(series: &PriceSeries) -> BTreeMap<YearMonth, f64> {
    let mut by_month = BTreeMap::new();
    for point in series.points().iter().filter(|p| p.is_usable()) {
        // Points are date-ordered, so the last insert per month wins.
        by_month.insert(YearMonth::of(point.date), point.price);
    }
    by_month
}

fn month_grid(first: YearMonth, last: YearMonth) -> Vec<YearMonth> {
    let mut months = Vec::new();
    let mut current = first;
    while current <= last {
        months.push(current);
        current = current.next();
    }
    months
}

fn returns_on_grid(months: &[YearMonth], by_month: &BTreeMap<YearMonth, f64>) -> MonthlyReturns {
    let mut returns = MonthlyReturns::new();
    let mut previous: Option<f64> = None;
    let mut carried: Option<f64> = None;

    for month in months {
        if let Some(&price) = by_month.get(month) {
            carried = Some(price);
        }
        if let (Some(prev), Some(cur)) = (previous, carried) {
            returns.insert(*month, cur / prev - 1.0);
        }
        previous = carried;
    }

    returns
}
