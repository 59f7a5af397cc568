//! Trend clarity of a price window.
//!
//! Fits an ordinary least-squares line through `(position, ln(price))` and
//! scores the window as `sign(slope) * R²`. Log prices turn steady
//! compounding into a straight line, so R² measures how cleanly the window
//! trends and the slope sign gives the direction.
//!
//! Score range: [-1, 1]. A window with fewer than two usable prices scores 0.

use crate::domain::price_series::PricePoint;

/// Result of the log-linear least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLinearFit {
    /// Change in log price per observation.
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, clamped into [0, 1].
    pub r_squared: f64,
    pub observations: usize,
}

impl LogLinearFit {
    pub fn clarity(&self) -> f64 {
        let sign = if self.slope > 0.0 {
            1.0
        } else if self.slope < 0.0 {
            -1.0
        } else {
            0.0
        };
        sign * self.r_squared
    }
}

/// Fits ln(price) against sequence position.
///
/// Non-positive and non-finite prices are dropped before positions are
/// assigned, so positions are always `0..n`. Returns `None` when fewer than
/// two usable prices remain.
pub fn fit_log_linear(prices: &[f64]) -> Option<LogLinearFit> {
    let log_prices: Vec<f64> = prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(f64::ln)
        .collect();

    let n = log_prices.len();
    if n < 2 {
        return None;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = log_prices.iter().sum::<f64>() / n as f64;

    // Constant log price: no trend and no variance to explain.
    if log_prices.iter().all(|&y| y == log_prices[0]) {
        return Some(LogLinearFit {
            slope: 0.0,
            intercept: log_prices[0],
            r_squared: 0.0,
            observations: n,
        });
    }

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, &y) in log_prices.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, &y) in log_prices.iter().enumerate() {
        let predicted = intercept + slope * i as f64;
        ss_res += (y - predicted).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }

    let r_squared = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(LogLinearFit {
        slope,
        intercept,
        r_squared,
        observations: n,
    })
}

/// Signed trend clarity of a raw price slice.
pub fn trend_clarity(prices: &[f64]) -> f64 {
    fit_log_linear(prices).map_or(0.0, |fit| fit.clarity())
}

/// Signed trend clarity of a window of dated points.
pub fn window_clarity(window: &[PricePoint]) -> f64 {
    let prices: Vec<f64> = window.iter().map(|p| p.price).collect();
    trend_clarity(&prices)
}
