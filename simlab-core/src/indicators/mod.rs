//! Price indicators used by the built-in strategies.
//!
//! Indicators are pure functions: point history in, numeric series out.
//! Output has the same length as the input, with `f64::NAN` during warmup.
//!
//! # Look-ahead contamination guard
//! No indicator value at index t may depend on data from index t+1 or later.

pub mod ema;
pub mod sma;

pub use ema::{ema_of_series, Ema};
pub use sma::Sma;

use crate::domain::PricePoint;

pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "ema_12").
    fn name(&self) -> &str;

    /// Number of points needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole history.
    fn compute(&self, points: &[PricePoint]) -> Vec<f64>;
}

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
pub(crate) fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::from_close(base + chrono::Duration::days(i as i64), c))
        .collect()
}

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() < eps,
        "expected {expected}, got {actual}"
    );
}
