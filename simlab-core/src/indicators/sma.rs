//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;
use crate::domain::PricePoint;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// `period` is clamped to at least 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Values at the second-to-last and last point, reading only the
    /// trailing `period + 1` closes. `None` until both are defined.
    pub fn last_two(&self, points: &[PricePoint]) -> Option<(f64, f64)> {
        let n = points.len();
        if n < self.period + 1 {
            return None;
        }
        let mean = |window: &[PricePoint]| {
            window.iter().map(|p| p.close).sum::<f64>() / self.period as f64
        };
        Some((
            mean(&points[n - 1 - self.period..n - 1]),
            mean(&points[n - self.period..]),
        ))
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        let n = points.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        let mut sum: f64 = points.iter().take(self.period).map(|p| p.close).sum();
        result[self.period - 1] = sum / self.period as f64;

        for i in self.period..n {
            sum += points[i].close - points[i - self.period].close;
            result[i] = sum / self.period as f64;
        }

        result
    }
}
