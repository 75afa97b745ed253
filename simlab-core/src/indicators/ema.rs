//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[period-1] = SMA of first `period` close values.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::PricePoint;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    /// `period` is clamped to at least 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Values at the second-to-last and last point, folded in one pass
    /// without allocating. Identical to the tail of [`Indicator::compute`].
    pub fn last_two(&self, points: &[PricePoint]) -> Option<(f64, f64)> {
        let n = points.len();
        if n < self.period + 1 {
            return None;
        }
        let alpha = 2.0 / (self.period as f64 + 1.0);
        let seed = points.iter().take(self.period).map(|p| p.close).sum::<f64>()
            / self.period as f64;

        let mut prev = seed;
        let mut before = seed;
        for point in &points[self.period..] {
            before = prev;
            prev = alpha * point.close + (1.0 - alpha) * prev;
        }
        Some((before, prev))
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, points: &[PricePoint]) -> Vec<f64> {
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// EMA over an arbitrary slice of values.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let seed = values.iter().take(period).sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
