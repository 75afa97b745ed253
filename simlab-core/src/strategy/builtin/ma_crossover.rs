//! Moving average crossover.
//!
//! - Bullish cross (fast crosses above slow) while flat: buy a fixed lot
//! - Bearish cross (fast crosses below slow) while long: sell the whole position
//! - Otherwise: no signal

use crate::domain::{PricePoint, Signal, QUANTITY_EPSILON};
use crate::indicators::{Ema, Sma};
use crate::strategy::Strategy;

/// Default lot size for crossover entries.
pub const DEFAULT_LOT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaKind {
    Simple,
    Exponential,
}

#[derive(Debug, Clone)]
pub struct MaCrossover {
    kind: MaKind,
    fast_period: usize,
    slow_period: usize,
    lot: f64,
    name: String,
}

impl MaCrossover {
    pub fn new(kind: MaKind, fast_period: usize, slow_period: usize, lot: f64) -> Self {
        assert!(fast_period > 0, "fast_period must be > 0");
        assert!(slow_period > fast_period, "slow_period must be > fast_period");
        assert!(lot.is_finite() && lot > 0.0, "lot must be positive");
        let prefix = match kind {
            MaKind::Simple => "sma_cross",
            MaKind::Exponential => "ema_cross",
        };
        Self {
            kind,
            fast_period,
            slow_period,
            lot,
            name: format!("{prefix}_{fast_period}_{slow_period}"),
        }
    }

    /// EMA 12 / 26 with the default lot.
    pub fn ema_default() -> Self {
        Self::new(MaKind::Exponential, 12, 26, DEFAULT_LOT)
    }

    /// SMA 20 / 50 with the default lot.
    pub fn sma_default() -> Self {
        Self::new(MaKind::Simple, 20, 50, DEFAULT_LOT)
    }

    /// `(fast, slow)` at the previous and the current point.
    fn averages(&self, history: &[PricePoint]) -> Option<[(f64, f64); 2]> {
        let ((fast_prev, fast_now), (slow_prev, slow_now)) = match self.kind {
            MaKind::Simple => (
                Sma::new(self.fast_period).last_two(history)?,
                Sma::new(self.slow_period).last_two(history)?,
            ),
            MaKind::Exponential => (
                Ema::new(self.fast_period).last_two(history)?,
                Ema::new(self.slow_period).last_two(history)?,
            ),
        };
        Some([(fast_prev, slow_prev), (fast_now, slow_now)])
    }

    /// Some(true) on a bullish cross at the last point, Some(false) on a
    /// bearish cross, None otherwise.
    fn detect_cross(&self, history: &[PricePoint]) -> Option<bool> {
        let [(fast_prev, slow_prev), (fast_now, slow_now)] = self.averages(history)?;
        if [fast_now, slow_now, fast_prev, slow_prev]
            .iter()
            .any(|v| v.is_nan())
        {
            return None;
        }

        if fast_prev <= slow_prev && fast_now > slow_now {
            Some(true)
        } else if fast_prev >= slow_prev && fast_now < slow_now {
            Some(false)
        } else {
            None
        }
    }
}

impl Strategy for MaCrossover {
    fn signals(&self, history: &[PricePoint], position: f64) -> Vec<Signal> {
        match self.detect_cross(history) {
            Some(true) if position.abs() < QUANTITY_EPSILON => vec![Signal::buy(self.lot)],
            Some(false) if position >= QUANTITY_EPSILON => vec![Signal::sell(position)],
            _ => Vec::new(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
