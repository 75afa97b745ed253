//! Step-by-step simulation loop — the heart of the backtesting engine.
//!
//! Per step `i`:
//! 1. Visible history: the prefix `points[..=i]` (no look-ahead possible)
//! 2. Strategy: `signals(history, position)`
//! 3. Execution: apply each signal in order at `points[i].close`;
//!    rejected signals are recorded as skipped and the step continues
//! 4. Accounting: record equity at `points[i].close`

use crate::domain::{PricePoint, PriceSeries, Signal, Trade};
use crate::strategy::Strategy;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::state::{EngineConfig, EngineState, ExecutionError};

/// A signal the engine dropped, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSignal {
    pub step_index: usize,
    pub signal: Signal,
    pub reason: ExecutionError,
}

/// Raw output of one simulation.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Equity at each step's close; one entry per point.
    pub equity_curve: Vec<f64>,
    /// Executed fills in order.
    pub trades: Vec<Trade>,
    /// Signals rejected by the engine.
    pub skipped_signals: Vec<SkippedSignal>,
    /// Total signals emitted by the strategy.
    pub signal_count: usize,
}

impl SimulationResult {
    pub fn step_count(&self) -> usize {
        self.equity_curve.len()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().copied()
    }
}

/// Run `strategy` over `series` from a fresh engine state.
///
/// Deterministic for a deterministic strategy. An empty series yields an
/// empty result; rejecting empty input is the caller's concern.
pub fn simulate(
    series: &PriceSeries,
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> SimulationResult {
    simulate_points(series.points(), strategy, config)
}

pub(crate) fn simulate_points(
    points: &[PricePoint],
    strategy: &dyn Strategy,
    config: &EngineConfig,
) -> SimulationResult {
    let mut state = EngineState::new(config);
    let mut skipped_signals = Vec::new();
    let mut signal_count = 0;

    for (i, point) in points.iter().enumerate() {
        let history = &points[..=i];
        let price = point.close;

        let signals = strategy.signals(history, state.position().quantity);
        signal_count += signals.len();

        for signal in signals {
            if let Err(reason) = state.apply_signal(&signal, price) {
                debug!(
                    "{}: step {i} ({}) dropped {} {}: {reason}",
                    strategy.name(),
                    point.date,
                    signal.side,
                    signal.quantity
                );
                skipped_signals.push(SkippedSignal {
                    step_index: i,
                    signal,
                    reason,
                });
            }
        }

        state.record_equity(price);
    }

    if !skipped_signals.is_empty() {
        warn!(
            "{}: {} of {signal_count} signals skipped",
            strategy.name(),
            skipped_signals.len()
        );
    }

    let (equity_curve, trades) = state.into_parts();
    SimulationResult {
        equity_curve,
        trades,
        skipped_signals,
        signal_count,
    }
}
