//! Batch runs — many independent backtests, optionally in parallel.
//!
//! Each job gets its own engine state. Series and strategies are shared
//! read-only through `Arc`, so jobs over the same data do not copy it.

use log::info;
use rayon::prelude::*;
use std::sync::Arc;

use simlab_core::domain::PriceSeries;
use simlab_core::strategy::StrategyRef;

use crate::result::BacktestResult;
use crate::runner::{run_backtest_with_settings, RunError, RunSettings};

/// One backtest to run.
#[derive(Clone)]
pub struct BatchJob {
    pub label: String,
    pub series: Arc<PriceSeries>,
    pub strategy: StrategyRef,
    pub settings: RunSettings,
}

impl BatchJob {
    pub fn new(
        label: impl Into<String>,
        series: Arc<PriceSeries>,
        strategy: StrategyRef,
        settings: RunSettings,
    ) -> Self {
        Self {
            label: label.into(),
            series,
            strategy,
            settings,
        }
    }

    fn run(&self) -> BatchOutcome {
        BatchOutcome {
            label: self.label.clone(),
            result: run_backtest_with_settings(&self.series, self.strategy.as_ref(), &self.settings),
        }
    }
}

impl std::fmt::Debug for BatchJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchJob")
            .field("label", &self.label)
            .field("strategy", &self.strategy.name())
            .field("points", &self.series.len())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Outcome of one job. Failures stay per-job.
#[derive(Debug)]
pub struct BatchOutcome {
    pub label: String,
    pub result: Result<BacktestResult, RunError>,
}

/// Run every job, returning outcomes in input order.
///
/// Results are identical whether `parallel` is set or not.
pub fn run_batch(jobs: &[BatchJob], parallel: bool) -> Vec<BatchOutcome> {
    info!(
        "running {} backtests ({})",
        jobs.len(),
        if parallel { "parallel" } else { "sequential" }
    );
    if parallel {
        jobs.par_iter().map(BatchJob::run).collect()
    } else {
        jobs.iter().map(BatchJob::run).collect()
    }
}

/// Same series and settings, one job per strategy, labelled by strategy name.
pub fn jobs_for_strategies(
    series: Arc<PriceSeries>,
    strategies: &[StrategyRef],
    settings: RunSettings,
) -> Vec<BatchJob> {
    strategies
        .iter()
        .map(|strategy| {
            BatchJob::new(
                strategy.name().to_string(),
                Arc::clone(&series),
                Arc::clone(strategy),
                settings,
            )
        })
        .collect()
}
