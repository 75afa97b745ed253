//! Backtest runner — wires together the engine, the strategy, and metrics.
//!
//! Entry points:
//! - `run_backtest()`: series + strategy + capital, default settings.
//! - `run_backtest_with_settings()`: explicit shorting and metrics settings.
//! - `run_backtest_detailed()`: same, plus the skipped-signal diagnostics.

use chrono::NaiveDate;
use log::debug;
use thiserror::Error;

use simlab_core::domain::PriceSeries;
use simlab_core::engine::{simulate, EngineConfig, SkippedSignal};
use simlab_core::strategy::{Strategy, StrategyRef, StrategyRegistry};

use crate::config::ConfigError;
use crate::metrics::{MetricsConfig, MetricsReport};
use crate::result::{BacktestResult, EquityPoint, TradeReport};

/// Starting cash when a caller does not name one.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// Input errors. The run does not proceed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no price data available: the series is empty")]
    EmptySeries,

    #[error("initial capital must be positive and finite, got {0}")]
    InvalidCapital(f64),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid interval '{0}' (expected 1d, 1wk or 1mo)")]
    InvalidInterval(String),

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Per-run settings besides the series and strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    pub initial_capital: f64,
    pub allow_short: bool,
    pub metrics: MetricsConfig,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPITAL)
    }
}

impl RunSettings {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            allow_short: false,
            metrics: MetricsConfig::default(),
        }
    }

    pub fn with_shorting(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.initial_capital).with_shorting(self.allow_short)
    }
}

/// A result together with the signals the engine dropped.
#[derive(Debug, Clone)]
pub struct DetailedRun {
    pub result: BacktestResult,
    pub skipped_signals: Vec<SkippedSignal>,
    pub signal_count: usize,
}

/// Run `strategy` over `series` with `initial_capital` and default settings.
pub fn run_backtest(
    series: &PriceSeries,
    strategy: &dyn Strategy,
    initial_capital: f64,
) -> Result<BacktestResult, RunError> {
    run_backtest_with_settings(series, strategy, &RunSettings::new(initial_capital))
}

pub fn run_backtest_with_settings(
    series: &PriceSeries,
    strategy: &dyn Strategy,
    settings: &RunSettings,
) -> Result<BacktestResult, RunError> {
    run_backtest_detailed(series, strategy, settings).map(|run| run.result)
}

/// Run a backtest and keep the engine's diagnostics.
///
/// 1. Reject empty series and non-positive or non-finite capital
/// 2. Size capital-dependent strategies to `settings.initial_capital`
/// 3. Simulate with a fresh engine state
/// 4. Compute metrics over the raw equity curve and ledger
/// 5. Date the equity samples and trades from the series
pub fn run_backtest_detailed(
    series: &PriceSeries,
    strategy: &dyn Strategy,
    settings: &RunSettings,
) -> Result<DetailedRun, RunError> {
    if series.is_empty() {
        return Err(RunError::EmptySeries);
    }
    let capital = settings.initial_capital;
    if !capital.is_finite() || capital <= 0.0 {
        return Err(RunError::InvalidCapital(capital));
    }
    let sized = strategy.for_capital(capital);
    let strategy: &dyn Strategy = match &sized {
        Some(sized) => sized.as_ref(),
        None => strategy,
    };

    debug!(
        "backtest {}: {} points, capital {capital}, shorting {}",
        strategy.name(),
        series.len(),
        settings.allow_short
    );

    let sim = simulate(series, strategy, &settings.engine_config());
    let metrics = MetricsReport::compute(&sim.equity_curve, &sim.trades, &settings.metrics);

    let points = series.points();
    let equity_curve = points
        .iter()
        .zip(&sim.equity_curve)
        .map(|(point, &equity)| EquityPoint {
            date: point.date,
            equity,
        })
        .collect();
    let trades = sim
        .trades
        .iter()
        .filter_map(|trade| TradeReport::from_trade(trade, points))
        .collect();

    debug!(
        "backtest {} done: {} trades, return {:.2}%",
        strategy.name(),
        sim.trades.len(),
        metrics.total_return_pct
    );

    Ok(DetailedRun {
        result: BacktestResult {
            equity_curve,
            trades,
            metrics,
        },
        skipped_signals: sim.skipped_signals,
        signal_count: sim.signal_count,
    })
}

/// Look up a strategy id, failing with `UnknownStrategy`.
pub fn resolve_strategy(registry: &StrategyRegistry, name: &str) -> Result<StrategyRef, RunError> {
    registry
        .get(name)
        .ok_or_else(|| RunError::UnknownStrategy(name.trim().to_string()))
}
