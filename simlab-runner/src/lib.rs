//! SimLab Runner — backtest orchestration, metrics, request handling.
//!
//! This crate builds on `simlab-core` to provide:
//! - Single-backtest runner with dated results and metrics
//! - Metrics calculator (return, Sharpe, drawdown, win rate)
//! - TOML configuration with content-addressed run ids
//! - CSV data loading and a directory-backed market data provider
//! - Request handling with the zeroed error body
//! - Parallel batch runs over rayon

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod result;
pub mod runner;
pub mod service;

pub use batch::{jobs_for_strategies, run_batch, BatchJob, BatchOutcome};
pub use config::{BacktestConfig, ConfigError, RunId};
pub use data_loader::{load_series_csv, CsvProvider, LoadError};
pub use metrics::{MetricsConfig, MetricsReport, TRADING_DAYS_PER_YEAR};
pub use result::{BacktestResult, EquityPoint, ErrorResponse, TradeReport};
pub use runner::{
    resolve_strategy, run_backtest, run_backtest_detailed, run_backtest_with_settings,
    DetailedRun, RunError, RunSettings, DEFAULT_INITIAL_CAPITAL,
};
pub use service::{BacktestRequest, BacktestService};
