//! Request handling: validate a backtest request, fetch data, run.
//!
//! `BacktestService::handle` takes `&self` and builds a fresh engine per
//! call, so one service can serve concurrent requests.

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use simlab_core::data::{Interval, MarketDataProvider};
use simlab_core::strategy::StrategyRegistry;

use crate::metrics::MetricsConfig;
use crate::result::BacktestResult;
use crate::runner::{
    resolve_strategy, run_backtest_with_settings, RunError, RunSettings, DEFAULT_INITIAL_CAPITAL,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inbound backtest request, as posted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub strategy: String,
    pub symbol: String,
    /// `YYYY-MM-DD`, inclusive.
    pub start_date: String,
    /// `YYYY-MM-DD`, exclusive.
    pub end_date: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
}

fn default_interval() -> String {
    Interval::default().to_string()
}

fn default_initial_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}

impl BacktestRequest {
    pub fn new(
        strategy: impl Into<String>,
        symbol: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            symbol: symbol.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            interval: default_interval(),
            initial_capital: default_initial_capital(),
        }
    }
}

/// Owns the collaborators a request needs. Holds no per-run state.
#[derive(Clone)]
pub struct BacktestService {
    pub registry: StrategyRegistry,
    pub provider: Arc<dyn MarketDataProvider>,
    pub metrics_config: MetricsConfig,
    pub allow_short: bool,
}

impl std::fmt::Debug for BacktestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BacktestService")
            .field("registry", &self.registry)
            .field("provider", &self.provider.name())
            .field("metrics_config", &self.metrics_config)
            .field("allow_short", &self.allow_short)
            .finish()
    }
}

impl BacktestService {
    /// Service over the built-in strategies with default metrics, long-only.
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            registry: StrategyRegistry::with_builtins(),
            provider,
            metrics_config: MetricsConfig::default(),
            allow_short: false,
        }
    }

    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_metrics(mut self, metrics_config: MetricsConfig) -> Self {
        self.metrics_config = metrics_config;
        self
    }

    pub fn with_shorting(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }

    /// Validate `request`, fetch its series and run it.
    ///
    /// 1. Parse dates, require start < end
    /// 2. Parse the interval
    /// 3. Resolve the strategy
    /// 4. Fetch; any provider failure or an empty series is `EmptySeries`
    /// 5. Run with a fresh engine
    pub fn handle(&self, request: &BacktestRequest) -> Result<BacktestResult, RunError> {
        let start = parse_date(&request.start_date)?;
        let end = parse_date(&request.end_date)?;
        if start >= end {
            return Err(RunError::InvalidDateRange { start, end });
        }
        let interval = Interval::from_str(&request.interval)
            .map_err(|_| RunError::InvalidInterval(request.interval.clone()))?;
        let strategy = resolve_strategy(&self.registry, &request.strategy)?;

        info!(
            "backtest {} on {} {start}..{end} ({interval}) via {}",
            strategy.name(),
            request.symbol,
            self.provider.name()
        );

        let series = match self.provider.fetch(&request.symbol, start, end, interval) {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => {
                warn!("{}: provider returned no data", request.symbol);
                return Err(RunError::EmptySeries);
            }
            Err(e) => {
                warn!("{}: {e}", request.symbol);
                return Err(RunError::EmptySeries);
            }
        };

        let settings = RunSettings::new(request.initial_capital)
            .with_shorting(self.allow_short)
            .with_metrics(self.metrics_config);
        run_backtest_with_settings(&series, strategy.as_ref(), &settings)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, RunError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| RunError::InvalidDate(value.to_string()))
}
