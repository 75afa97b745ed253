//! TOML backtest configuration.
//!
//! ```toml
//! [backtest]
//! symbol = "SPY"
//! start_date = "2023-01-01"
//! end_date = "2024-01-01"
//! interval = "1d"          # optional, 1d | 1wk | 1mo
//! strategy = "ema"
//! initial_capital = 100000 # optional
//! allow_short = false      # optional
//!
//! [metrics]
//! periods_per_year = 252   # optional
//!
//! [data]
//! dir = "data"             # optional, directory of <SYMBOL>.csv files
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use simlab_core::data::Interval;

use crate::metrics::{MetricsConfig, TRADING_DAYS_PER_YEAR};
use crate::runner::{RunSettings, DEFAULT_INITIAL_CAPITAL};
use crate::service::BacktestRequest;

/// Unique identifier for a backtest configuration (content-addressable hash).
pub type RunId = String;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid {field} '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("start_date {start} must be before end_date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unsupported interval '{0}' (expected 1d, 1wk or 1mo)")]
    InvalidInterval(String),

    #[error("initial_capital must be positive and finite, got {0}")]
    InvalidCapital(f64),

    #[error("periods_per_year must be positive and finite, got {0}")]
    InvalidPeriodsPerYear(f64),
}

/// Full configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub metrics: MetricsSection,
    #[serde(default)]
    pub data: DataSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    pub strategy: String,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default)]
    pub allow_short: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSection {
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            periods_per_year: default_periods_per_year(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSection {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

fn default_interval() -> String {
    Interval::default().to_string()
}

fn default_initial_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}

fn default_periods_per_year() -> f64 {
    TRADING_DAYS_PER_YEAR
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl BacktestConfig {
    /// Load a config from a TOML file. Does not validate.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Does not validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check every field a run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bt = &self.backtest;
        if bt.symbol.trim().is_empty() {
            return Err(ConfigError::MissingField("backtest.symbol"));
        }
        if bt.strategy.trim().is_empty() {
            return Err(ConfigError::MissingField("backtest.strategy"));
        }
        let (start, end) = self.date_range()?;
        if start >= end {
            return Err(ConfigError::InvalidDateRange { start, end });
        }
        self.interval()?;
        if !bt.initial_capital.is_finite() || bt.initial_capital <= 0.0 {
            return Err(ConfigError::InvalidCapital(bt.initial_capital));
        }
        let periods = self.metrics.periods_per_year;
        if !periods.is_finite() || periods <= 0.0 {
            return Err(ConfigError::InvalidPeriodsPerYear(periods));
        }
        Ok(())
    }

    /// Parsed `(start_date, end_date)`.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        Ok((
            parse_date("start_date", &self.backtest.start_date)?,
            parse_date("end_date", &self.backtest.end_date)?,
        ))
    }

    pub fn interval(&self) -> Result<Interval, ConfigError> {
        Interval::from_str(&self.backtest.interval)
            .map_err(|_| ConfigError::InvalidInterval(self.backtest.interval.clone()))
    }

    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            periods_per_year: self.metrics.periods_per_year,
        }
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings::new(self.backtest.initial_capital)
            .with_shorting(self.backtest.allow_short)
            .with_metrics(self.metrics_config())
    }

    /// The request this config describes.
    pub fn to_request(&self) -> BacktestRequest {
        let bt = &self.backtest;
        BacktestRequest {
            strategy: bt.strategy.clone(),
            symbol: bt.symbol.clone(),
            start_date: bt.start_date.clone(),
            end_date: bt.end_date.clone(),
            interval: bt.interval.clone(),
            initial_capital: bt.initial_capital,
        }
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two identical configs share a RunId, which tags log lines and output.
    pub fn run_id(&self) -> RunId {
        let canonical = serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        blake3::hash(canonical.as_bytes()).to_hex().to_string()
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
