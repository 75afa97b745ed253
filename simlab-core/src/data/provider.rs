//! Market data provider trait and structured error types.
//!
//! The provider abstracts over where a series comes from (CSV files, an
//! external market-data service, an in-memory fixture). Data must be fully
//! fetched before a run starts; the engine never calls a provider.

use crate::domain::{PriceSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data for '{symbol}' between {start} and {end}")]
    EmptyRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("unsupported interval '{0}' (expected 1d, 1wk or 1mo)")]
    UnsupportedInterval(String),

    #[error("invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Bar spacing requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" | "daily" => Ok(Interval::Daily),
            "1wk" | "1w" | "weekly" => Ok(Interval::Weekly),
            "1mo" | "monthly" => Ok(Interval::Monthly),
            _ => Err(DataError::UnsupportedInterval(s.to_string())),
        }
    }
}

/// Source of price series for a ticker.
///
/// Contract: returned series are validated [`PriceSeries`] values restricted
/// to `start <= date < end`. Provider-specific fields never leak into
/// [`crate::domain::PricePoint`].
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceSeries, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_parses_provider_strings() {
        assert_eq!("1d".parse::<Interval>().unwrap(), Interval::Daily);
        assert_eq!("1WK".parse::<Interval>().unwrap(), Interval::Weekly);
        assert_eq!("monthly".parse::<Interval>().unwrap(), Interval::Monthly);
        assert!(matches!(
            "5m".parse::<Interval>(),
            Err(DataError::UnsupportedInterval(_))
        ));
    }

    #[test]
    fn interval_display_roundtrips() {
        for interval in [Interval::Daily, Interval::Weekly, Interval::Monthly] {
            assert_eq!(interval.to_string().parse::<Interval>().unwrap(), interval);
        }
    }

    #[test]
    fn interval_serde_uses_provider_strings() {
        assert_eq!(serde_json::to_string(&Interval::Weekly).unwrap(), "\"1wk\"");
        assert_eq!(Interval::default(), Interval::Daily);
    }
}
