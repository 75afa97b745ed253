//! CSV price loading for the runner.
//!
//! Files hold one row per day with the header `date,open,high,low,close,volume`
//! and `YYYY-MM-DD` dates. Rows may appear in either date order; they are
//! sorted ascending before validation, so duplicates still fail.
//!
//! [`CsvProvider`] serves a directory of `<SYMBOL>.csv` files through the
//! [`MarketDataProvider`] boundary.

use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use simlab_core::data::{resample, DataError, Interval, MarketDataProvider};
use simlab_core::domain::{PricePoint, PriceSeries, SeriesError};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("invalid price data in {path}: {source}")]
    Series { path: PathBuf, source: SeriesError },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<CsvRow> for PricePoint {
    fn from(row: CsvRow) -> Self {
        PricePoint::new(row.date, row.open, row.high, row.low, row.close, row.volume)
    }
}

/// Load one CSV file into a validated series.
pub fn load_series_csv(path: &Path) -> Result<PriceSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(std::io::BufReader::new(file));

    let mut points = Vec::new();
    for record in reader.deserialize() {
        let row: CsvRow = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        points.push(PricePoint::from(row));
    }
    points.sort_by_key(|p| p.date);

    debug!("loaded {} rows from {}", points.len(), path.display());
    PriceSeries::new(points).map_err(|source| LoadError::Series {
        path: path.to_path_buf(),
        source,
    })
}

/// Market data from a directory of `<SYMBOL>.csv` files.
///
/// `fetch` keeps `start <= date < end`, then resamples to the requested
/// interval.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `ticker`, trying the name as given and then upper-cased.
    pub fn path_for(&self, ticker: &str) -> Option<PathBuf> {
        let ticker = ticker.trim();
        if ticker.is_empty() || ticker.contains(['/', '\\']) || ticker.contains("..") {
            return None;
        }
        [ticker.to_string(), ticker.to_uppercase()]
            .into_iter()
            .map(|name| self.dir.join(format!("{name}.csv")))
            .find(|path| path.is_file())
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker).ok_or_else(|| DataError::SymbolNotFound {
            symbol: ticker.to_string(),
        })?;
        let series = load_series_csv(&path).map_err(|e| match e {
            LoadError::Series { source, .. } => DataError::InvalidSeries(source),
            other => DataError::Other(other.to_string()),
        })?;

        let window = series.slice_dates(start, end);
        if window.is_empty() {
            return Err(DataError::EmptyRange {
                symbol: ticker.to_string(),
                start,
                end,
            });
        }
        Ok(resample(&window, interval))
    }
}
