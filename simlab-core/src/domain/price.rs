//! PricePoint and PriceSeries — the market data the engine consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV observation for the traded instrument on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A point whose OHLC are all `close`, with zero volume. Handy for close-only feeds.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self::new(date, close, close, close, close, 0.0)
    }

    /// Returns true if every OHLCV field is finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Reasons a sequence of points cannot form a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("non-finite value at index {index} ({date})")]
    NonFinite { index: usize, date: NaiveDate },

    #[error("close must be > 0 at index {index} ({date}), got {close}")]
    NonPositiveClose {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    #[error("negative volume at index {index} ({date})")]
    NegativeVolume { index: usize, date: NaiveDate },

    #[error("dates not strictly ascending at index {index}: {previous} then {date}")]
    NotAscending {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("column length mismatch: {column} has {actual} values, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unparsable date '{value}' at index {index}")]
    InvalidDate { index: usize, value: String },
}

/// Validated, time-ascending sequence of price points.
///
/// Construction guarantees: strictly increasing dates (no duplicates),
/// every value finite, close > 0, volume >= 0. The series may be empty;
/// the runner rejects empty input at the run boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (index, point) in points.iter().enumerate() {
            if !point.is_finite() {
                return Err(SeriesError::NonFinite {
                    index,
                    date: point.date,
                });
            }
            if point.close <= 0.0 {
                return Err(SeriesError::NonPositiveClose {
                    index,
                    date: point.date,
                    close: point.close,
                });
            }
            if point.volume < 0.0 {
                return Err(SeriesError::NegativeVolume {
                    index,
                    date: point.date,
                });
            }
            if index > 0 {
                let previous = points[index - 1].date;
                if point.date <= previous {
                    return Err(SeriesError::NotAscending {
                        index,
                        previous,
                        date: point.date,
                    });
                }
            }
        }
        Ok(Self { points })
    }

    /// Build a series from `(date, close)` pairs.
    pub fn from_closes(closes: &[(NaiveDate, f64)]) -> Result<Self, SeriesError> {
        Self::new(
            closes
                .iter()
                .map(|&(date, close)| PricePoint::from_close(date, close))
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Points with `start <= date < end`.
    pub fn slice_dates(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date < end)
                .copied()
                .collect(),
        }
    }

    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<PricePoint>,
        }
        let raw = Raw::deserialize(deserializer)?;
        PriceSeries::new(raw.points).map_err(serde::de::Error::custom)
    }
}
