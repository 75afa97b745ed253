//! Column-oriented price payloads.
//!
//! Market-data endpoints commonly ship history as parallel arrays
//! (`dates`, `open`, `high`, `low`, `close`, `volume`). This converts that
//! shape into a validated [`PriceSeries`].

use crate::domain::{PricePoint, PriceSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnarSeries {
    pub dates: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl ColumnarSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Validate column lengths and dates, then build a [`PriceSeries`].
    pub fn into_series(self) -> Result<PriceSeries, SeriesError> {
        let expected = self.dates.len();
        for (column, actual) in [
            ("open", self.open.len()),
            ("high", self.high.len()),
            ("low", self.low.len()),
            ("close", self.close.len()),
            ("volume", self.volume.len()),
        ] {
            if actual != expected {
                return Err(SeriesError::ColumnLength {
                    column,
                    expected,
                    actual,
                });
            }
        }

        let mut points = Vec::with_capacity(expected);
        for (index, raw) in self.dates.iter().enumerate() {
            let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
                SeriesError::InvalidDate {
                    index,
                    value: raw.clone(),
                }
            })?;
            points.push(PricePoint::new(
                date,
                self.open[index],
                self.high[index],
                self.low[index],
                self.close[index],
                self.volume[index],
            ));
        }
        PriceSeries::new(points)
    }
}

impl From<&PriceSeries> for ColumnarSeries {
    fn from(series: &PriceSeries) -> Self {
        let points = series.points();
        Self {
            dates: points
                .iter()
                .map(|p| p.date.format(DATE_FORMAT).to_string())
                .collect(),
            open: points.iter().map(|p| p.open).collect(),
            high: points.iter().map(|p| p.high).collect(),
            low: points.iter().map(|p| p.low).collect(),
            close: points.iter().map(|p| p.close).collect(),
            volume: points.iter().map(|p| p.volume).collect(),
        }
    }
}
