//! Data boundary: provider trait, column-oriented payloads, resampling.

pub mod columnar;
pub mod provider;
pub mod resample;

pub use columnar::ColumnarSeries;
pub use provider::{DataError, Interval, MarketDataProvider};
pub use resample::resample;
