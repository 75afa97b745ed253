//! Domain types for SimLab

pub mod position;
pub mod price;
pub mod signal;
pub mod trade;

pub use position::{Position, QUANTITY_EPSILON};
pub use price::{PricePoint, PriceSeries, SeriesError};
pub use signal::Signal;
pub use trade::{Side, Trade};
