//! Built-in strategies available from the default registry.

pub mod buy_and_hold;
pub mod hold;
pub mod ma_crossover;

pub use buy_and_hold::BuyAndHold;
pub use hold::Hold;
pub use ma_crossover::{MaCrossover, MaKind};
