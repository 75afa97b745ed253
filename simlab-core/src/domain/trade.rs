//! Trade — an executed fill in the engine's ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a signal or fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A fill appended to the ledger. Immutable once recorded.
///
/// `pnl` is the P&L realized against the average entry price by the part of
/// the fill that reduced an open position; opening fills carry 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub step_index: usize,
    pub side: Side,
    pub price: f64,
    pub quantity: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }

    /// True if the fill realized any P&L (it closed or reduced a position).
    pub fn is_realized(&self) -> bool {
        self.pnl != 0.0
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}
