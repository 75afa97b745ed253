use super::trade::Side;
use serde::{Deserialize, Serialize};

/// A strategy's instruction to trade `quantity` units at the current step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub side: Side,
    pub quantity: f64,
}

impl Signal {
    pub fn buy(quantity: f64) -> Self {
        Self {
            side: Side::Buy,
            quantity,
        }
    }

    pub fn sell(quantity: f64) -> Self {
        Self {
            side: Side::Sell,
            quantity,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.quantity.is_finite() && self.quantity > 0.0
    }
}
