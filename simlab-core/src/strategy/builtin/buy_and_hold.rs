//! Buy-and-hold: enter once at the first close, never exit.

use crate::domain::{PricePoint, Signal, QUANTITY_EPSILON};
use crate::strategy::{Strategy, StrategyRef};
use std::sync::Arc;

/// Buys the largest whole quantity `capital` affords at the first close.
///
/// Only the first step can trade, so a rejected entry is never retried.
/// Runs re-size it to their own starting capital via
/// [`Strategy::for_capital`].
#[derive(Debug, Clone, Copy)]
pub struct BuyAndHold {
    capital: f64,
}

impl BuyAndHold {
    pub fn new(capital: f64) -> Self {
        Self { capital }
    }
}

impl Strategy for BuyAndHold {
    fn signals(&self, history: &[PricePoint], position: f64) -> Vec<Signal> {
        let [first] = history else {
            return Vec::new();
        };
        if position.abs() >= QUANTITY_EPSILON {
            return Vec::new();
        }
        let quantity = (self.capital / first.close).floor();
        if quantity.is_finite() && quantity >= 1.0 {
            vec![Signal::buy(quantity)]
        } else {
            Vec::new()
        }
    }

    fn name(&self) -> &str {
        "buy_and_hold"
    }

    fn for_capital(&self, initial_capital: f64) -> Option<StrategyRef> {
        Some(Arc::new(Self::new(initial_capital)))
    }
}
