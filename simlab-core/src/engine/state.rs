//! Engine configuration and mutable simulation state.

use crate::domain::{Position, Side, Signal, Trade, QUANTITY_EPSILON};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-signal execution failures. Non-fatal: the signal is dropped and the
/// simulation continues.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ExecutionError {
    #[error("insufficient funds: cost {cost:.2} exceeds cash {cash:.2}")]
    InsufficientFunds { cost: f64, cash: f64 },

    #[error("insufficient position: sell {requested} exceeds held {available}")]
    InsufficientPosition { requested: f64, available: f64 },

    #[error("invalid signal quantity {0}")]
    InvalidQuantity(f64),

    #[error("invalid execution price {0}")]
    InvalidPrice(f64),
}

/// Configuration for a single simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Permit sells beyond the long position. Off by default: long-only,
    /// cash-constrained.
    pub allow_short: bool,
}

impl EngineConfig {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            allow_short: false,
        }
    }

    pub fn with_shorting(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }
}

/// Cash, position, trade ledger and equity samples for one run.
///
/// Invariants:
/// - `cash >= 0` after every applied signal
/// - `equity_curve.len()` equals the number of steps recorded so far
#[derive(Debug, Clone)]
pub struct EngineState {
    cash: f64,
    position: Position,
    trades: Vec<Trade>,
    equity_curve: Vec<f64>,
    allow_short: bool,
}

impl EngineState {
    pub fn new(config: &EngineConfig) -> Self {
        let mut state = Self {
            cash: 0.0,
            position: Position::flat(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            allow_short: config.allow_short,
        };
        state.reset(config.initial_capital);
        state
    }

    /// Return to the starting state with `initial_capital` in cash.
    pub fn reset(&mut self, initial_capital: f64) {
        self.cash = initial_capital;
        self.position = Position::flat();
        self.trades.clear();
        self.equity_curve.clear();
    }

    /// Execute `signal` at `current_price` against cash and position.
    ///
    /// On error nothing is mutated. The ledger records the step as the
    /// current length of the equity curve, i.e. the step being simulated.
    pub fn apply_signal(&mut self, signal: &Signal, current_price: f64) -> Result<(), ExecutionError> {
        if !signal.is_valid() {
            return Err(ExecutionError::InvalidQuantity(signal.quantity));
        }
        if !current_price.is_finite() || current_price <= 0.0 {
            return Err(ExecutionError::InvalidPrice(current_price));
        }

        let quantity = match signal.side {
            Side::Sell if !self.allow_short => {
                let available = self.position.long_quantity();
                // Float dust on a long position may be sold; nothing may be sold while flat.
                let tolerance = if self.position.is_long() {
                    QUANTITY_EPSILON
                } else {
                    0.0
                };
                if signal.quantity > available + tolerance {
                    return Err(ExecutionError::InsufficientPosition {
                        requested: signal.quantity,
                        available,
                    });
                }
                signal.quantity.min(available)
            }
            _ => signal.quantity,
        };
        let notional = quantity * current_price;

        match signal.side {
            Side::Buy => {
                if self.cash < notional {
                    return Err(ExecutionError::InsufficientFunds {
                        cost: notional,
                        cash: self.cash,
                    });
                }
                self.cash -= notional;
            }
            Side::Sell => self.cash += notional,
        }

        let pnl = self
            .position
            .apply_fill(signal.side.sign() * quantity, current_price);

        self.trades.push(Trade {
            step_index: self.equity_curve.len(),
            side: signal.side,
            price: current_price,
            quantity,
            pnl,
        });
        Ok(())
    }

    /// Append the marked-to-market equity at `current_price`.
    pub fn record_equity(&mut self, current_price: f64) -> f64 {
        let equity = self.equity(current_price);
        self.equity_curve.push(equity);
        equity
    }

    pub fn equity(&self, current_price: f64) -> f64 {
        self.cash + self.position.market_value(current_price)
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn equity_curve(&self) -> &[f64] {
        &self.equity_curve
    }

    pub fn steps_recorded(&self) -> usize {
        self.equity_curve.len()
    }

    /// Consume the state, yielding the equity curve and trade ledger.
    pub fn into_parts(self) -> (Vec<f64>, Vec<Trade>) {
        (self.equity_curve, self.trades)
    }
}
