//! Strategies — pure decision functions over point-in-time history.
//!
//! A strategy sees only the prefix of the series up to and including the
//! current step, plus the engine's current signed position. It never
//! touches engine state directly; it returns signals and the engine decides
//! whether they can be executed.

pub mod builtin;
pub mod registry;

pub use builtin::{BuyAndHold, Hold, MaCrossover, MaKind};
pub use registry::{parse_strategy_list, RegistryError, StrategyRegistry};

use crate::domain::{PricePoint, Signal};
use std::fmt;
use std::sync::Arc;

/// Decision function invoked once per simulated step.
///
/// # Invariants
/// - `history` ends at the current step; its length is `step_index + 1`
/// - same `history` and `position` must yield the same signals
/// - no I/O, no interior mutability
pub trait Strategy: Send + Sync {
    /// Signals for the last point in `history`, in execution order.
    fn signals(&self, history: &[PricePoint], position: f64) -> Vec<Signal>;

    /// Strategy name for logging and reports.
    fn name(&self) -> &str;

    /// A copy sized for a run that starts with `initial_capital`.
    ///
    /// `None` for strategies whose orders do not depend on capital.
    fn for_capital(&self, _initial_capital: f64) -> Option<StrategyRef> {
        None
    }
}

/// Shared handle to a strategy, as stored in the registry and batch jobs.
pub type StrategyRef = Arc<dyn Strategy>;

/// Adapts a closure into a [`Strategy`].
pub struct FnStrategy<F> {
    name: String,
    f: F,
}

impl<F> FnStrategy<F>
where
    F: Fn(&[PricePoint], f64) -> Vec<Signal> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Strategy for FnStrategy<F>
where
    F: Fn(&[PricePoint], f64) -> Vec<Signal> + Send + Sync,
{
    fn signals(&self, history: &[PricePoint], position: f64) -> Vec<Signal> {
        (self.f)(history, position)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnStrategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategy").field("name", &self.name).finish()
    }
}

/// Wrap a closure as a shared strategy handle.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> StrategyRef
where
    F: Fn(&[PricePoint], f64) -> Vec<Signal> + Send + Sync + 'static,
{
    Arc::new(FnStrategy::new(name, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn closure_strategy_forwards_arguments() {
        let strategy = from_fn("echo_position", |history: &[PricePoint], position: f64| {
            if position == 0.0 && history.len() == 1 {
                vec![Signal::buy(1.0)]
            } else {
                Vec::new()
            }
        });
        let point = PricePoint::from_close(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 10.0);
        assert_eq!(strategy.signals(&[point], 0.0), vec![Signal::buy(1.0)]);
        assert!(strategy.signals(&[point], 1.0).is_empty());
        assert_eq!(strategy.name(), "echo_position");
    }
}
