use crate::domain::{PricePoint, Signal};
use crate::strategy::Strategy;

/// Never trades. Baseline for sanity checks: equity stays at initial capital.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hold;

impl Strategy for Hold {
    fn signals(&self, _history: &[PricePoint], _position: f64) -> Vec<Signal> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "hold"
    }
}
