use serde::{Deserialize, Serialize};

/// Quantities with a magnitude below this are treated as flat.
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Signed holding of the single traded instrument with its running
/// volume-weighted average entry price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub quantity: f64,
    /// 0.0 while flat.
    pub avg_entry_price: f64,
}

impl Position {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.abs() < QUANTITY_EPSILON
    }

    pub fn is_long(&self) -> bool {
        self.quantity >= QUANTITY_EPSILON
    }

    pub fn is_short(&self) -> bool {
        self.quantity <= -QUANTITY_EPSILON
    }

    /// Quantity available to sell without going short.
    pub fn long_quantity(&self) -> f64 {
        self.quantity.max(0.0)
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.quantity * (current_price - self.avg_entry_price)
    }

    /// Apply a signed fill (`delta > 0` buys, `delta < 0` sells) at `price`.
    ///
    /// Returns the P&L realized by the part of the fill that reduces the
    /// existing position. Fills that open or extend a position realize 0 and
    /// fold into the weighted average entry price. A fill that crosses zero
    /// closes the old side and opens the remainder at `price`.
    pub fn apply_fill(&mut self, delta: f64, price: f64) -> f64 {
        if self.is_flat() || self.quantity.signum() == delta.signum() {
            let held = self.quantity.abs();
            let added = delta.abs();
            self.avg_entry_price = (held * self.avg_entry_price + added * price) / (held + added);
            self.quantity += delta;
            return 0.0;
        }

        let closing = delta.abs().min(self.quantity.abs());
        let realized = (price - self.avg_entry_price) * closing * self.quantity.signum();
        let remainder = delta.abs() - closing;
        self.quantity += delta;

        if self.is_flat() {
            *self = Self::flat();
        } else if remainder >= QUANTITY_EPSILON {
            self.avg_entry_price = price;
        }
        realized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_realizes_nothing() {
        let mut pos = Position::flat();
        assert_eq!(pos.apply_fill(10.0, 100.0), 0.0);
        assert_eq!(pos.quantity, 10.0);
        assert_eq!(pos.avg_entry_price, 100.0);
    }

    #[test]
    fn adding_reweights_average() {
        let mut pos = Position::flat();
        pos.apply_fill(10.0, 100.0);
        pos.apply_fill(10.0, 110.0);
        assert!((pos.avg_entry_price - 105.0).abs() < 1e-12);
        assert_eq!(pos.quantity, 20.0);
    }

    #[test]
    fn partial_close_keeps_average() {
        let mut pos = Position::flat();
        pos.apply_fill(20.0, 100.0);
        let pnl = pos.apply_fill(-5.0, 120.0);
        assert!((pnl - 100.0).abs() < 1e-12);
        assert_eq!(pos.quantity, 15.0);
        assert_eq!(pos.avg_entry_price, 100.0);
    }

    #[test]
    fn full_close_resets_average() {
        let mut pos = Position::flat();
        pos.apply_fill(10.0, 100.0);
        let pnl = pos.apply_fill(-10.0, 90.0);
        assert!((pnl + 100.0).abs() < 1e-12);
        assert!(pos.is_flat());
        assert_eq!(pos.avg_entry_price, 0.0);
    }

    #[test]
    fn short_cover_realizes_inverse() {
        let mut pos = Position::flat();
        pos.apply_fill(-10.0, 100.0);
        assert!(pos.is_short());
        let pnl = pos.apply_fill(10.0, 80.0);
        assert!((pnl - 200.0).abs() < 1e-12);
        assert!(pos.is_flat());
    }

    #[test]
    fn flip_opens_remainder_at_fill_price() {
        let mut pos = Position::flat();
        pos.apply_fill(10.0, 100.0);
        let pnl = pos.apply_fill(-15.0, 110.0);
        assert!((pnl - 100.0).abs() < 1e-12);
        assert!((pos.quantity + 5.0).abs() < 1e-12);
        assert_eq!(pos.avg_entry_price, 110.0);
    }

    #[test]
    fn market_value_and_unrealized() {
        let pos = Position {
            quantity: 10.0,
            avg_entry_price: 100.0,
        };
        assert_eq!(pos.market_value(110.0), 1100.0);
        assert_eq!(pos.unrealized_pnl(110.0), 100.0);
    }
}
