//! Backtest result and the JSON wire contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use simlab_core::domain::{PricePoint, Side, Trade};

use crate::metrics::{round_to, MetricsReport};
use crate::runner::RunError;

/// Complete result of a backtest run.
///
/// Serializes to exactly `{equity_curve, trades, metrics}`. Owned by the
/// caller once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// One dated equity sample per simulated step.
    pub equity_curve: Vec<EquityPoint>,

    /// Executed fills in order.
    pub trades: Vec<TradeReport>,

    pub metrics: MetricsReport,
}

/// Single point in the equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// A ledger entry keyed by date instead of step index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeReport {
    pub date: NaiveDate,
    pub side: Side,
    pub price: f64,
    pub quantity: f64,
    pub pnl: f64,
}

impl TradeReport {
    /// Date a ledger entry using the series it was produced from.
    pub fn from_trade(trade: &Trade, points: &[PricePoint]) -> Option<Self> {
        let point = points.get(trade.step_index)?;
        Some(Self {
            date: point.date,
            side: trade.side,
            price: trade.price,
            quantity: trade.quantity,
            pnl: trade.pnl,
        })
    }
}

impl BacktestResult {
    /// Degenerate result: no curve, no trades, all-zero metrics.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().map(|p| p.equity)
    }

    /// Presentation copy with prices, equity, pnl and metrics rounded to
    /// `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            equity_curve: self
                .equity_curve
                .iter()
                .map(|p| EquityPoint {
                    date: p.date,
                    equity: round_to(p.equity, decimals),
                })
                .collect(),
            trades: self
                .trades
                .iter()
                .map(|t| TradeReport {
                    price: round_to(t.price, decimals),
                    pnl: round_to(t.pnl, decimals),
                    ..*t
                })
                .collect(),
            metrics: self.metrics.rounded(decimals),
        }
    }
}

/// Failure body: the error message next to an empty, all-zero result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub metrics: MetricsReport,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<TradeReport>,
}

impl ErrorResponse {
    pub fn from_error(err: &RunError) -> Self {
        Self::from_message(err.to_string())
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            metrics: MetricsReport::zero(),
            equity_curve: Vec::new(),
            trades: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn trade_report_takes_date_from_step() {
        let points = vec![
            PricePoint::from_close(date(2), 10.0),
            PricePoint::from_close(date(3), 11.0),
        ];
        let trade = Trade {
            step_index: 1,
            side: Side::Sell,
            price: 11.0,
            quantity: 2.0,
            pnl: 2.0,
        };
        let report = TradeReport::from_trade(&trade, &points).unwrap();
        assert_eq!(report.date, date(3));

        let stray = Trade {
            step_index: 5,
            ..trade
        };
        assert!(TradeReport::from_trade(&stray, &points).is_none());
    }

    #[test]
    fn serializes_wire_shape() {
        let result = BacktestResult {
            equity_curve: vec![EquityPoint {
                date: date(2),
                equity: 1_000.0,
            }],
            trades: vec![TradeReport {
                date: date(2),
                side: Side::Buy,
                price: 10.0,
                quantity: 5.0,
                pnl: 0.0,
            }],
            metrics: MetricsReport::zero(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value["equity_curve"],
            json!([{"date": "2024-01-02", "equity": 1000.0}])
        );
        assert_eq!(
            value["trades"],
            json!([{"date": "2024-01-02", "side": "BUY", "price": 10.0, "quantity": 5.0, "pnl": 0.0}])
        );
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn rounded_copy_leaves_original() {
        let result = BacktestResult {
            equity_curve: vec![EquityPoint {
                date: date(2),
                equity: 1_000.456,
            }],
            trades: Vec::new(),
            metrics: MetricsReport::zero(),
        };
        let rounded = result.rounded(2);
        assert_eq!(rounded.equity_curve[0].equity, 1_000.46);
        assert_eq!(result.equity_curve[0].equity, 1_000.456);
    }

    #[test]
    fn error_response_has_zeroed_body() {
        let body = serde_json::to_value(ErrorResponse::from_error(&RunError::EmptySeries)).unwrap();
        assert_eq!(body["equity_curve"], json!([]));
        assert_eq!(body["trades"], json!([]));
        assert_eq!(body["metrics"]["total_trades"], json!(0.0));
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }
}
