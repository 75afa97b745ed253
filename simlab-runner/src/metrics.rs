//! Performance metrics — pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity curve and/or trade list in, scalar out.
//! Each one degrades to 0.0 independently on degenerate or non-finite input;
//! the calculator never errors and never rounds.

use serde::{Deserialize, Serialize};
use simlab_core::domain::Trade;

/// Default annualization factor for daily bars.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Returns are skipped when the previous equity is within this of zero.
const MIN_EQUITY: f64 = 1e-12;

/// Knobs for the metrics calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Periods per year used to annualize the Sharpe ratio.
    pub periods_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub win_rate: f64,
    pub total_trades: f64,
    pub avg_trade_pnl: f64,
}

impl MetricsReport {
    /// Compute all metrics from an equity curve and trade ledger.
    pub fn compute(equity_curve: &[f64], trades: &[Trade], config: &MetricsConfig) -> Self {
        Self {
            total_return_pct: total_return_pct(equity_curve),
            sharpe_ratio: sharpe_ratio(equity_curve, config.periods_per_year),
            max_drawdown_pct: max_drawdown_pct(equity_curve),
            win_rate: win_rate(trades),
            total_trades: trades.len() as f64,
            avg_trade_pnl: avg_trade_pnl(trades),
        }
    }

    /// All-zero report for runs that produced nothing.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Copy with every field rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            total_return_pct: round_to(self.total_return_pct, decimals),
            sharpe_ratio: round_to(self.sharpe_ratio, decimals),
            max_drawdown_pct: round_to(self.max_drawdown_pct, decimals),
            win_rate: round_to(self.win_rate, decimals),
            total_trades: self.total_trades,
            avg_trade_pnl: round_to(self.avg_trade_pnl, decimals),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return in percent: (last / first - 1) * 100.
///
/// Returns 0.0 for fewer than 2 points or a non-positive first value.
pub fn total_return_pct(equity_curve: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (equity_curve.first(), equity_curve.last()) else {
        return 0.0;
    };
    if equity_curve.len() < 2 || first <= 0.0 {
        return 0.0;
    }
    finite_or_zero((last / first - 1.0) * 100.0)
}

/// Per-step simple returns, skipping steps whose return is undefined.
pub fn step_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .filter(|w| w[0].abs() > MIN_EQUITY)
        .map(|w| w[1] / w[0] - 1.0)
        .filter(|r| r.is_finite())
        .collect()
}

/// Annualized Sharpe ratio with a zero risk-free rate.
///
/// Sharpe = mean(returns) / stdev(returns) * sqrt(periods_per_year), with the
/// sample standard deviation. Returns 0.0 with fewer than 2 returns or zero
/// variance.
pub fn sharpe_ratio(equity_curve: &[f64], periods_per_year: f64) -> f64 {
    if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
        return 0.0;
    }
    let returns = step_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(&returns);
    if std < 1e-15 || !std.is_finite() {
        return 0.0;
    }
    finite_or_zero(mean_f64(&returns) / std * periods_per_year.sqrt())
}

/// Maximum peak-to-trough decline as a positive percentage.
///
/// Returns 0.0 for empty or non-decreasing curves.
pub fn max_drawdown_pct(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &eq in equity_curve {
        if !eq.is_finite() {
            continue;
        }
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (peak - eq) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    finite_or_zero(max_dd * 100.0)
}

/// Winning fraction of the trades that realized P&L.
///
/// Opening fills (pnl == 0) are excluded from the denominator. 0.0 when no
/// trade realized anything.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let realized = trades
        .iter()
        .filter(|t| t.is_realized() && t.pnl.is_finite())
        .count();
    if realized == 0 {
        return 0.0;
    }
    let winners = trades
        .iter()
        .filter(|t| t.is_winner() && t.pnl.is_finite())
        .count();
    winners as f64 / realized as f64
}

/// Mean pnl over all trades, opening fills included.
pub fn avg_trade_pnl(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let pnls: Vec<f64> = trades.iter().map(|t| t.pnl).collect();
    finite_or_zero(mean_f64(&pnls))
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
