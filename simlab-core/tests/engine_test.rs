//! End-to-end engine tests: series in, equity curve and ledger out.

use chrono::NaiveDate;
use simlab_core::domain::{PricePoint, PriceSeries, Side, Signal};
use simlab_core::engine::{simulate, EngineConfig, ExecutionError};
use simlab_core::strategy::{from_fn, BuyAndHold, Hold, MaCrossover, Strategy};

fn series(closes: &[f64]) -> PriceSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let pairs: Vec<_> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| (base + chrono::Duration::days(i as i64), c))
        .collect();
    PriceSeries::from_closes(&pairs).unwrap()
}

fn buy_on_day(day: usize, quantity: f64) -> impl Strategy {
    simlab_core::strategy::FnStrategy::new("buy_on_day", move |history: &[PricePoint], _| {
        if history.len() == day + 1 {
            vec![Signal::buy(quantity)]
        } else {
            Vec::new()
        }
    })
}

#[test]
fn first_day_buy_tracks_closes() {
    let result = simulate(
        &series(&[100.0, 102.0, 101.0, 105.0, 110.0]),
        &buy_on_day(0, 10.0),
        &EngineConfig::new(100_000.0),
    );

    assert_eq!(
        result.equity_curve,
        vec![100_000.0, 100_020.0, 100_010.0, 100_050.0, 100_100.0]
    );
    assert_eq!(result.trades.len(), 1);
    let trade = result.trades[0];
    assert_eq!(trade.side, Side::Buy);
    assert_eq!(trade.price, 100.0);
    assert_eq!(trade.quantity, 10.0);
    assert_eq!(trade.pnl, 0.0);
}

#[test]
fn round_trip_realizes_pnl() {
    let strategy = from_fn("round_trip", |history: &[PricePoint], position: f64| {
        match history.len() {
            1 => vec![Signal::buy(5.0)],
            3 if position > 0.0 => vec![Signal::sell(position)],
            _ => Vec::new(),
        }
    });
    let result = simulate(
        &series(&[100.0, 110.0, 120.0, 90.0]),
        strategy.as_ref(),
        &EngineConfig::new(1_000.0),
    );

    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[1].side, Side::Sell);
    assert_eq!(result.trades[1].pnl, 100.0);
    // Flat after the sell, so the last drop does not touch equity.
    assert_eq!(result.equity_curve, vec![1_000.0, 1_050.0, 1_100.0, 1_100.0]);
}

#[test]
fn equity_curve_has_one_entry_per_point() {
    let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 * 0.2).sin() * 8.0).collect();
    let data = series(&closes);
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(Hold),
        Box::new(BuyAndHold::new(50_000.0)),
        Box::new(MaCrossover::ema_default()),
        Box::new(MaCrossover::sma_default()),
    ];
    for strategy in &strategies {
        let result = simulate(&data, strategy.as_ref(), &EngineConfig::new(50_000.0));
        assert_eq!(result.equity_curve.len(), data.len(), "{}", strategy.name());
        assert!(result.skipped_signals.is_empty(), "{}", strategy.name());
    }
}

#[test]
fn oversized_buy_is_skipped_and_run_continues() {
    let result = simulate(
        &series(&[100.0, 100.0, 100.0]),
        &buy_on_day(1, 1_000.0),
        &EngineConfig::new(500.0),
    );
    assert!(result.trades.is_empty());
    assert_eq!(result.skipped_signals.len(), 1);
    assert_eq!(result.skipped_signals[0].step_index, 1);
    assert!(matches!(
        result.skipped_signals[0].reason,
        ExecutionError::InsufficientFunds { .. }
    ));
    assert_eq!(result.equity_curve, vec![500.0; 3]);
}

#[test]
fn short_sales_require_opt_in() {
    let strategy = from_fn("short_first", |history: &[PricePoint], _| {
        if history.len() == 1 {
            vec![Signal::sell(2.0)]
        } else {
            Vec::new()
        }
    });
    let data = series(&[50.0, 40.0]);

    let long_only = simulate(&data, strategy.as_ref(), &EngineConfig::new(1_000.0));
    assert!(long_only.trades.is_empty());
    assert_eq!(long_only.skipped_signals.len(), 1);

    let shorting = simulate(
        &data,
        strategy.as_ref(),
        &EngineConfig::new(1_000.0).with_shorting(true),
    );
    assert_eq!(shorting.trades.len(), 1);
    // Short 2 at 50, marked at 40: 1_100 cash - 80 liability.
    assert_eq!(shorting.equity_curve, vec![1_000.0, 1_020.0]);
}

#[test]
fn simulation_is_deterministic() {
    let closes: Vec<f64> = (0..200).map(|i| 50.0 + (i as f64 * 0.15).cos() * 5.0).collect();
    let data = series(&closes);
    let strategy = MaCrossover::ema_default();
    let config = EngineConfig::new(10_000.0);
    let a = simulate(&data, &strategy, &config);
    let b = simulate(&data, &strategy, &config);
    assert_eq!(a.equity_curve, b.equity_curve);
    assert_eq!(a.trades, b.trades);
}
