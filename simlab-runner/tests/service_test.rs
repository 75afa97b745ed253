//! Request handling end to end: validation order, provider failures, the
//! zeroed error body, and config-driven runs over CSV files.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use simlab_core::data::{DataError, Interval, MarketDataProvider};
use simlab_core::domain::PriceSeries;
use simlab_runner::{
    BacktestConfig, BacktestRequest, BacktestService, CsvProvider, ErrorResponse, MetricsConfig,
    RunError,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves fixed series from memory and fails for everything else.
struct MemoryProvider {
    series: HashMap<String, PriceSeries>,
}

impl MemoryProvider {
    fn with(symbol: &str, closes: &[f64]) -> Self {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let pairs: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (base + chrono::Duration::days(i as i64), c))
            .collect();
        let mut series = HashMap::new();
        series.insert(symbol.to_string(), PriceSeries::from_closes(&pairs).unwrap());
        Self { series }
    }
}

impl MarketDataProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        _interval: Interval,
    ) -> Result<PriceSeries, DataError> {
        self.series
            .get(ticker)
            .map(|s| s.slice_dates(start, end))
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            })
    }
}

fn service() -> BacktestService {
    BacktestService::new(Arc::new(MemoryProvider::with(
        "SPY",
        &[100.0, 102.0, 101.0, 105.0, 110.0],
    )))
}

fn request(strategy: &str) -> BacktestRequest {
    BacktestRequest::new(strategy, "SPY", "2024-01-01", "2024-02-01")
}

#[test]
fn handles_valid_request() {
    init_logging();
    let result = service().handle(&request("buy_and_hold")).unwrap();
    assert_eq!(result.equity_curve.len(), 5);
    assert_eq!(result.trades.len(), 1);
    // 1000 shares at 100, marked at 110.
    assert_eq!(result.final_equity(), Some(110_000.0));
    assert!((result.metrics.total_return_pct - 10.0).abs() < 1e-9);
}

#[test]
fn request_capital_is_honoured() {
    init_logging();
    let mut req = request("hold");
    req.initial_capital = 5_000.0;
    let result = service().handle(&req).unwrap();
    assert!(result.equity_curve.iter().all(|p| p.equity == 5_000.0));

    req.initial_capital = -1.0;
    assert!(matches!(
        service().handle(&req),
        Err(RunError::InvalidCapital(_))
    ));
}

#[test]
fn buy_and_hold_sizes_from_request_capital() {
    init_logging();
    let svc = BacktestService::new(Arc::new(MemoryProvider::with(
        "SPY",
        &[100.0, 102.0, 104.0, 106.0, 108.0, 110.0],
    )));
    let mut req = request("buy_and_hold");
    req.initial_capital = 10_000.0;
    let result = svc.handle(&req).unwrap();
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].quantity, 100.0);
    assert_eq!(result.final_equity(), Some(11_000.0));

    req.initial_capital = 250_000.0;
    let result = svc.handle(&req).unwrap();
    assert_eq!(result.trades[0].quantity, 2_500.0);
    assert_eq!(result.final_equity(), Some(275_000.0));
}

#[test]
fn rejects_bad_dates_before_anything_else() {
    init_logging();
    let mut req = request("no_such_strategy");
    req.start_date = "2024-13-01".into();
    assert!(matches!(service().handle(&req), Err(RunError::InvalidDate(_))));

    let mut req = request("ema");
    req.start_date = "2024-03-01".into();
    assert!(matches!(
        service().handle(&req),
        Err(RunError::InvalidDateRange { .. })
    ));
}

#[test]
fn rejects_bad_interval_and_unknown_strategy() {
    init_logging();
    let mut req = request("ema");
    req.interval = "15m".into();
    assert!(matches!(
        service().handle(&req),
        Err(RunError::InvalidInterval(_))
    ));

    assert!(matches!(
        service().handle(&request("momentum")),
        Err(RunError::UnknownStrategy(_))
    ));
}

#[test]
fn provider_failures_become_empty_series() {
    init_logging();
    let mut req = request("ema");
    req.symbol = "QQQ".into();
    assert!(matches!(service().handle(&req), Err(RunError::EmptySeries)));

    let mut req = request("ema");
    req.start_date = "2025-01-01".into();
    req.end_date = "2025-02-01".into();
    assert!(matches!(service().handle(&req), Err(RunError::EmptySeries)));
}

#[test]
fn error_response_body() {
    init_logging();
    let err = service().handle(&request("momentum")).unwrap_err();
    let body = serde_json::to_value(ErrorResponse::from_error(&err)).unwrap();
    assert_eq!(body["error"], "unknown strategy 'momentum'");
    assert_eq!(body["metrics"]["sharpe_ratio"], 0.0);
    assert!(body["equity_curve"].as_array().unwrap().is_empty());
    assert!(body["trades"].as_array().unwrap().is_empty());
}

#[test]
fn service_shorting_and_metrics_settings() {
    let svc = service()
        .with_shorting(true)
        .with_metrics(MetricsConfig {
            periods_per_year: 12.0,
        });
    assert!(svc.allow_short);
    assert_eq!(svc.metrics_config.periods_per_year, 12.0);
    assert!(svc.handle(&request("hold")).is_ok());
}

#[test]
fn config_file_drives_csv_run() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/SPY.csv");
    std::fs::copy(&fixture, dir.path().join("SPY.csv")).unwrap();

    let config_path = dir.path().join("backtest.toml");
    let toml = format!(
        r#"[backtest]
symbol = "SPY"
start_date = "2023-03-01"
end_date = "2023-09-01"
strategy = "sma_cross"
initial_capital = 50000

[data]
dir = "{}"
"#,
        dir.path().display().to_string().replace('\\', "/")
    );
    std::fs::write(&config_path, toml).unwrap();

    let config = BacktestConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();
    let provider = Arc::new(CsvProvider::new(config.data.dir.clone()));
    let svc = BacktestService::new(provider)
        .with_metrics(config.metrics_config())
        .with_shorting(config.backtest.allow_short);
    let result = svc.handle(&config.to_request()).unwrap();

    let first = result.equity_curve.first().unwrap();
    let last = result.equity_curve.last().unwrap();
    assert!(first.date >= NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    assert!(last.date < NaiveDate::from_ymd_opt(2023, 9, 1).unwrap());
    assert_eq!(first.equity, 50_000.0);
}

#[test]
fn weekly_request_over_csv() {
    init_logging();
    let fixture_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let svc = BacktestService::new(Arc::new(CsvProvider::new(fixture_dir)));
    let mut req = BacktestRequest::new("hold", "SPY", "2023-01-01", "2024-01-01");
    req.interval = "1wk".into();
    let result = svc.handle(&req).unwrap();
    // Trading days of 2023 fall in ISO weeks 1 through 52.
    assert_eq!(result.equity_curve.len(), 52);
}
