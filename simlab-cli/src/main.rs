//! SimLab CLI — run, compare, and list strategies.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file or a single CSV file
//! - `compare` — run several strategies over one CSV file in parallel
//! - `strategies` — list registered strategy ids

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use simlab_core::strategy::{parse_strategy_list, StrategyRegistry};
use simlab_runner::{
    jobs_for_strategies, load_series_csv, resolve_strategy, run_backtest_detailed, run_batch,
    BacktestConfig, BacktestResult, BacktestService, CsvProvider, MetricsConfig, RunSettings,
    DEFAULT_INITIAL_CAPITAL, TRADING_DAYS_PER_YEAR,
};

/// Decimal places used for printed and exported results.
const OUTPUT_DECIMALS: u32 = 2;

#[derive(Parser)]
#[command(name = "simlab", about = "SimLab CLI — single-asset strategy backtesting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file or a CSV file.
    Run {
        /// Path to a TOML config file.
        #[arg(long, conflicts_with = "data")]
        config: Option<PathBuf>,

        /// CSV file with date,open,high,low,close,volume rows.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Strategy id (required with --data).
        #[arg(long)]
        strategy: Option<String>,

        /// Starting cash (with --data).
        #[arg(long, default_value_t = DEFAULT_INITIAL_CAPITAL)]
        capital: f64,

        /// Permit sells beyond the long position (with --data).
        #[arg(long, default_value_t = false)]
        allow_short: bool,

        /// Annualization factor for the Sharpe ratio (with --data).
        #[arg(long, default_value_t = TRADING_DAYS_PER_YEAR)]
        periods_per_year: f64,

        /// Write the result JSON to this path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the result JSON instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run several strategies over one CSV file and compare them.
    Compare {
        /// CSV file with date,open,high,low,close,volume rows.
        #[arg(long)]
        data: PathBuf,

        /// Comma-separated strategy ids, or "all".
        #[arg(long, default_value = "all")]
        strategies: String,

        /// Starting cash for every run.
        #[arg(long, default_value_t = DEFAULT_INITIAL_CAPITAL)]
        capital: f64,

        /// Run one strategy at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// List registered strategy ids.
    Strategies,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            strategy,
            capital,
            allow_short,
            periods_per_year,
            output,
            json,
        } => {
            let result = match (config, data) {
                (Some(path), None) => run_from_config(&path)?,
                (None, Some(path)) => {
                    let Some(strategy) = strategy else {
                        bail!("--strategy is required with --data");
                    };
                    let settings = RunSettings::new(capital)
                        .with_shorting(allow_short)
                        .with_metrics(MetricsConfig { periods_per_year });
                    run_from_csv(&path, &strategy, &settings)?
                }
                // clap rejects --config together with --data
                _ => bail!("one of --config or --data is required"),
            };
            emit_result(&result, output.as_deref(), json)
        }
        Commands::Compare {
            data,
            strategies,
            capital,
            sequential,
        } => run_compare(&data, &strategies, capital, !sequential),
        Commands::Strategies => {
            for name in StrategyRegistry::with_builtins().names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run_from_config(path: &Path) -> Result<BacktestResult> {
    let config = BacktestConfig::from_file(path)?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    info!("run {} from {}", config.run_id(), path.display());

    let provider = Arc::new(CsvProvider::new(config.data.dir.clone()));
    let service = BacktestService::new(provider)
        .with_registry(StrategyRegistry::with_builtins_for_capital(
            config.backtest.initial_capital,
        ))
        .with_metrics(config.metrics_config())
        .with_shorting(config.backtest.allow_short);

    Ok(service.handle(&config.to_request())?)
}

fn run_from_csv(path: &Path, strategy: &str, settings: &RunSettings) -> Result<BacktestResult> {
    let series = load_series_csv(path)?;
    let registry = StrategyRegistry::with_builtins_for_capital(settings.initial_capital);
    let strategy = resolve_strategy(&registry, strategy)?;

    let run = run_backtest_detailed(&series, strategy.as_ref(), settings)?;
    if !run.skipped_signals.is_empty() {
        println!(
            "Skipped {} of {} signals",
            run.skipped_signals.len(),
            run.signal_count
        );
    }
    Ok(run.result)
}

fn emit_result(result: &BacktestResult, output: Option<&Path>, json: bool) -> Result<()> {
    let rounded = result.rounded(OUTPUT_DECIMALS);
    if json {
        println!("{}", serde_json::to_string_pretty(&rounded)?);
    } else {
        print_summary(&rounded);
    }
    if let Some(path) = output {
        let body = serde_json::to_string_pretty(&rounded)?;
        std::fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
        println!("Result saved to: {}", path.display());
    }
    Ok(())
}

fn run_compare(data: &Path, strategies: &str, capital: f64, parallel: bool) -> Result<()> {
    let series = Arc::new(load_series_csv(data)?);
    let registry = StrategyRegistry::with_builtins_for_capital(capital);

    let names = parse_strategy_list(strategies, &registry);
    if names.is_empty() {
        bail!("no strategies selected");
    }
    let resolved = names
        .iter()
        .map(|name| resolve_strategy(&registry, name))
        .collect::<Result<Vec<_>, _>>()?;

    let jobs = jobs_for_strategies(series, &resolved, RunSettings::new(capital));
    let outcomes = run_batch(&jobs, parallel);

    println!();
    println!(
        "{:<20} {:>10} {:>8} {:>10} {:>9} {:>7} {:>12}",
        "Strategy", "Return %", "Sharpe", "Max DD %", "Win Rate", "Trades", "Avg P&L"
    );
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => {
                let m = result.metrics.rounded(OUTPUT_DECIMALS);
                println!(
                    "{:<20} {:>10.2} {:>8.2} {:>10.2} {:>8.1}% {:>7} {:>12.2}",
                    outcome.label,
                    m.total_return_pct,
                    m.sharpe_ratio,
                    m.max_drawdown_pct,
                    m.win_rate * 100.0,
                    m.total_trades,
                    m.avg_trade_pnl
                );
            }
            Err(e) => println!("{:<20} error: {e}", outcome.label),
        }
    }
    println!();
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;
    println!();
    println!("=== Backtest Result ===");
    if let (Some(first), Some(last)) = (result.equity_curve.first(), result.equity_curve.last()) {
        println!("Period:         {} to {}", first.date, last.date);
        println!("Steps:          {}", result.equity_curve.len());
        println!("Final Equity:   {:.2}", last.equity);
    }
    println!("Trades:         {}", m.total_trades);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", m.total_return_pct);
    println!("Sharpe:         {:.2}", m.sharpe_ratio);
    println!("Max Drawdown:   {:.2}%", m.max_drawdown_pct);
    println!("Win Rate:       {:.1}%", m.win_rate * 100.0);
    println!("Avg Trade P&L:  {:.2}", m.avg_trade_pnl);
    println!();
}
