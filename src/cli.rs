//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_signal_adapter::CsvSignalAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig};
use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::SigtraderError;
use crate::domain::execution::AllocationPolicy;
use crate::domain::report::BacktestReport;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;
use crate::ports::signal_port::SignalPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Signal replay backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a signal stream against historical prices
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Report output path (overrides [report] output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Trade log CSV path (overrides [report] trade_log)
        #[arg(long)]
        trade_log: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            trade_log,
        } => run_backtest_command(&config, output.as_ref(), trade_log.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SigtraderError> {
    let max_fraction = adapter.get_double("backtest", "max_fraction", 0.25);

    let allocation = match adapter
        .get_string("backtest", "allocation")
        .unwrap_or_else(|| "confidence_scaled".to_string())
        .as_str()
    {
        "confidence_scaled" => AllocationPolicy::ConfidenceScaled { max_fraction },
        "fixed_fraction" => AllocationPolicy::FixedFraction {
            fraction: max_fraction,
        },
        other => {
            return Err(SigtraderError::ConfigInvalid {
                section: "backtest".into(),
                key: "allocation".into(),
                reason: format!(
                    "unknown allocation policy '{}' (expected confidence_scaled or fixed_fraction)",
                    other
                ),
            });
        }
    };

    Ok(BacktestConfig {
        initial_cash: adapter.get_double("backtest", "initial_cash", 100_000.0),
        commission_rate: adapter.get_double("backtest", "commission_rate", 0.0),
        slippage_rate: adapter.get_double("backtest", "slippage_rate", 0.0),
        min_confidence: adapter.get_double("backtest", "min_confidence", 0.0),
        allocation,
    })
}

fn run_backtest_command(
    config_path: &PathBuf,
    output_override: Option<&PathBuf>,
    trade_log_override: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Load market data
    let prices_path = PathBuf::from(adapter.get_string("data", "prices").unwrap_or_default());
    let benchmark_path = adapter.get_string("data", "benchmark").map(PathBuf::from);
    let data_port = CsvDataAdapter::new(prices_path, benchmark_path);

    let prices = match data_port.load_prices() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Loaded {} bars across {} tickers",
        prices.bar_count(),
        prices.ticker_count()
    );

    let benchmark = match data_port.load_benchmark() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Load signal stream
    let signals_path = PathBuf::from(adapter.get_string("data", "signals").unwrap_or_default());
    let signal_port = CsvSignalAdapter::new(signals_path);
    let load = match signal_port.load_signals() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if load.skipped > 0 {
        eprintln!(
            "Loaded {} signals ({} malformed rows skipped)",
            load.signals.len(),
            load.skipped
        );
    } else {
        eprintln!("Loaded {} signals", load.signals.len());
    }

    // Stage 4: Run the replay
    let result = match run_backtest(&prices, &load.signals, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "Executed {} trades over {} dates",
        result.trades.len(),
        result.equity_curve.len()
    );

    // Stage 5: Compute the report
    let report =
        BacktestReport::from_result(&result, bt_config.initial_cash, benchmark.as_deref());

    eprintln!("\n=== Results ===");
    eprintln!(
        "Total Return:     {:.2}%",
        report.performance.total_return * 100.0
    );
    eprintln!(
        "Annualized:       {:.2}%",
        report.performance.annualized_return * 100.0
    );
    eprintln!("Sharpe Ratio:     {:.2}", report.performance.sharpe_ratio);
    eprintln!(
        "Max Drawdown:     -{:.1}%",
        report.performance.max_drawdown * 100.0
    );
    eprintln!(
        "Volatility:       {:.2}%",
        report.risk.volatility * 100.0
    );
    eprintln!(
        "VaR 95 / CVaR 95: {:.2}% / {:.2}%",
        report.risk.var_95 * 100.0,
        report.risk.cvar_95 * 100.0
    );
    eprintln!("Total Trades:     {}", report.performance.total_trades);
    eprintln!(
        "Win Rate:         {:.1}%",
        report.performance.win_rate * 100.0
    );
    eprintln!("Profit Factor:    {:.2}", report.performance.profit_factor);

    // Stage 6: Write outputs
    let report_port = JsonReportAdapter;
    let output = output_override
        .cloned()
        .or_else(|| adapter.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.json"));

    if let Err(e) = report_port.write_report(&report, &output) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("\nReport written to: {}", output.display());

    let trade_log = trade_log_override
        .cloned()
        .or_else(|| adapter.get_string("report", "trade_log").map(PathBuf::from));
    if let Some(path) = trade_log {
        if let Err(e) = report_port.write_trade_log(&result.trades, &path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Trade log written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match build_backtest_config(&adapter) {
        Ok(config) => {
            eprintln!("  initial_cash:    {}", config.initial_cash);
            eprintln!("  commission_rate: {}", config.commission_rate);
            eprintln!("  slippage_rate:   {}", config.slippage_rate);
            eprintln!("  min_confidence:  {}", config.min_confidence);
            eprintln!("  allocation:      {:?}", config.allocation);
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
