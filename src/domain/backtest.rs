//! Backtest run loop: signal replay with lockstep equity tracking.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::bar::PriceSeries;
use super::error::SigtraderError;
use super::execution::{execute_signal, AllocationPolicy, ExecutionConfig, TradeRecord};
use super::ledger::Ledger;
use super::signal::Signal;
use super::valuation::{market_value, EquityPoint};
use crate::ports::observer_port::RunObserver;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    pub commission_rate: f64,
    pub slippage_rate: f64,
    pub min_confidence: f64,
    pub allocation: AllocationPolicy,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: 100_000.0,
            commission_rate: 0.0,
            slippage_rate: 0.0,
            min_confidence: 0.0,
            allocation: AllocationPolicy::ConfidenceScaled { max_fraction: 0.25 },
        }
    }
}

impl BacktestConfig {
    pub fn execution(&self) -> ExecutionConfig {
        ExecutionConfig {
            commission_rate: self.commission_rate,
            slippage_rate: self.slippage_rate,
            min_confidence: self.min_confidence,
            allocation: self.allocation.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub ledger: Ledger,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
}

/// Replay the signal stream against the price series.
///
/// Walks the unified price timeline in ascending order; each date executes
/// that date's signals in arrival order, then records an equity point, so
/// the curve reflects the ledger exactly as of each date. Empty inputs
/// produce zero trades and an empty curve, not an error.
pub fn run_backtest(
    prices: &PriceSeries,
    signals: &[Signal],
    config: &BacktestConfig,
) -> Result<BacktestResult, SigtraderError> {
    run(prices, signals, config, None)
}

/// Same as [`run_backtest`], notifying `observer` after each trade and each
/// valuation step.
pub fn run_backtest_observed(
    prices: &PriceSeries,
    signals: &[Signal],
    config: &BacktestConfig,
    observer: &mut dyn RunObserver,
) -> Result<BacktestResult, SigtraderError> {
    run(prices, signals, config, Some(observer))
}

fn run(
    prices: &PriceSeries,
    signals: &[Signal],
    config: &BacktestConfig,
    mut observer: Option<&mut dyn RunObserver>,
) -> Result<BacktestResult, SigtraderError> {
    if !(config.initial_cash > 0.0) {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }

    let execution = config.execution();
    let mut ledger = Ledger::new(config.initial_cash);
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::new();

    // Arrival order within each date is preserved; signals on dates with no
    // bar for any instrument are never reached and drop out as missing-data.
    let mut by_date: HashMap<NaiveDate, Vec<&Signal>> = HashMap::new();
    for signal in signals {
        by_date.entry(signal.date).or_default().push(signal);
    }

    for date in prices.timeline() {
        if let Some(batch) = by_date.get(&date) {
            for signal in batch {
                if let Some(record) = execute_signal(&mut ledger, signal, prices, &execution) {
                    if let Some(obs) = observer.as_deref_mut() {
                        obs.on_trade(&record);
                    }
                    trades.push(record);
                }
            }
        }

        let equity = market_value(&ledger, prices, date);
        if let Some(obs) = observer.as_deref_mut() {
            obs.on_equity(date, equity);
        }
        equity_curve.push(EquityPoint { date, equity });
    }

    Ok(BacktestResult {
        ledger,
        trades,
        equity_curve,
    })
}
