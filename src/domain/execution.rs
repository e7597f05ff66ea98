//! Signal execution and fill simulation.
//!
//! Turns buy/sell signals into ledger mutations and trade records, applying
//! slippage to the fill price, sizing buys from the allocation policy, and
//! charging commission on trade notional.

use chrono::NaiveDate;

use super::bar::PriceSeries;
use super::ledger::Ledger;
use super::signal::{Action, Signal};

/// How much of current cash a buy signal commits.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationPolicy {
    /// `target = cash * min(1, max_fraction * confidence)`. Higher confidence
    /// buys more; a single trade can never target more than available cash.
    ConfidenceScaled { max_fraction: f64 },
    /// `target = cash * min(1, fraction)` regardless of confidence.
    FixedFraction { fraction: f64 },
}

impl AllocationPolicy {
    pub fn target_value(&self, cash: f64, confidence: f64) -> f64 {
        let fraction = match self {
            AllocationPolicy::ConfidenceScaled { max_fraction } => max_fraction * confidence,
            AllocationPolicy::FixedFraction { fraction } => *fraction,
        };
        cash * fraction.min(1.0)
    }
}

/// Execution parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub commission_rate: f64,
    pub slippage_rate: f64,
    pub min_confidence: f64,
    pub allocation: AllocationPolicy,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            commission_rate: 0.0,
            slippage_rate: 0.0,
            min_confidence: 0.0,
            allocation: AllocationPolicy::ConfidenceScaled { max_fraction: 0.25 },
        }
    }
}

/// Buy fill: execution_price = close * (1 + slippage_rate)
pub fn buy_fill_price(close: f64, slippage_rate: f64) -> f64 {
    close * (1.0 + slippage_rate)
}

/// Sell fill: execution_price = close * (1 - slippage_rate)
pub fn sell_fill_price(close: f64, slippage_rate: f64) -> f64 {
    close * (1.0 - slippage_rate)
}

/// Commission on trade notional.
pub fn commission(quantity: i64, fill_price: f64, commission_rate: f64) -> f64 {
    quantity as f64 * fill_price * commission_rate
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// One executed trade. Append-only: hold signals and rejected trades leave
/// no record.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub ticker: String,
    pub side: TradeSide,
    pub quantity: i64,
    pub price: f64,
    pub commission: f64,
    pub slippage_cost: f64,
    /// Against the pre-sale average price, net of the sell commission.
    /// Always 0.0 on buys.
    pub realized_pnl: f64,
    pub cash_after: f64,
}

/// Execute a single signal against the ledger.
///
/// Returns `None` on every non-trading path: no bar for (ticker, date),
/// hold action, confidence below the minimum, quantity rounding to zero,
/// insufficient cash, or a sell with no open position.
pub fn execute_signal(
    ledger: &mut Ledger,
    signal: &Signal,
    prices: &PriceSeries,
    config: &ExecutionConfig,
) -> Option<TradeRecord> {
    let close = prices.close_on(&signal.ticker, signal.date)?;

    if signal.action == Action::Hold || signal.confidence < config.min_confidence {
        return None;
    }

    match signal.action {
        Action::Buy => try_buy(ledger, signal, close, config),
        Action::Sell => try_sell(ledger, signal, close, config),
        Action::Hold => None,
    }
}

fn try_buy(
    ledger: &mut Ledger,
    signal: &Signal,
    close: f64,
    config: &ExecutionConfig,
) -> Option<TradeRecord> {
    let target_value = config
        .allocation
        .target_value(ledger.cash(), signal.confidence);
    let fill_price = buy_fill_price(close, config.slippage_rate);

    let quantity = (target_value / fill_price).floor() as i64;
    if quantity <= 0 {
        return None;
    }

    let cost = quantity as f64 * fill_price;
    let fee = commission(quantity, fill_price, config.commission_rate);
    if cost + fee > ledger.cash() {
        return None;
    }

    let cash_after = ledger.accumulate(&signal.ticker, quantity, fill_price, fee);

    Some(TradeRecord {
        date: signal.date,
        ticker: signal.ticker.clone(),
        side: TradeSide::Buy,
        quantity,
        price: fill_price,
        commission: fee,
        slippage_cost: quantity as f64 * close * config.slippage_rate,
        realized_pnl: 0.0,
        cash_after,
    })
}

fn try_sell(
    ledger: &mut Ledger,
    signal: &Signal,
    close: f64,
    config: &ExecutionConfig,
) -> Option<TradeRecord> {
    let quantity = ledger.position(&signal.ticker)?.quantity;
    if quantity <= 0 {
        return None;
    }

    // Sells fully close the position; partial exits are not modeled.
    let fill_price = sell_fill_price(close, config.slippage_rate);
    let fee = commission(quantity, fill_price, config.commission_rate);
    let outcome = ledger.liquidate(&signal.ticker, fill_price, fee)?;

    Some(TradeRecord {
        date: signal.date,
        ticker: signal.ticker.clone(),
        side: TradeSide::Sell,
        quantity: outcome.quantity,
        price: fill_price,
        commission: fee,
        slippage_cost: outcome.quantity as f64 * close * config.slippage_rate,
        realized_pnl: outcome.realized_pnl,
        cash_after: ledger.cash(),
    })
}
