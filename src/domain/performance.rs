//! Return- and trade-outcome statistics.

use serde::Serialize;

use super::execution::{TradeRecord, TradeSide};
use super::valuation::{daily_returns, EquityPoint};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    /// `f64::INFINITY` when there are winners but no losers.
    pub profit_factor: f64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl PerformanceMetrics {
    /// Every degenerate case (empty curve, zero variance, no closed trades,
    /// no losers) falls back to a documented value instead of dividing by
    /// zero: 0 everywhere except `profit_factor`, which reports infinity
    /// when there are wins and no losses.
    pub fn compute(curve: &[EquityPoint], trades: &[TradeRecord], initial_cash: f64) -> Self {
        let final_value = curve.last().map(|p| p.equity).unwrap_or(initial_cash);

        let total_return = if initial_cash > 0.0 {
            (final_value - initial_cash) / initial_cash
        } else {
            0.0
        };

        // Trading days span the curve: points minus one.
        let annualized_return = if curve.len() >= 2 {
            let trading_days = (curve.len() - 1) as f64;
            (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / trading_days) - 1.0
        } else {
            0.0
        };

        let sharpe_ratio = compute_sharpe(curve);
        let max_drawdown = compute_drawdown(curve);

        // Closed trades are the sell records; buys only open exposure.
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut closed = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trade in trades.iter().filter(|t| t.side == TradeSide::Sell) {
            closed += 1;
            let pnl = trade.realized_pnl;
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                if pnl > largest_win {
                    largest_win = pnl;
                }
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                if pnl.abs() > largest_loss {
                    largest_loss = pnl.abs();
                }
            }
        }

        let win_rate = if closed > 0 {
            trades_won as f64 / closed as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };

        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        PerformanceMetrics {
            total_return,
            annualized_return,
            sharpe_ratio,
            max_drawdown,
            win_rate,
            profit_factor,
            total_trades: trades.len(),
            trades_won,
            trades_lost,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
        }
    }
}

/// Annualized mean-over-sample-stddev of daily returns; 0 on fewer than two
/// returns or zero dispersion.
fn compute_sharpe(curve: &[EquityPoint]) -> f64 {
    let returns: Vec<f64> = daily_returns(curve).into_iter().map(|(_, r)| r).collect();
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        (mean / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}

/// Largest peak-to-trough decline as a fraction of the running peak.
fn compute_drawdown(curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
