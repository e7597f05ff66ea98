//! Mark-to-market portfolio valuation and the equity curve.

use chrono::NaiveDate;

use super::bar::PriceSeries;
use super::ledger::Ledger;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Total portfolio value on `date`: cash plus every open position marked at
/// its latest close at or before the date. A position with no price history
/// by then contributes its cost basis instead of being dropped.
pub fn market_value(ledger: &Ledger, prices: &PriceSeries, date: NaiveDate) -> f64 {
    let position_value: f64 = ledger
        .positions()
        .map(|pos| match prices.close_at_or_before(&pos.ticker, date) {
            Some(price) => pos.market_value(price),
            None => pos.total_cost,
        })
        .sum();
    ledger.cash() + position_value
}

/// Day-over-day simple returns of an equity curve, `v_t / v_{t-1} - 1`,
/// each stamped with the later date. A zero-valued prior point yields a 0
/// return rather than a division by zero.
pub fn daily_returns(curve: &[EquityPoint]) -> Vec<(NaiveDate, f64)> {
    curve
        .windows(2)
        .map(|w| {
            let prev = w[0].equity;
            let curr = w[1].equity;
            let r = if prev > 0.0 { curr / prev - 1.0 } else { 0.0 };
            (w[1].date, r)
        })
        .collect()
}
