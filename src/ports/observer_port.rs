//! Run observation port trait.

use crate::domain::execution::TradeRecord;
use chrono::NaiveDate;

/// Optional hooks notified as a replay progresses: once per executed trade
/// and once per valuation step. Correctness never depends on an observer;
/// the default implementations do nothing.
pub trait RunObserver {
    fn on_trade(&mut self, _trade: &TradeRecord) {}
    fn on_equity(&mut self, _date: NaiveDate, _equity: f64) {}
}
