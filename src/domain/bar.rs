//! Price bar representation and the in-memory price store.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One OHLCV bar for one instrument on one day. Immutable, externally supplied.
#[derive(Debug, Clone)]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Read-only per-instrument bar store indexed by date.
///
/// All lookups the replay needs are served from memory: the exact bar on a
/// date for execution, and the latest close at or before a date for
/// valuation.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    series: HashMap<String, BTreeMap<NaiveDate, PriceBar>>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bars(bars: Vec<PriceBar>) -> Self {
        let mut store = Self::new();
        for bar in bars {
            store.insert(bar);
        }
        store
    }

    /// A later bar for the same (ticker, date) replaces an earlier one.
    pub fn insert(&mut self, bar: PriceBar) {
        self.series
            .entry(bar.ticker.clone())
            .or_default()
            .insert(bar.date, bar);
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn ticker_count(&self) -> usize {
        self.series.len()
    }

    pub fn bar_count(&self) -> usize {
        self.series.values().map(|dates| dates.len()).sum()
    }

    pub fn bar_on(&self, ticker: &str, date: NaiveDate) -> Option<&PriceBar> {
        self.series.get(ticker)?.get(&date)
    }

    pub fn close_on(&self, ticker: &str, date: NaiveDate) -> Option<f64> {
        self.bar_on(ticker, date).map(|bar| bar.close)
    }

    /// Latest close at or before `date`, for marking positions on days the
    /// instrument did not trade.
    pub fn close_at_or_before(&self, ticker: &str, date: NaiveDate) -> Option<f64> {
        self.series
            .get(ticker)?
            .range(..=date)
            .next_back()
            .map(|(_, bar)| bar.close)
    }

    /// Union of all bar dates across instruments, ascending.
    pub fn timeline(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self
            .series
            .values()
            .flat_map(|dates| dates.keys().copied())
            .collect();
        dates.into_iter().collect()
    }
}
