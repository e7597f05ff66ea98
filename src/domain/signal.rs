//! Trading signal representation.

use chrono::NaiveDate;
use std::str::FromStr;

/// Recommended action carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Action::Buy),
            "sell" => Ok(Action::Sell),
            "hold" => Ok(Action::Hold),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
            Action::Hold => "hold",
        };
        write!(f, "{}", s)
    }
}

/// One upstream recommendation for one instrument on one day.
///
/// Arrival order is significant: signals are replayed exactly as supplied,
/// never re-sorted by confidence. Validation happens at ingestion; a
/// constructed `Signal` is always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub date: NaiveDate,
    pub ticker: String,
    pub action: Action,
    pub confidence: f64,
}

impl Signal {
    /// Rejects empty tickers and confidence outside [0, 1].
    pub fn new(
        date: NaiveDate,
        ticker: &str,
        action: Action,
        confidence: f64,
    ) -> Result<Self, String> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err("empty ticker".to_string());
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence {} outside [0, 1]", confidence));
        }
        Ok(Signal {
            date,
            ticker: ticker.to_uppercase(),
            action,
            confidence,
        })
    }
}
