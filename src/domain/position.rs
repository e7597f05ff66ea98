//! Open position tracking with weighted-average cost basis.

/// A long holding in one instrument.
///
/// Invariant: `total_cost == quantity as f64 * average_price` within
/// floating tolerance. A position never holds quantity 0; the ledger removes
/// it instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub quantity: i64,
    pub average_price: f64,
    pub total_cost: f64,
}

impl Position {
    pub fn open(ticker: &str, quantity: i64, fill_price: f64) -> Self {
        Position {
            ticker: ticker.to_string(),
            quantity,
            average_price: fill_price,
            total_cost: quantity as f64 * fill_price,
        }
    }

    /// Add to the holding, recomputing the weighted-average entry price.
    /// The average is never recomputed on sells.
    pub fn accumulate(&mut self, quantity: i64, fill_price: f64) {
        let added_cost = quantity as f64 * fill_price;
        let new_quantity = self.quantity + quantity;
        self.total_cost += added_cost;
        self.quantity = new_quantity;
        self.average_price = self.total_cost / new_quantity as f64;
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity as f64 * (price - self.average_price)
    }
}
