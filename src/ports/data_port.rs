//! Market data port trait.

use crate::domain::bar::PriceSeries;
use crate::domain::error::SigtraderError;
use crate::domain::valuation::EquityPoint;

/// Source of pre-loaded market data. The replay itself never touches I/O;
/// adapters load everything up front into an in-memory [`PriceSeries`].
pub trait MarketDataPort {
    fn load_prices(&self) -> Result<PriceSeries, SigtraderError>;

    /// Benchmark series for beta/correlation, when configured.
    fn load_benchmark(&self) -> Result<Option<Vec<EquityPoint>>, SigtraderError>;
}
