//! Report output port trait.

use std::path::Path;

use crate::domain::error::SigtraderError;
use crate::domain::execution::TradeRecord;
use crate::domain::report::BacktestReport;

/// Port for writing run outputs: the metrics report and the audit trade log.
pub trait ReportPort {
    fn write_report(&self, report: &BacktestReport, path: &Path) -> Result<(), SigtraderError>;

    fn write_trade_log(&self, trades: &[TradeRecord], path: &Path)
        -> Result<(), SigtraderError>;
}
