//! JSON report and CSV trade-log adapter.

use crate::domain::error::SigtraderError;
use crate::domain::execution::TradeRecord;
use crate::domain::report::BacktestReport;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write_report(&self, report: &BacktestReport, path: &Path) -> Result<(), SigtraderError> {
        let json =
            serde_json::to_string_pretty(report).map_err(|e| SigtraderError::Report {
                reason: format!("failed to serialize report: {}", e),
            })?;
        fs::write(path, json).map_err(|e| SigtraderError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        })
    }

    fn write_trade_log(
        &self,
        trades: &[TradeRecord],
        path: &Path,
    ) -> Result<(), SigtraderError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| SigtraderError::Report {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        wtr.write_record([
            "date",
            "ticker",
            "side",
            "quantity",
            "price",
            "commission",
            "slippage_cost",
            "realized_pnl",
            "cash_after",
        ])
        .map_err(|e| SigtraderError::Report {
            reason: format!("failed to write trade log header: {}", e),
        })?;

        for trade in trades {
            wtr.write_record([
                trade.date.format("%Y-%m-%d").to_string(),
                trade.ticker.clone(),
                trade.side.to_string(),
                trade.quantity.to_string(),
                format!("{:.6}", trade.price),
                format!("{:.6}", trade.commission),
                format!("{:.6}", trade.slippage_cost),
                format!("{:.6}", trade.realized_pnl),
                format!("{:.6}", trade.cash_after),
            ])
            .map_err(|e| SigtraderError::Report {
                reason: format!("failed to write trade log row: {}", e),
            })?;
        }

        wtr.flush().map_err(|e| SigtraderError::Report {
            reason: format!("failed to flush {}: {}", path.display(), e),
        })
    }
}
