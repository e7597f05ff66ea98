//! Fixed-shape backtest report.

use serde::Serialize;

use super::backtest::BacktestResult;
use super::performance::PerformanceMetrics;
use super::risk::RiskMetrics;
use super::valuation::EquityPoint;

/// The full metrics report for one run, serializable for downstream
/// consumers. Reporting presentation itself lives behind the report port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub performance: PerformanceMetrics,
    pub risk: RiskMetrics,
}

impl BacktestReport {
    pub fn from_result(
        result: &BacktestResult,
        initial_cash: f64,
        benchmark: Option<&[EquityPoint]>,
    ) -> Self {
        BacktestReport {
            performance: PerformanceMetrics::compute(
                &result.equity_curve,
                &result.trades,
                initial_cash,
            ),
            risk: RiskMetrics::compute(&result.equity_curve, benchmark),
        }
    }
}
