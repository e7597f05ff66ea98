//! Dispersion and tail-risk statistics over the daily return series.

use serde::Serialize;
use std::collections::HashMap;

use super::valuation::{daily_returns, EquityPoint};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const VAR_TAIL: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub volatility: f64,
    /// Empirical 5th-percentile daily return; negative for a loss threshold.
    pub var_95: f64,
    /// Mean of the returns at or below `var_95`.
    pub cvar_95: f64,
    /// 0 when no benchmark is supplied or its variance is 0.
    pub beta: f64,
    pub correlation_to_market: f64,
}

impl RiskMetrics {
    /// Benchmark alignment is by date: only dates present in both return
    /// series form pairs for beta and correlation. Fewer than two pairs, an
    /// absent benchmark, or zero benchmark variance report 0.
    pub fn compute(curve: &[EquityPoint], benchmark: Option<&[EquityPoint]>) -> Self {
        let dated_returns = daily_returns(curve);
        let returns: Vec<f64> = dated_returns.iter().map(|&(_, r)| r).collect();

        let volatility = if returns.len() >= 2 {
            sample_stddev(&returns) * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            0.0
        };

        let (var_95, cvar_95) = historical_var_cvar(&returns);

        let (beta, correlation_to_market) = match benchmark {
            Some(bench) => {
                let market: HashMap<_, _> = daily_returns(bench).into_iter().collect();
                let pairs: Vec<(f64, f64)> = dated_returns
                    .iter()
                    .filter_map(|(date, r)| market.get(date).map(|m| (*r, *m)))
                    .collect();
                beta_and_correlation(&pairs)
            }
            None => (0.0, 0.0),
        };

        RiskMetrics {
            volatility,
            var_95,
            cvar_95,
            beta,
            correlation_to_market,
        }
    }
}

/// Historical-simulation VaR/CVaR: the 5th percentile of the sorted
/// empirical distribution and the mean of the tail at or below it.
fn historical_var_cvar(returns: &[f64]) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let index = ((VAR_TAIL * sorted.len() as f64) as usize).min(sorted.len() - 1);
    let var = sorted[index];

    let tail = &sorted[..=index];
    let cvar = tail.iter().sum::<f64>() / tail.len() as f64;

    (var, cvar)
}

fn beta_and_correlation(pairs: &[(f64, f64)]) -> (f64, f64) {
    if pairs.len() < 2 {
        return (0.0, 0.0);
    }

    let n = pairs.len() as f64;
    let mean_r = pairs.iter().map(|&(r, _)| r).sum::<f64>() / n;
    let mean_m = pairs.iter().map(|&(_, m)| m).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_r = 0.0;
    let mut var_m = 0.0;
    for &(r, m) in pairs {
        covariance += (r - mean_r) * (m - mean_m);
        var_r += (r - mean_r).powi(2);
        var_m += (m - mean_m).powi(2);
    }
    covariance /= n - 1.0;
    var_r /= n - 1.0;
    var_m /= n - 1.0;

    let beta = if var_m > 0.0 { covariance / var_m } else { 0.0 };

    let denom = (var_r * var_m).sqrt();
    let correlation = if denom > 0.0 { covariance / denom } else { 0.0 };

    (beta, correlation)
}

fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                equity,
            })
            .collect()
    }

    #[test]
    fn empty_curve_reports_zeroes() {
        let metrics = RiskMetrics::compute(&[], None);
        assert_relative_eq!(metrics.volatility, 0.0);
        assert_relative_eq!(metrics.var_95, 0.0);
        assert_relative_eq!(metrics.cvar_95, 0.0);
        assert_relative_eq!(metrics.beta, 0.0);
        assert_relative_eq!(metrics.correlation_to_market, 0.0);
    }

    #[test]
    fn flat_curve_has_zero_volatility() {
        let curve = make_curve(&[100.0, 100.0, 100.0, 100.0]);
        let metrics = RiskMetrics::compute(&curve, None);
        assert_relative_eq!(metrics.volatility, 0.0);
    }

    #[test]
    fn volatility_annualizes_sample_stddev() {
        let curve = make_curve(&[100.0, 110.0, 99.0]);
        let metrics = RiskMetrics::compute(&curve, None);

        // Returns: +0.10, -0.10; sample stddev of the pair.
        let returns = [0.10_f64, 99.0 / 110.0 - 1.0];
        let mean = (returns[0] + returns[1]) / 2.0;
        let expected = (((returns[0] - mean).powi(2) + (returns[1] - mean).powi(2)) / 1.0)
            .sqrt()
            * 252.0_f64.sqrt();
        assert_relative_eq!(metrics.volatility, expected, max_relative = 1e-9);
    }

    #[test]
    fn var_is_fifth_percentile_of_returns() {
        // 20 equal steps, one crash day: the crash is the 5% tail.
        let mut values = Vec::new();
        let mut equity = 100.0;
        values.push(equity);
        for i in 0..20 {
            let r = if i == 7 { -0.20 } else { 0.01 };
            equity *= 1.0 + r;
            values.push(equity);
        }
        let metrics = RiskMetrics::compute(&make_curve(&values), None);

        // index = floor(0.05 * 20) = 1, second-worst return
        assert_relative_eq!(metrics.var_95, 0.01, max_relative = 1e-9);
        // tail mean of {-0.20, 0.01}
        assert_relative_eq!(metrics.cvar_95, (-0.20 + 0.01) / 2.0, max_relative = 1e-9);
        assert!(metrics.cvar_95 <= metrics.var_95);
    }

    #[test]
    fn var_single_return_uses_it() {
        let curve = make_curve(&[100.0, 95.0]);
        let metrics = RiskMetrics::compute(&curve, None);
        assert_relative_eq!(metrics.var_95, -0.05, max_relative = 1e-9);
        assert_relative_eq!(metrics.cvar_95, -0.05, max_relative = 1e-9);
    }

    #[test]
    fn beta_of_identical_series_is_one() {
        let curve = make_curve(&[100.0, 102.0, 99.0, 103.0, 101.0]);
        let metrics = RiskMetrics::compute(&curve, Some(&curve));
        assert_relative_eq!(metrics.beta, 1.0, max_relative = 1e-9);
        assert_relative_eq!(metrics.correlation_to_market, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn beta_scales_with_leverage() {
        let market = make_curve(&[100.0, 102.0, 99.0, 103.0]);
        // Strategy moves twice the market's daily return each day.
        let mut values = vec![100.0_f64];
        for (_, m) in daily_returns(&market) {
            let last = *values.last().unwrap();
            values.push(last * (1.0 + 2.0 * m));
        }
        let strategy = make_curve(&values);

        let metrics = RiskMetrics::compute(&strategy, Some(&market));
        assert_relative_eq!(metrics.beta, 2.0, max_relative = 1e-6);
        assert_relative_eq!(metrics.correlation_to_market, 1.0, max_relative = 1e-6);
    }

    #[test]
    fn inverse_series_correlates_negatively() {
        let market = make_curve(&[100.0, 102.0, 99.0, 103.0]);
        let mut values = vec![100.0_f64];
        for (_, m) in daily_returns(&market) {
            let last = *values.last().unwrap();
            values.push(last * (1.0 - m));
        }
        let strategy = make_curve(&values);

        let metrics = RiskMetrics::compute(&strategy, Some(&market));
        assert!(metrics.beta < 0.0);
        assert_relative_eq!(metrics.correlation_to_market, -1.0, max_relative = 1e-6);
    }

    #[test]
    fn no_benchmark_reports_zero_beta() {
        let curve = make_curve(&[100.0, 102.0, 99.0]);
        let metrics = RiskMetrics::compute(&curve, None);
        assert_relative_eq!(metrics.beta, 0.0);
        assert_relative_eq!(metrics.correlation_to_market, 0.0);
    }

    #[test]
    fn flat_benchmark_reports_zero_beta() {
        let curve = make_curve(&[100.0, 102.0, 99.0, 103.0]);
        let flat = make_curve(&[50.0, 50.0, 50.0, 50.0]);
        let metrics = RiskMetrics::compute(&curve, Some(&flat));
        assert_relative_eq!(metrics.beta, 0.0);
        assert_relative_eq!(metrics.correlation_to_market, 0.0);
    }

    #[test]
    fn benchmark_aligned_by_date_not_index() {
        let curve = make_curve(&[100.0, 102.0, 99.0, 103.0]);
        // Benchmark starts two days later: only the overlapping dates pair.
        let bench: Vec<EquityPoint> = make_curve(&[50.0, 51.0, 50.5, 52.0])
            .into_iter()
            .map(|mut p| {
                p.date += chrono::Duration::days(2);
                p
            })
            .collect();

        // Overlap is a single paired date, below the two-pair minimum.
        let metrics = RiskMetrics::compute(&curve, Some(&bench));
        assert_relative_eq!(metrics.beta, 0.0);
        assert_relative_eq!(metrics.correlation_to_market, 0.0);
    }
}
