#![allow(dead_code)]

use chrono::NaiveDate;
use sigtrader::domain::backtest::BacktestConfig;
use sigtrader::domain::bar::{PriceBar, PriceSeries};
use sigtrader::domain::error::SigtraderError;
use sigtrader::domain::execution::AllocationPolicy;
use sigtrader::domain::signal::{Action, Signal};
use sigtrader::domain::valuation::EquityPoint;
use sigtrader::ports::data_port::MarketDataPort;
use sigtrader::ports::signal_port::{SignalLoad, SignalPort};

pub struct MockMarketDataPort {
    pub bars: Vec<PriceBar>,
    pub benchmark: Option<Vec<EquityPoint>>,
}

impl MockMarketDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self {
            bars,
            benchmark: None,
        }
    }

    pub fn with_benchmark(mut self, benchmark: Vec<EquityPoint>) -> Self {
        self.benchmark = Some(benchmark);
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn load_prices(&self) -> Result<PriceSeries, SigtraderError> {
        Ok(PriceSeries::from_bars(self.bars.clone()))
    }

    fn load_benchmark(&self) -> Result<Option<Vec<EquityPoint>>, SigtraderError> {
        Ok(self.benchmark.clone())
    }
}

pub struct MockSignalPort {
    pub signals: Vec<Signal>,
}

impl SignalPort for MockSignalPort {
    fn load_signals(&self) -> Result<SignalLoad, SigtraderError> {
        Ok(SignalLoad {
            signals: self.signals.clone(),
            skipped: 0,
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(ticker: &str, date_str: &str, close: f64) -> PriceBar {
    PriceBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1_000_000,
    }
}

pub fn make_signal(date_str: &str, ticker: &str, action: Action, confidence: f64) -> Signal {
    Signal::new(
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        ticker,
        action,
        confidence,
    )
    .unwrap()
}

/// Daily closes for one ticker starting at `start_price`, one bar per
/// calendar day, rising by 1.0 per day.
pub fn generate_bars(ticker: &str, start_date: &str, count: usize, start_price: f64) -> Vec<PriceBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| PriceBar {
            ticker: ticker.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64 - 0.5,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1_000,
        })
        .collect()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        initial_cash: 100_000.0,
        commission_rate: 0.001,
        slippage_rate: 0.0001,
        min_confidence: 0.0,
        allocation: AllocationPolicy::ConfidenceScaled { max_fraction: 0.125 },
    }
}

pub fn frictionless_config() -> BacktestConfig {
    BacktestConfig {
        initial_cash: 100_000.0,
        commission_rate: 0.0,
        slippage_rate: 0.0,
        min_confidence: 0.0,
        allocation: AllocationPolicy::FixedFraction { fraction: 0.1 },
    }
}
