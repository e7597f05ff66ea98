//! CSV market data adapter.
//!
//! Prices arrive as one combined file with header
//! `ticker,date,open,high,low,close,volume`; the optional benchmark file has
//! header `date,value`. Malformed rows are skipped with a warning, an
//! unreadable file is a data error.

use crate::domain::bar::{PriceBar, PriceSeries};
use crate::domain::error::SigtraderError;
use crate::domain::valuation::EquityPoint;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    prices_path: PathBuf,
    benchmark_path: Option<PathBuf>,
}

impl CsvDataAdapter {
    pub fn new(prices_path: PathBuf, benchmark_path: Option<PathBuf>) -> Self {
        Self {
            prices_path,
            benchmark_path,
        }
    }
}

fn parse_bar(record: &csv::StringRecord) -> Option<PriceBar> {
    let ticker = record.get(0)?.trim();
    if ticker.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(record.get(1)?.trim(), "%Y-%m-%d").ok()?;
    let open: f64 = record.get(2)?.trim().parse().ok()?;
    let high: f64 = record.get(3)?.trim().parse().ok()?;
    let low: f64 = record.get(4)?.trim().parse().ok()?;
    let close: f64 = record.get(5)?.trim().parse().ok()?;
    let volume: i64 = record.get(6)?.trim().parse().ok()?;

    Some(PriceBar {
        ticker: ticker.to_uppercase(),
        date,
        open,
        high,
        low,
        close,
        volume,
    })
}

impl MarketDataPort for CsvDataAdapter {
    fn load_prices(&self) -> Result<PriceSeries, SigtraderError> {
        let content =
            fs::read_to_string(&self.prices_path).map_err(|e| SigtraderError::Data {
                reason: format!("failed to read {}: {}", self.prices_path.display(), e),
            })?;

        // Flexible: a row with missing fields is malformed, not fatal.
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut store = PriceSeries::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SigtraderError::Data {
                reason: format!("CSV parse error in {}: {}", self.prices_path.display(), e),
            })?;

            match parse_bar(&record) {
                Some(bar) => store.insert(bar),
                None => {
                    eprintln!(
                        "warning: skipping malformed price row {} in {}",
                        row + 2,
                        self.prices_path.display()
                    );
                }
            }
        }

        Ok(store)
    }

    fn load_benchmark(&self) -> Result<Option<Vec<EquityPoint>>, SigtraderError> {
        let path = match &self.benchmark_path {
            Some(p) => p,
            None => return Ok(None),
        };

        let content = fs::read_to_string(path).map_err(|e| SigtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SigtraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let parsed = (|| {
                let date = NaiveDate::parse_from_str(record.get(0)?.trim(), "%Y-%m-%d").ok()?;
                let equity: f64 = record.get(1)?.trim().parse().ok()?;
                Some(EquityPoint { date, equity })
            })();

            match parsed {
                Some(point) => points.push(point),
                None => {
                    eprintln!(
                        "warning: skipping malformed benchmark row {} in {}",
                        row + 2,
                        path.display()
                    );
                }
            }
        }

        points.sort_by_key(|p| p.date);
        Ok(Some(points))
    }
}
