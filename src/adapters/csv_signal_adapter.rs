//! CSV signal stream adapter.
//!
//! Header `date,ticker,action,confidence`. File order is arrival order and
//! is preserved exactly; rows with missing or unparseable fields are
//! skipped and counted, never fatal.

use crate::domain::error::SigtraderError;
use crate::domain::signal::{Action, Signal};
use crate::ports::signal_port::{SignalLoad, SignalPort};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvSignalAdapter {
    path: PathBuf,
}

impl CsvSignalAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn parse_signal(record: &csv::StringRecord) -> Option<Signal> {
    let date = NaiveDate::parse_from_str(record.get(0)?.trim(), "%Y-%m-%d").ok()?;
    let ticker = record.get(1)?;
    let action: Action = record.get(2)?.parse().ok()?;
    let confidence: f64 = record.get(3)?.trim().parse().ok()?;

    Signal::new(date, ticker, action, confidence).ok()
}

impl SignalPort for CsvSignalAdapter {
    fn load_signals(&self) -> Result<SignalLoad, SigtraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SigtraderError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        // Flexible: a row with missing fields is malformed, not fatal.
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut signals = Vec::new();
        let mut skipped = 0usize;

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SigtraderError::Data {
                reason: format!("CSV parse error in {}: {}", self.path.display(), e),
            })?;

            match parse_signal(&record) {
                Some(signal) => signals.push(signal),
                None => {
                    skipped += 1;
                    eprintln!(
                        "warning: skipping malformed signal row {} in {}",
                        row + 2,
                        self.path.display()
                    );
                }
            }
        }

        Ok(SignalLoad { signals, skipped })
    }
}
