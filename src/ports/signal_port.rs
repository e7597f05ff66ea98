//! Signal stream port trait.

use crate::domain::error::SigtraderError;
use crate::domain::signal::Signal;

/// Result of loading a signal stream: the well-formed signals in arrival
/// order plus the count of malformed rows that were skipped.
pub struct SignalLoad {
    pub signals: Vec<Signal>,
    pub skipped: usize,
}

pub trait SignalPort {
    fn load_signals(&self) -> Result<SignalLoad, SigtraderError>;
}
