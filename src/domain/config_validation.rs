//! Configuration validation.
//!
//! Validates all config fields once, before a run is constructed.

use crate::domain::error::SigtraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_initial_cash(config)?;
    validate_commission_rate(config)?;
    validate_slippage_rate(config)?;
    validate_min_confidence(config)?;
    validate_max_fraction(config)?;
    validate_allocation(config)?;
    validate_data_paths(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "initial_cash", 0.0);
    if value <= 0.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission_rate(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "commission_rate", 0.0);
    if value < 0.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "commission_rate".to_string(),
            reason: "commission_rate must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_slippage_rate(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "slippage_rate", 0.0);
    if value < 0.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "slippage_rate".to_string(),
            reason: "slippage_rate must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_min_confidence(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "min_confidence", 0.0);
    if !(0.0..=1.0).contains(&value) {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "min_confidence".to_string(),
            reason: "min_confidence must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_max_fraction(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "max_fraction", 0.25);
    if value <= 0.0 || value > 1.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "max_fraction".to_string(),
            reason: "max_fraction must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_allocation(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("backtest", "allocation") {
        None => Ok(()),
        Some(value) => match value.as_str() {
            "confidence_scaled" | "fixed_fraction" => Ok(()),
            other => Err(SigtraderError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "allocation".to_string(),
                reason: format!(
                    "unknown allocation policy '{}' (expected confidence_scaled or fixed_fraction)",
                    other
                ),
            }),
        },
    }
}

fn validate_data_paths(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    for key in ["prices", "signals"] {
        match config.get_string("data", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(SigtraderError::ConfigMissing {
                    section: "data".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}
