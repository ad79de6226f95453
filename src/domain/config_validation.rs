//! Configuration validation.
//!
//! Validates all config fields before any price data is loaded.

use crate::domain::error::CrossoverError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_SHORT_WINDOW: i64 = 40;
pub const DEFAULT_LONG_WINDOW: i64 = 100;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), CrossoverError> {
    validate_ticker(config)?;
    validate_dates(config)?;
    validate_initial_capital(config)?;
    validate_trade_size(config)?;
    validate_windows(config)?;
    Ok(())
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), CrossoverError> {
    match config.get_string("backtest", "ticker") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(CrossoverError::ConfigMissing {
            section: "backtest".to_string(),
            key: "ticker".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CrossoverError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(CrossoverError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, CrossoverError> {
    match value {
        None => Err(CrossoverError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            CrossoverError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), CrossoverError> {
    let value = config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if !value.is_finite() || value <= 0.0 {
        return Err(CrossoverError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_trade_size(config: &dyn ConfigPort) -> Result<(), CrossoverError> {
    let value = config.get_int("backtest", "trade_size", 100);
    if value <= 0 || value > i64::from(u32::MAX) {
        return Err(CrossoverError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "trade_size".to_string(),
            reason: "trade_size must be a positive whole number of shares".to_string(),
        });
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), CrossoverError> {
    let short = config.get_int("strategy", "short_window", DEFAULT_SHORT_WINDOW);
    let long = config.get_int("strategy", "long_window", DEFAULT_LONG_WINDOW);

    if short <= 0 {
        return Err(CrossoverError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be positive".to_string(),
        });
    }
    if long <= short {
        return Err(CrossoverError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "long_window".to_string(),
            reason: "long_window must be greater than short_window".to_string(),
        });
    }
    Ok(())
}
