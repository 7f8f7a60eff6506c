//! Configuration validation.
//!
//! Validates all config fields before a backtest runs.

use crate::domain::error::TinytraderError;
use crate::ports::config_port::ConfigPort;
use chrono::{NaiveDate, NaiveDateTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const STRATEGY_KINDS: [&str; 3] = ["reversal", "momentum", "threshold"];

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TinytraderError> {
    validate_initial_capital(config)?;
    validate_fraction(config, "fee")?;
    validate_fraction(config, "slippage")?;
    validate_bounds(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TinytraderError> {
    validate_kind(config)?;
    validate_price_field(config)?;
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TinytraderError> {
    let value = config
        .get_number("backtest", "initial_capital")?
        .ok_or_else(|| TinytraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
        })?;
    if !(value.is_finite() && value > 0.0) {
        return Err(TinytraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_fraction(config: &dyn ConfigPort, key: &str) -> Result<(), TinytraderError> {
    let value = config.get_number("backtest", key)?.unwrap_or(0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(TinytraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be a fraction in [0, 1)"),
        });
    }
    Ok(())
}

/// Timestamp layout accepted for range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    Date,
    DateTime,
}

/// Classify `value` as a zero-padded date or date-time. Anything else would
/// not sort lexically in chronological order.
pub fn timestamp_format(value: &str) -> Option<TimestampFormat> {
    // chrono accepts unpadded fields, so the width check keeps "2022-1-5" out.
    if value.len() == 10 && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok() {
        return Some(TimestampFormat::Date);
    }
    if value.len() == 19 && NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).is_ok() {
        return Some(TimestampFormat::DateTime);
    }
    None
}

fn parse_bound(config: &dyn ConfigPort, key: &str) -> Result<TimestampFormat, TinytraderError> {
    let value = config
        .get_string("backtest", key)
        .ok_or_else(|| TinytraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        })?;
    timestamp_format(value.trim()).ok_or_else(|| TinytraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: "expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS".to_string(),
    })
}

fn validate_bounds(config: &dyn ConfigPort) -> Result<(), TinytraderError> {
    let start = parse_bound(config, "start")?;
    let end = parse_bound(config, "end")?;
    if start != end {
        return Err(TinytraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "end".to_string(),
            reason: "start and end must use the same timestamp format".to_string(),
        });
    }
    Ok(())
}

fn validate_kind(config: &dyn ConfigPort) -> Result<(), TinytraderError> {
    let kind = config
        .get_string("strategy", "kind")
        .map(|k| k.trim().to_lowercase())
        .ok_or_else(|| TinytraderError::ConfigMissing {
            section: "strategy".to_string(),
            key: "kind".to_string(),
        })?;

    if !STRATEGY_KINDS.contains(&kind.as_str()) {
        return Err(TinytraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "kind".to_string(),
            reason: format!(
                "unknown strategy kind '{kind}' (expected one of: {})",
                STRATEGY_KINDS.join(", ")
            ),
        });
    }

    if kind == "threshold" {
        for key in ["buy_below", "sell_above"] {
            if config.get_number("strategy", key)?.is_none() {
                return Err(TinytraderError::ConfigMissing {
                    section: "strategy".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_price_field(config: &dyn ConfigPort) -> Result<(), TinytraderError> {
    match config.get_string("strategy", "price_field") {
        Some(s) if s.trim().is_empty() => Err(TinytraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "price_field".to_string(),
            reason: "price_field must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}
