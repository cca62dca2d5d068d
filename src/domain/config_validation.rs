//! Configuration validation.
//!
//! Runs over the raw config before any data is fetched.

use chrono::NaiveDate;

use crate::domain::error::SignalError;
use crate::ports::config_port::ConfigPort;

const PERIOD_KEYS: &[(&str, i64)] = &[
    ("ema_short_period", 12),
    ("ema_long_period", 26),
    ("rsi_window", 14),
    ("atr_window", 14),
    ("macd_fast", 12),
    ("macd_slow", 26),
    ("macd_signal", 9),
];

pub fn validate_scan_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_dates(config)?;
    validate_data_dir(config)?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_periods(config)?;
    validate_rsi_band(config)?;
    validate_multipliers(config)?;
    validate_holding_days(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SignalError {
    SignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "scan",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

/// Read a required `[scan]` date in YYYY-MM-DD form.
pub fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, SignalError> {
    let value = config
        .get_string("scan", key)
        .ok_or_else(|| SignalError::ConfigMissing {
            section: "scan".to_string(),
            key: key.to_string(),
        })?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            "scan",
            key,
            format!("invalid {key} format, expected YYYY-MM-DD"),
        )
    })
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), SignalError> {
    match config.get_string("scan", "data_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("scan", "data_dir", "data_dir must not be empty")),
        None => Err(SignalError::ConfigMissing {
            section: "scan".to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), SignalError> {
    for &(key, default) in PERIOD_KEYS {
        if config.get_int("signals", key, default) <= 0 {
            return Err(invalid("signals", key, format!("{key} must be positive")));
        }
    }
    Ok(())
}

fn validate_rsi_band(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let bot = config.get_double("signals", "rsi_buy_bot", 50.0);
    let top = config.get_double("signals", "rsi_buy_top", 80.0);

    for (key, value) in [("rsi_buy_bot", bot), ("rsi_buy_top", top)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("signals", key, "RSI bounds must be within 0-100"));
        }
    }
    if bot > top {
        return Err(invalid(
            "signals",
            "rsi_buy_bot",
            "rsi_buy_bot must not exceed rsi_buy_top",
        ));
    }
    Ok(())
}

fn validate_multipliers(config: &dyn ConfigPort) -> Result<(), SignalError> {
    for (key, default) in [("atr_multiplier", 2.0), ("trailing_atr_multiplier", 1.5)] {
        let value = config.get_double("signals", key, default);
        if !(value.is_finite() && value > 0.0) {
            return Err(invalid("signals", key, format!("{key} must be positive")));
        }
    }
    Ok(())
}

fn validate_holding_days(config: &dyn ConfigPort) -> Result<(), SignalError> {
    if config.get_int("signals", "max_holding_days", 10) < 0 {
        return Err(invalid(
            "signals",
            "max_holding_days",
            "max_holding_days must be non-negative",
        ));
    }
    Ok(())
}
