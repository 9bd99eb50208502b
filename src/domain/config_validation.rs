//! Configuration validation.
//!
//! Every key is optional; missing keys take the built-in defaults. A key that
//! is present must parse and be in range, otherwise the whole config is
//! rejected before any data is loaded.

use std::str::FromStr;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::SignalError;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportFormat;

const BACKTEST: &str = "backtest";
const REPORT: &str = "report";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    load_backtest_config(config)?;
    load_report_format(config)?;
    Ok(())
}

/// Backtest parameters from `[backtest]`, defaults filled in.
pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, SignalError> {
    let defaults = BacktestConfig::default();

    let stop_loss_pct =
        parse_key::<f64>(config, BACKTEST, "stop_loss_pct")?.unwrap_or(defaults.stop_loss_pct);
    if !(stop_loss_pct > 0.0 && stop_loss_pct < 1.0) {
        return Err(invalid(
            BACKTEST,
            "stop_loss_pct",
            "stop_loss_pct must be a fraction between 0 and 1",
        ));
    }

    let take_profit_pct = parse_key::<f64>(config, BACKTEST, "take_profit_pct")?
        .unwrap_or(defaults.take_profit_pct);
    if !(take_profit_pct > 0.0 && take_profit_pct.is_finite()) {
        return Err(invalid(
            BACKTEST,
            "take_profit_pct",
            "take_profit_pct must be positive",
        ));
    }

    let max_hold_days = match parse_key::<i64>(config, BACKTEST, "max_hold_days")? {
        None => defaults.max_hold_days,
        Some(days) if days >= 1 => days as usize,
        Some(_) => {
            return Err(invalid(
                BACKTEST,
                "max_hold_days",
                "max_hold_days must be at least 1",
            ));
        }
    };

    Ok(BacktestConfig {
        stop_loss_pct,
        take_profit_pct,
        max_hold_days,
    })
}

pub fn load_report_format(config: &dyn ConfigPort) -> Result<ReportFormat, SignalError> {
    match config.get_string(REPORT, "format") {
        None => Ok(ReportFormat::default()),
        Some(raw) => raw
            .parse()
            .map_err(|reason: String| invalid(REPORT, "format", &reason)),
    }
}

fn parse_key<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, SignalError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| invalid(section, key, &format!("cannot parse '{raw}'")))
}

fn invalid(section: &str, key: &str, reason: &str) -> SignalError {
    SignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
