//! Core domain types and logic.

pub mod analyzer;
pub mod backtest;
pub mod backtest_signal;
pub mod config_validation;
pub mod divergence;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod numeric;
pub mod ohlcv;
pub mod position;
pub mod quote;
pub mod scoring;
