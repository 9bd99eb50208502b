//! MACD (Moving Average Convergence Divergence).
//!
//! DIF = EMA(fast) - EMA(slow)
//! DEA = EMA(signal) of DIF
//! Histogram = 2 × (DIF - DEA)
//!
//! Default parameters: fast=12, slow=26, signal=9.
//! Every bar is defined since the EMAs seed from the first value.

use serde::Serialize;

use crate::domain::indicator::calculate_ema;
use crate::domain::numeric::round4;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub dif: Vec<f64>,
    pub dea: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let dif: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| round4(f - s))
        .collect();
    let dea = calculate_ema(&dif, signal);
    let histogram = dif
        .iter()
        .zip(&dea)
        .map(|(d, e)| round4((d - e) * 2.0))
        .collect();

    MacdSeries {
        dif,
        dea,
        histogram,
    }
}

pub fn calculate_macd_default(closes: &[f64]) -> MacdSeries {
    calculate_macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
