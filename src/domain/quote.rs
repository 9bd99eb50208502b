//! Current tick snapshot consumed by the scorer.

use serde::{Deserialize, Serialize};

use crate::domain::error::SignalError;
use crate::domain::numeric::round2;
use crate::domain::ohlcv::Bar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// Prior session close.
    pub close: f64,
    pub volume: f64,
    pub amount: f64,
    pub change: f64,
    pub change_percent: f64,
    pub turnover: f64,
}

impl Quote {
    /// Derive a quote from the last bar, using the bar before it as the prior
    /// close. With a single bar the open stands in for the prior close.
    pub fn from_bars(bars: &[Bar]) -> Result<Self, SignalError> {
        let last = bars.last().ok_or(SignalError::EmptyBars)?;
        let prior_close = if bars.len() >= 2 {
            bars[bars.len() - 2].close
        } else {
            last.open
        };

        let change = last.close - prior_close;
        let change_percent = if prior_close > 0.0 {
            change / prior_close * 100.0
        } else {
            0.0
        };

        Ok(Quote {
            price: last.close,
            open: last.open,
            high: last.high,
            low: last.low,
            close: prior_close,
            volume: last.volume,
            amount: last.amount,
            change: round2(change),
            change_percent: round2(change_percent),
            turnover: 0.0,
        })
    }
}
