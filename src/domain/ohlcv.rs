//! OHLCV bar representation and input validation.

use serde::{Deserialize, Serialize};

use crate::domain::error::SignalError;

/// One price bar. Sequences are ordered oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default)]
    pub amount: f64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Fail fast on sequences the engine cannot interpret.
///
/// Rejects an empty sequence, dates that are not strictly ascending, and
/// negative or non-finite prices, volumes and amounts.
pub fn validate_bars(bars: &[Bar]) -> Result<(), SignalError> {
    if bars.is_empty() {
        return Err(SignalError::EmptyBars);
    }

    for (i, bar) in bars.iter().enumerate() {
        let fields = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
            ("volume", bar.volume),
            ("amount", bar.amount),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SignalError::InvalidBar {
                    index: i,
                    date: bar.date.clone(),
                    reason: format!("{name} must be a non-negative finite number, got {value}"),
                });
            }
        }

        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(SignalError::NonMonotonicDates {
                index: i,
                previous: bars[i - 1].date.clone(),
                current: bar.date.clone(),
            });
        }
    }

    Ok(())
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
