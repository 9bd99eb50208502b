//! RSI (Relative Strength Index) with Wilder smoothing.
//!
//! Seed: for the first n changes the averages accumulate gain/n and loss/n.
//! Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are undefined (n price changes are needed).

use crate::domain::numeric::round2;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.is_empty() {
        return vec![None; closes.len()];
    }

    let n = period as f64;
    let mut values = Vec::with_capacity(closes.len());
    values.push(None);

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        if i <= period {
            avg_gain += gain / n;
            avg_loss += loss / n;
            if i < period {
                values.push(None);
                continue;
            }
        } else {
            avg_gain = (avg_gain * (n - 1.0) + gain) / n;
            avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        }

        values.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }

    values
}

pub(crate) fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        round2(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}
