//! Simple Moving Average.
//!
//! MA[i] = mean(C[i-n+1..=i]), rounded to 2 places.
//! Warmup: first (n-1) bars are undefined.

use crate::domain::numeric::round2;

pub fn calculate_ma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    closes
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < period {
                None
            } else {
                let window = &closes[i + 1 - period..=i];
                Some(round2(window.iter().sum::<f64>() / period as f64))
            }
        })
        .collect()
}
