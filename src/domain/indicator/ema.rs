//! Exponential Moving Average building block.
//!
//! k = 2/(n+1), EMA[0] = data[0] with no warmup skip,
//! then EMA[i] = data[i]*k + EMA[i-1]*(1-k), carried at 4 places.

use crate::domain::numeric::round4;

pub fn calculate_ema(data: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = data.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period.max(1) as f64 + 1.0);
    let mut values = Vec::with_capacity(data.len());
    values.push(first);

    let mut ema = first;
    for &value in &data[1..] {
        ema = round4(value * k + ema * (1.0 - k));
        values.push(ema);
    }

    values
}
