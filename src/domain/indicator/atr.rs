//! Average True Range with Wilder smoothing.
//!
//! TR[0] = high - low; afterwards the full true range against the prior close.
//! Seed: mean of the first n true ranges, then ATR = (ATR[i-1]·(n-1) + TR) / n.
//! Warmup: first (n-1) bars are undefined.

use crate::domain::numeric::round2;
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; bars.len()];
    }

    let tr_values: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let n = period as f64;
    let mut results: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    let mut atr = 0.0;

    for i in 0..tr_values.len() {
        if i + 1 < period {
            results.push(None);
            continue;
        }
        atr = if i + 1 == period {
            round2(tr_values[..period].iter().sum::<f64>() / n)
        } else {
            round2((atr * (n - 1.0) + tr_values[i]) / n)
        };
        results.push(Some(atr));
    }

    results
}
