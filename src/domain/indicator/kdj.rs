//! KDJ stochastic oscillator.
//!
//! RSV = (C - lowest low) / (highest high - lowest low) × 100 over the trailing
//! n bars (fewer at the start of the series); 50 when the range is flat.
//! K = 2/3·K[i-1] + 1/3·RSV, D = 2/3·D[i-1] + 1/3·K, both seeded at 50.
//! J = 3K - 2D and is not clamped.

use serde::Serialize;

use crate::domain::numeric::round2;
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 9;
const SEED: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KdjSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub j: Vec<f64>,
}

pub fn calculate_kdj(bars: &[Bar], period: usize) -> KdjSeries {
    let period = period.max(1);
    let mut series = KdjSeries {
        k: Vec::with_capacity(bars.len()),
        d: Vec::with_capacity(bars.len()),
        j: Vec::with_capacity(bars.len()),
    };

    let mut prev_k = SEED;
    let mut prev_d = SEED;

    for (i, bar) in bars.iter().enumerate() {
        let start = (i + 1).saturating_sub(period);
        let window = &bars[start..=i];
        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);

        let k = round2(2.0 / 3.0 * prev_k + 1.0 / 3.0 * raw_stochastic(bar.close, highest, lowest));
        let d = round2(2.0 / 3.0 * prev_d + 1.0 / 3.0 * k);
        let j = round2(3.0 * k - 2.0 * d);

        series.k.push(k);
        series.d.push(d);
        series.j.push(j);

        prev_k = k;
        prev_d = d;
    }

    series
}

fn raw_stochastic(close: f64, highest: f64, lowest: f64) -> f64 {
    if highest == lowest {
        SEED
    } else {
        (close - lowest) / (highest - lowest) * 100.0
    }
}
