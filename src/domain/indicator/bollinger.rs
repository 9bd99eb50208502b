//! Bollinger Bands.
//!
//! - Middle: MA(n)
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation around the middle band.
//! Default parameters: period=20, multiplier=2.0.
//! Warmup: first (period-1) bars are undefined.

use serde::Serialize;

use crate::domain::indicator::ma::calculate_ma;
use crate::domain::indicator::stddev::population_stddev;
use crate::domain::numeric::round2;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn calculate_bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerSeries {
    let middle = calculate_ma(closes, period);
    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for (i, mid) in middle.iter().enumerate() {
        match mid {
            Some(mean) => {
                let window = &closes[i + 1 - period..=i];
                let band = multiplier * population_stddev(window, *mean);
                upper.push(Some(round2(mean + band)));
                lower.push(Some(round2(mean - band)));
            }
            None => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_warmup() {
        let boll = calculate_bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0);

        assert!(boll.upper[0].is_none());
        assert!(boll.middle[1].is_none());
        assert!(boll.lower[1].is_none());
        assert!(boll.upper[2].is_some());
        assert!(boll.lower[4].is_some());
    }

    #[test]
    fn bollinger_constant_values() {
        let boll = calculate_bollinger(&[100.0; 5], 3, 2.0);
        assert_eq!(boll.upper[4], Some(100.0));
        assert_eq!(boll.middle[4], Some(100.0));
        assert_eq!(boll.lower[4], Some(100.0));
    }

    #[test]
    fn bollinger_basic_calculation() {
        let boll = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0);

        let variance: f64 = (100.0 + 0.0 + 100.0) / 3.0;
        let stddev = variance.sqrt();
        assert_eq!(boll.middle[2], Some(20.0));
        assert_eq!(boll.upper[2], Some(round2(20.0 + 2.0 * stddev)));
        assert_eq!(boll.lower[2], Some(round2(20.0 - 2.0 * stddev)));
    }

    #[test]
    fn bollinger_bands_ordered() {
        let closes: Vec<f64> = (0..60).map(|i| 10.0 + ((i * 13) % 7) as f64).collect();
        let boll = calculate_bollinger(&closes, DEFAULT_PERIOD, DEFAULT_MULTIPLIER);

        for i in 0..closes.len() {
            if let (Some(u), Some(m), Some(l)) = (boll.upper[i], boll.middle[i], boll.lower[i]) {
                assert!(u >= m && m >= l, "bands out of order at {i}: {u} {m} {l}");
            }
        }
    }

    #[test]
    fn bollinger_short_history() {
        let boll = calculate_bollinger(&[10.0; 19], DEFAULT_PERIOD, DEFAULT_MULTIPLIER);
        assert!(boll.middle.iter().all(Option::is_none));
    }
}
