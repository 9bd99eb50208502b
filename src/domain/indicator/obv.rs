//! OBV (On-Balance Volume) and the volume ratio.

use crate::domain::numeric::round2;
use crate::domain::ohlcv::Bar;

/// Number of bars preceding the last one that the volume ratio averages.
pub const VOLUME_RATIO_LOOKBACK: usize = 5;

/// Calculate OBV (On-Balance Volume).
///
/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
pub fn calculate_obv(bars: &[Bar]) -> Vec<f64> {
    let mut values = Vec::with_capacity(bars.len());
    let mut obv = 0.0;
    let mut prev_close = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            obv = bar.volume;
        } else if bar.close > prev_close {
            obv += bar.volume;
        } else if bar.close < prev_close {
            obv -= bar.volume;
        }
        prev_close = bar.close;
        values.push(obv);
    }

    values
}

/// Last bar's volume over the mean volume of up to five bars before it.
///
/// Undefined with a single bar or when the preceding bars traded nothing.
pub fn volume_ratio(bars: &[Bar]) -> Option<f64> {
    let (last, previous) = bars.split_last()?;
    if previous.is_empty() {
        return None;
    }

    let start = previous.len().saturating_sub(VOLUME_RATIO_LOOKBACK);
    let window = &previous[start..];
    let average = window.iter().map(|b| b.volume).sum::<f64>() / window.len() as f64;

    if average > 0.0 {
        Some(round2(last.volume / average))
    } else {
        None
    }
}
