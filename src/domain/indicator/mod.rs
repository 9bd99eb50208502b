//! Technical indicator engine.
//!
//! Pure functions over an ordered bar sequence. Each family is available as a
//! full series (one value per bar, for charting) and as a snapshot of the
//! final bar (for scoring). Values that lack enough history are `None`, never
//! zero; callers check availability before using them.
//!
//! - `IndicatorSeries`: parallel per-bar arrays of every family
//! - `IndicatorSnapshot`: last-value view consumed by the scorer

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod ma;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod stddev;

pub use ema::calculate_ema;

use serde::Serialize;

use crate::domain::divergence::DivergenceHint;
use crate::domain::error::SignalError;
use crate::domain::ohlcv::{Bar, closes, validate_bars};

use self::bollinger::BollingerSeries;
use self::kdj::KdjSeries;
use self::macd::MacdSeries;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub dates: Vec<String>,
    pub ma5: Vec<Option<f64>>,
    pub ma10: Vec<Option<f64>>,
    pub ma20: Vec<Option<f64>>,
    pub ma60: Vec<Option<f64>>,
    pub ma120: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub rsi6: Vec<Option<f64>>,
    pub rsi12: Vec<Option<f64>>,
    pub rsi24: Vec<Option<f64>>,
    pub kdj: KdjSeries,
    pub boll: BollingerSeries,
    pub atr: Vec<Option<f64>>,
    pub obv: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaSnapshot {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub ma120: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdSnapshot {
    pub dif: f64,
    pub dea: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RsiSnapshot {
    pub rsi6: Option<f64>,
    pub rsi12: Option<f64>,
    pub rsi24: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KdjSnapshot {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub ma: MaSnapshot,
    pub macd: MacdSnapshot,
    pub rsi: RsiSnapshot,
    pub kdj: KdjSnapshot,
    pub boll: Option<BollingerBands>,
    pub atr: Option<f64>,
    pub obv: f64,
    pub volume_ratio: Option<f64>,
    pub divergence: Option<DivergenceHint>,
}

impl IndicatorSnapshot {
    pub fn with_divergence(mut self, hint: DivergenceHint) -> Self {
        self.divergence = Some(hint);
        self
    }
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    fn latest(&self) -> Option<IndicatorSnapshot> {
        let last = self.len().checked_sub(1)?;

        let boll = match (
            self.boll.upper[last],
            self.boll.middle[last],
            self.boll.lower[last],
        ) {
            (Some(upper), Some(middle), Some(lower)) => Some(BollingerBands {
                upper,
                middle,
                lower,
            }),
            _ => None,
        };

        Some(IndicatorSnapshot {
            ma: MaSnapshot {
                ma5: self.ma5[last],
                ma10: self.ma10[last],
                ma20: self.ma20[last],
                ma60: self.ma60[last],
                ma120: self.ma120[last],
            },
            macd: MacdSnapshot {
                dif: self.macd.dif[last],
                dea: self.macd.dea[last],
                histogram: self.macd.histogram[last],
            },
            rsi: RsiSnapshot {
                rsi6: self.rsi6[last],
                rsi12: self.rsi12[last],
                rsi24: self.rsi24[last],
            },
            kdj: KdjSnapshot {
                k: self.kdj.k[last],
                d: self.kdj.d[last],
                j: self.kdj.j[last],
            },
            boll,
            atr: self.atr[last],
            obv: self.obv[last],
            volume_ratio: None,
            divergence: None,
        })
    }
}

/// Full per-bar series for charting.
pub fn calculate_indicator_series(bars: &[Bar]) -> Result<IndicatorSeries, SignalError> {
    validate_bars(bars)?;
    Ok(compute_series(bars))
}

/// Last-value snapshot of every family at the final bar.
pub fn calculate_indicators(bars: &[Bar]) -> Result<IndicatorSnapshot, SignalError> {
    validate_bars(bars)?;
    let mut snapshot = compute_series(bars)
        .latest()
        .ok_or(SignalError::EmptyBars)?;
    snapshot.volume_ratio = obv::volume_ratio(bars);
    Ok(snapshot)
}

fn compute_series(bars: &[Bar]) -> IndicatorSeries {
    let closes = closes(bars);

    IndicatorSeries {
        dates: bars.iter().map(|b| b.date.clone()).collect(),
        ma5: ma::calculate_ma(&closes, 5),
        ma10: ma::calculate_ma(&closes, 10),
        ma20: ma::calculate_ma(&closes, 20),
        ma60: ma::calculate_ma(&closes, 60),
        ma120: ma::calculate_ma(&closes, 120),
        macd: macd::calculate_macd_default(&closes),
        rsi6: rsi::calculate_rsi(&closes, 6),
        rsi12: rsi::calculate_rsi(&closes, 12),
        rsi24: rsi::calculate_rsi(&closes, 24),
        kdj: kdj::calculate_kdj(bars, kdj::DEFAULT_PERIOD),
        boll: bollinger::calculate_bollinger(
            &closes,
            bollinger::DEFAULT_PERIOD,
            bollinger::DEFAULT_MULTIPLIER,
        ),
        atr: atr::calculate_atr(bars, atr::DEFAULT_PERIOD),
        obv: obv::calculate_obv(bars),
    }
}
