//! Per-bar entry/exit scorer used by the backtest.
//!
//! This is a lighter scoring function than the live analyzer in
//! `analyzer.rs`: MA5/10/20 stack, an edge-triggered MACD zero cross, RSI6
//! extremes and a volume/price confirmation, with a +/-25 trigger. The two
//! scorers are kept separate; see DESIGN.md.
//!
//! MAs here average whatever history is available (no undefined warm-up),
//! and EMAs are carried unrounded over the full history.

use crate::domain::indicator::rsi::rsi_from_averages;
use crate::domain::ohlcv::Bar;

/// Bars required before the scorer produces anything but `Hold`.
pub const MIN_HISTORY: usize = 26;

/// Composite score at or beyond which a buy/sell fires.
pub const ACTION_THRESHOLD: i32 = 25;

const RSI_PERIOD: usize = 6;
const FAST_PERIOD: usize = 12;
const SLOW_PERIOD: usize = 26;
const VOLUME_LOOKBACK: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleSignal {
    pub score: i32,
    pub action: SignalAction,
}

impl SimpleSignal {
    fn from_score(score: i32) -> Self {
        let action = if score >= ACTION_THRESHOLD {
            SignalAction::Buy
        } else if score <= -ACTION_THRESHOLD {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        };
        SimpleSignal { score, action }
    }

    fn hold() -> Self {
        SimpleSignal {
            score: 0,
            action: SignalAction::Hold,
        }
    }
}

/// Running state precomputed once per bar sequence so that scoring bar `i`
/// is O(1) apart from the short MA windows.
#[derive(Debug, Clone)]
pub struct SignalContext {
    closes: Vec<f64>,
    volumes: Vec<f64>,
    ema_fast: Vec<f64>,
    ema_slow: Vec<f64>,
    rsi6: Vec<f64>,
}

impl SignalContext {
    pub fn new(bars: &[Bar]) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes = bars.iter().map(|b| b.volume).collect();

        SignalContext {
            ema_fast: running_ema(&closes, FAST_PERIOD),
            ema_slow: running_ema(&closes, SLOW_PERIOD),
            rsi6: running_rsi(&closes, RSI_PERIOD),
            closes,
            volumes,
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Score bar `idx` using only bars `0..=idx`. `None` when `idx` is past
    /// the last bar.
    pub fn signal_at(&self, idx: usize) -> Option<SimpleSignal> {
        if idx >= self.len() {
            return None;
        }
        if idx < MIN_HISTORY {
            return Some(SimpleSignal::hold());
        }

        let close = self.closes[idx];
        let ma5 = trailing_mean(&self.closes, idx, 5);
        let ma10 = trailing_mean(&self.closes, idx, 10);
        let ma20 = trailing_mean(&self.closes, idx, 20);

        let dif = self.ema_fast[idx] - self.ema_slow[idx];
        let prev_dif = self.ema_fast[idx - 1] - self.ema_slow[idx - 1];

        let rsi = self.rsi6[idx];

        let volume_avg = trailing_mean(&self.volumes, idx - 1, VOLUME_LOOKBACK);
        let volume_ratio = if volume_avg > 0.0 {
            self.volumes[idx] / volume_avg
        } else {
            1.0
        };

        let prev_close = self.closes[idx - 1];
        let change = if prev_close != 0.0 {
            (close - prev_close) / prev_close
        } else {
            0.0
        };

        let mut score = 0;

        if ma5 > ma10 && ma10 > ma20 {
            score += 20;
        }
        if ma5 < ma10 && ma10 < ma20 {
            score -= 20;
        }

        score += if close > ma20 { 5 } else { -5 };

        if dif > 0.0 && prev_dif <= 0.0 {
            score += 15;
        }
        if dif < 0.0 && prev_dif >= 0.0 {
            score -= 15;
        }

        if rsi > 80.0 {
            score -= 10;
        } else if rsi < 20.0 {
            score += 10;
        }

        if change > 0.01 && volume_ratio > 1.5 {
            score += 10;
        }
        if change < -0.01 && volume_ratio > 2.0 {
            score -= 10;
        }

        Some(SimpleSignal::from_score(score))
    }
}

/// Mean of the `period` values ending at `end`, or fewer near the start.
fn trailing_mean(data: &[f64], end: usize, period: usize) -> f64 {
    let start = (end + 1).saturating_sub(period);
    let window = &data[start..=end];
    window.iter().sum::<f64>() / window.len() as f64
}

fn running_ema(data: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(data.len());
    let mut ema = match data.first() {
        Some(&first) => first,
        None => return values,
    };
    values.push(ema);
    for &value in &data[1..] {
        ema = value * k + ema * (1.0 - k);
        values.push(ema);
    }
    values
}

/// RSI at every index using the same seed-then-Wilder recursion as the
/// engine. Indexes inside the seed window carry a partial average.
fn running_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = period as f64;
    let mut values = Vec::with_capacity(closes.len());
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 0..closes.len() {
        if i > 0 {
            let change = closes[i] - closes[i - 1];
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);
            if i <= period {
                avg_gain += gain / n;
                avg_loss += loss / n;
            } else {
                avg_gain = (avg_gain * (n - 1.0) + gain) / n;
                avg_loss = (avg_loss * (n - 1.0) + loss) / n;
            }
        }
        values.push(rsi_from_averages(avg_gain, avg_loss));
    }

    values
}
