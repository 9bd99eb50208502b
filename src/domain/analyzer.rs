//! Signal scorer: combines the scoring passes into a directional signal with
//! risk levels and human-readable rationale.

use std::fmt;

use serde::Serialize;

use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::quote::Quote;
use crate::domain::scoring::{risk_levels, timing_pass, trend_pass, volume_pass};

/// Totals inside (-20, 20) are neutral so marginal scores do not flip the call.
pub const SIGNAL_THRESHOLD: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

impl Signal {
    pub fn from_score(total: i32) -> Self {
        if total >= SIGNAL_THRESHOLD {
            Signal::Bullish
        } else if total <= -SIGNAL_THRESHOLD {
            Signal::Bearish
        } else {
            Signal::Neutral
        }
    }

    fn header(self) -> &'static str {
        match self {
            Signal::Bullish => "Bullish signal",
            Signal::Bearish => "Bearish signal",
            Signal::Neutral => "Neutral signal, wait and see",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Bullish => write!(f, "bullish"),
            Signal::Bearish => write!(f, "bearish"),
            Signal::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub signal: Signal,
    pub score: i32,
    pub summary: String,
    pub suggestion: String,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Score a quote against the indicator snapshot.
///
/// The total is trend + timing + volume; risk levels never vote.
pub fn analyze(quote: &Quote, indicators: &IndicatorSnapshot) -> AnalysisResult {
    let trend = trend_pass(indicators, quote);
    let timing = timing_pass(indicators);
    let volume = volume_pass(indicators, quote);
    let risk = risk_levels(indicators, quote);

    let score = trend.score + timing.score + volume.score;
    let signal = Signal::from_score(score);

    let lines: Vec<&str> = trend
        .details
        .iter()
        .chain(&timing.details)
        .chain(&volume.details)
        .chain(&risk.details)
        .map(String::as_str)
        .collect();

    AnalysisResult {
        signal,
        score,
        summary: format!("{}\n\n{}", signal.header(), lines.join("\n")),
        suggestion: suggestion(signal, risk.stop_loss, risk.take_profit),
        stop_loss: risk.stop_loss,
        take_profit: risk.take_profit,
    }
}

fn suggestion(signal: Signal, stop_loss: f64, take_profit: f64) -> String {
    match signal {
        Signal::Bullish => format!(
            "Bullish: consider building a position on dips. Stop loss: {stop_loss:.2}, \
             target: {take_profit:.2}. Keep this position under 30% of the portfolio."
        ),
        Signal::Bearish => format!(
            "Bearish: stay on the sidelines or reduce exposure. If holding, exit strictly \
             below {stop_loss:.2}. Do not chase rallies now."
        ),
        Signal::Neutral => format!(
            "Direction unclear: wait for a clearer signal. Existing holdings can be kept \
             with a stop at {stop_loss:.2}. Do not add to the position."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{KdjSnapshot, MaSnapshot, RsiSnapshot};

    fn quote(price: f64) -> Quote {
        Quote {
            price,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 1_000.0,
            amount: 0.0,
            change: 0.0,
            change_percent: 0.0,
            turnover: 0.0,
        }
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(Signal::from_score(50), Signal::Bullish);
        assert_eq!(Signal::from_score(-50), Signal::Bearish);
        assert_eq!(Signal::from_score(0), Signal::Neutral);
        assert_eq!(Signal::from_score(20), Signal::Bullish);
        assert_eq!(Signal::from_score(19), Signal::Neutral);
        assert_eq!(Signal::from_score(-19), Signal::Neutral);
        assert_eq!(Signal::from_score(-20), Signal::Bearish);
    }

    #[test]
    fn bullish_analysis() {
        let ind = IndicatorSnapshot {
            ma: MaSnapshot {
                ma5: Some(14.0),
                ma10: Some(13.0),
                ma20: Some(12.0),
                ma60: Some(11.0),
                ma120: None,
            },
            rsi: RsiSnapshot {
                rsi6: Some(55.0),
                ..RsiSnapshot::default()
            },
            kdj: KdjSnapshot {
                k: 50.0,
                d: 50.0,
                j: 50.0,
            },
            atr: Some(0.5),
            ..IndicatorSnapshot::default()
        };
        let result = analyze(&quote(15.0), &ind);

        assert_eq!(result.signal, Signal::Bullish);
        assert_eq!(result.score, 35);
        assert_eq!(result.stop_loss, 14.0);
        assert_eq!(result.take_profit, 16.5);
        assert!(result.summary.starts_with("Bullish signal\n\n"));
        assert!(result.suggestion.contains("14.00"));
        assert!(result.suggestion.contains("16.50"));
    }

    #[test]
    fn summary_lists_passes_in_order() {
        let ind = IndicatorSnapshot {
            rsi: RsiSnapshot {
                rsi6: Some(50.0),
                ..RsiSnapshot::default()
            },
            kdj: KdjSnapshot {
                k: 50.0,
                d: 50.0,
                j: 50.0,
            },
            ..IndicatorSnapshot::default()
        };
        let result = analyze(&quote(100.0), &ind);

        let body: Vec<&str> = result.summary.lines().skip(2).collect();
        assert!(body[0].contains("alignment unavailable"));
        assert!(body.iter().position(|l| l.contains("RSI6")) > Some(0));
        assert!(body.last().unwrap().contains("(-3%)"));
        assert_eq!(result.signal, Signal::Neutral);
        assert_eq!(result.stop_loss, 97.0);
    }

    #[test]
    fn risk_is_excluded_from_total() {
        let mut ind = IndicatorSnapshot {
            kdj: KdjSnapshot {
                k: 50.0,
                d: 50.0,
                j: 50.0,
            },
            ..IndicatorSnapshot::default()
        };
        let without_atr = analyze(&quote(100.0), &ind);
        ind.atr = Some(5.0);
        let with_atr = analyze(&quote(100.0), &ind);

        assert_eq!(without_atr.score, with_atr.score);
        assert_eq!(with_atr.stop_loss, 90.0);
        assert_eq!(with_atr.take_profit, 115.0);
    }

    #[test]
    fn bearish_suggestion_mentions_stop() {
        let ind = IndicatorSnapshot {
            ma: MaSnapshot {
                ma5: Some(8.0),
                ma10: Some(9.0),
                ma20: Some(10.0),
                ma60: Some(11.0),
                ma120: None,
            },
            kdj: KdjSnapshot {
                k: 50.0,
                d: 50.0,
                j: 50.0,
            },
            ..IndicatorSnapshot::default()
        };
        let result = analyze(&quote(8.0), &ind);

        assert_eq!(result.signal, Signal::Bearish);
        assert!(result.summary.starts_with("Bearish signal"));
        assert!(result.suggestion.contains("below 7.76"));
    }

    #[test]
    fn signal_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Signal::Neutral).unwrap(),
            "\"neutral\""
        );
        assert_eq!(Signal::Bullish.to_string(), "bullish");
    }
}
