//! Independent scoring passes over an indicator snapshot.
//!
//! Each pass returns its own score and rationale lines; passes share no
//! state and are combined by plain summation in the analyzer. A clause whose
//! indicator is unavailable is skipped and contributes no points.

use serde::Serialize;

use crate::domain::divergence::Divergence;
use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::numeric::round2;
use crate::domain::quote::Quote;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalScore {
    pub score: i32,
    pub details: Vec<String>,
}

impl SignalScore {
    fn add(&mut self, points: i32, detail: impl Into<String>) {
        self.score += points;
        self.details.push(detail.into());
    }

    fn note(&mut self, detail: impl Into<String>) {
        self.details.push(detail.into());
    }
}

/// Moving-average alignment, price vs MA20, MACD and Bollinger position.
pub fn trend_pass(ind: &IndicatorSnapshot, quote: &Quote) -> SignalScore {
    let mut pass = SignalScore::default();
    let ma = &ind.ma;

    match (ma.ma5, ma.ma10, ma.ma20, ma.ma60) {
        (Some(ma5), Some(ma10), Some(ma20), Some(ma60)) => {
            if ma5 > ma10 && ma10 > ma20 && ma20 > ma60 {
                pass.add(25, "Moving averages in bullish alignment, uptrend confirmed");
            } else if ma5 < ma10 && ma10 < ma20 && ma20 < ma60 {
                pass.add(-25, "Moving averages in bearish alignment, downtrend confirmed");
            } else {
                pass.note("Moving averages intertwined, trend indecisive");
            }
        }
        _ => pass.note("Moving-average alignment unavailable (insufficient history)"),
    }

    match ma.ma20 {
        Some(ma20) if quote.price > ma20 => {
            pass.add(10, format!("Price above MA20 ({ma20}), medium term strong"));
        }
        Some(ma20) => {
            pass.add(-10, format!("Price below MA20 ({ma20}), medium term weak"));
        }
        None => pass.note("MA20 unavailable (insufficient history)"),
    }

    let macd = &ind.macd;
    if macd.dif > macd.dea && macd.histogram > 0.0 {
        pass.add(20, "MACD golden cross, momentum rising");
    } else if macd.dif < macd.dea && macd.histogram < 0.0 {
        pass.add(-20, "MACD death cross, momentum falling");
    }

    if macd.histogram > 0.0 && macd.dif > 0.0 {
        pass.add(5, "MACD above the zero axis, upward momentum continuing");
    } else if macd.histogram < 0.0 && macd.dif < 0.0 {
        pass.add(-5, "MACD below the zero axis, downward momentum continuing");
    }

    if let Some(boll) = &ind.boll {
        if quote.price >= boll.upper {
            pass.add(
                -10,
                format!("Touching the upper Bollinger band ({}), short term overheated", boll.upper),
            );
        } else if quote.price <= boll.lower {
            pass.add(
                10,
                format!("Touching the lower Bollinger band ({}), possibly oversold", boll.lower),
            );
        } else if quote.price > boll.middle {
            pass.add(5, "Price above the Bollinger middle band, leaning strong");
        }
    }

    pass
}

/// RSI6 zones, KDJ extremes and crosses, volume-ratio notes, divergence.
pub fn timing_pass(ind: &IndicatorSnapshot) -> SignalScore {
    let mut pass = SignalScore::default();

    match ind.rsi.rsi6 {
        Some(rsi6) if rsi6 > 80.0 => pass.add(-15, format!("RSI6={rsi6}, severely overbought")),
        Some(rsi6) if rsi6 > 70.0 => pass.add(-10, format!("RSI6={rsi6}, entering overbought zone")),
        Some(rsi6) if rsi6 < 20.0 => pass.add(
            15,
            format!("RSI6={rsi6}, severely oversold, rebound possible"),
        ),
        Some(rsi6) if rsi6 < 30.0 => pass.add(10, format!("RSI6={rsi6}, entering oversold zone")),
        Some(rsi6) => pass.note(format!("RSI6={rsi6}, within normal range")),
        None => pass.note("RSI6 unavailable (insufficient history)"),
    }

    let kdj = &ind.kdj;
    if kdj.j > 100.0 {
        pass.add(-10, format!("KDJ J={}, extremely overbought", kdj.j));
    } else if kdj.j < 0.0 {
        pass.add(10, format!("KDJ J={}, extremely oversold", kdj.j));
    }
    if kdj.k > kdj.d && kdj.j > 0.0 {
        pass.add(5, "KDJ golden cross");
    } else if kdj.k < kdj.d && kdj.j < 100.0 {
        pass.add(-5, "KDJ death cross");
    }

    if let Some(ratio) = ind.volume_ratio {
        if ratio > 3.0 {
            pass.note(format!("Volume ratio={ratio}, abnormal surge in turnover"));
        } else if ratio > 1.5 {
            pass.note(format!("Volume ratio={ratio}, mild volume expansion"));
        } else if ratio < 0.5 {
            pass.note(format!("Volume ratio={ratio}, volume clearly shrinking"));
        }
    }

    if let Some(hint) = &ind.divergence {
        match hint.macd {
            Some(Divergence::Top) => pass.score -= 15,
            Some(Divergence::Bottom) => pass.score += 15,
            None => {}
        }
        match hint.rsi {
            Some(Divergence::Top) => pass.score -= 10,
            Some(Divergence::Bottom) => pass.score += 10,
            None => {}
        }
        pass.details.extend(hint.description.iter().cloned());
    }

    pass
}

/// Price change confirmed or contradicted by volume. All matching
/// conditions fire.
pub fn volume_pass(ind: &IndicatorSnapshot, quote: &Quote) -> SignalScore {
    let mut pass = SignalScore::default();
    let Some(ratio) = ind.volume_ratio else {
        return pass;
    };
    let change = quote.change_percent;

    if change > 1.0 && ratio > 1.5 {
        pass.add(10, "Rising on expanding volume, buying strength confirmed");
    }
    if change > 1.0 && ratio < 0.7 {
        pass.add(-5, "Rising on shrinking volume, weak rally");
    }
    if change < -1.0 && ratio > 2.0 {
        pass.add(-15, "Falling on heavy volume, panic selling");
    }
    if change < -1.0 && ratio < 0.7 {
        pass.add(5, "Falling on light volume, selling exhaustion");
    }

    pass
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub details: Vec<String>,
}

/// ATR-based stop/target at 2:3 risk-reward, or fixed -3%/+5% without ATR.
/// Never contributes to the score.
pub fn risk_levels(ind: &IndicatorSnapshot, quote: &Quote) -> RiskLevels {
    match ind.atr {
        Some(atr) if atr > 0.0 => {
            let stop_loss = round2(quote.price - 2.0 * atr);
            let take_profit = round2(quote.price + 3.0 * atr);
            RiskLevels {
                stop_loss,
                take_profit,
                details: vec![format!(
                    "ATR={atr}, suggested stop loss: {stop_loss:.2}, take profit: {take_profit:.2}"
                )],
            }
        }
        _ => {
            let stop_loss = round2(quote.price * 0.97);
            let take_profit = round2(quote.price * 1.05);
            RiskLevels {
                stop_loss,
                take_profit,
                details: vec![format!(
                    "Suggested stop loss: {stop_loss:.2} (-3%), take profit: {take_profit:.2} (+5%)"
                )],
            }
        }
    }
}
