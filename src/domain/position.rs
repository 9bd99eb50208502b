//! Open position and closed trade records for the backtest.

use std::fmt;

use serde::Serialize;

use crate::domain::numeric::round2;
use crate::domain::ohlcv::Bar;

/// A single long position. There is never more than one open at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: String,
    pub entry_price: f64,
    pub bars_held: usize,
}

impl Position {
    pub fn open(bar: &Bar) -> Self {
        Position {
            entry_date: bar.date.clone(),
            entry_price: bar.close,
            bars_held: 0,
        }
    }

    /// Fractional return at `price` (0.05 = +5%).
    pub fn return_pct(&self, price: f64) -> f64 {
        if self.entry_price > 0.0 {
            (price - self.entry_price) / self.entry_price
        } else {
            0.0
        }
    }

    pub fn should_stop_loss(&self, price: f64, stop_loss_pct: f64) -> bool {
        self.return_pct(price) <= -stop_loss_pct
    }

    pub fn should_take_profit(&self, price: f64, take_profit_pct: f64) -> bool {
        self.return_pct(price) >= take_profit_pct
    }

    pub fn close(self, bar: &Bar, exit_reason: ExitReason) -> BacktestTrade {
        let return_pct = round2(self.return_pct(bar.close) * 100.0);
        BacktestTrade {
            buy_date: self.entry_date,
            buy_price: round2(self.entry_price),
            sell_date: bar.date.clone(),
            sell_price: round2(bar.close),
            return_pct,
            exit_reason,
            hold_days: self.bars_held,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    MaxHoldDays,
    SellSignal,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "stop loss"),
            ExitReason::TakeProfit => write!(f, "take profit"),
            ExitReason::MaxHoldDays => write!(f, "max hold days"),
            ExitReason::SellSignal => write!(f, "sell signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestTrade {
    pub buy_date: String,
    pub buy_price: f64,
    pub sell_date: String,
    pub sell_price: f64,
    /// Realized return in percent.
    pub return_pct: f64,
    pub exit_reason: ExitReason,
    pub hold_days: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> Bar {
        Bar {
            date: date.into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
            amount: 0.0,
        }
    }

    fn sample_position() -> Position {
        Position::open(&bar("2024-02-15", 50.0))
    }

    #[test]
    fn open_records_entry() {
        let pos = sample_position();
        assert_eq!(pos.entry_date, "2024-02-15");
        assert_eq!(pos.entry_price, 50.0);
        assert_eq!(pos.bars_held, 0);
    }

    #[test]
    fn return_pct_is_fractional() {
        let pos = sample_position();
        assert!((pos.return_pct(55.0) - 0.10).abs() < 1e-12);
        assert!((pos.return_pct(45.0) + 0.10).abs() < 1e-12);
    }

    #[test]
    fn return_pct_zero_entry_price() {
        let pos = Position::open(&bar("2024-02-15", 0.0));
        assert_eq!(pos.return_pct(10.0), 0.0);
    }

    #[test]
    fn stop_loss_triggered() {
        let pos = sample_position();
        assert!(pos.should_stop_loss(47.0, 0.05));
        assert!(pos.should_stop_loss(47.5, 0.05));
        assert!(!pos.should_stop_loss(48.0, 0.05));
    }

    #[test]
    fn take_profit_triggered() {
        let pos = sample_position();
        assert!(pos.should_take_profit(54.0, 0.08));
        assert!(pos.should_take_profit(55.0, 0.08));
        assert!(!pos.should_take_profit(53.5, 0.08));
    }

    #[test]
    fn close_produces_trade() {
        let mut pos = sample_position();
        pos.bars_held = 4;
        let trade = pos.close(&bar("2024-02-21", 54.123), ExitReason::TakeProfit);

        assert_eq!(trade.buy_date, "2024-02-15");
        assert_eq!(trade.sell_date, "2024-02-21");
        assert_eq!(trade.buy_price, 50.0);
        assert_eq!(trade.sell_price, 54.12);
        assert_eq!(trade.return_pct, 8.25);
        assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
        assert_eq!(trade.hold_days, 4);
    }

    #[test]
    fn exit_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ExitReason::MaxHoldDays).unwrap(),
            "\"max_hold_days\""
        );
        assert_eq!(ExitReason::StopLoss.to_string(), "stop loss");
    }
}
