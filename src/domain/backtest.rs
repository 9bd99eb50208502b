//! Backtest simulator: a single-position Flat/Long state machine driven by the
//! per-bar scorer in `backtest_signal`.
//!
//! Exits are checked in a fixed priority order (`EXIT_PRIORITY`) and always
//! fill at the bar's close. No re-entry happens on an exit bar.

use serde::Serialize;
use tracing::debug;

use crate::domain::backtest_signal::{SignalAction, SignalContext};
use crate::domain::error::SignalError;
use crate::domain::metrics::TradeStats;
use crate::domain::ohlcv::{Bar, validate_bars};
use crate::domain::position::{BacktestTrade, ExitReason, Position};

/// First bar at which entries are considered.
pub const WARMUP_BARS: usize = 30;

/// Trades kept in the result; statistics cover all of them.
pub const MAX_REPORTED_TRADES: usize = 10;

/// Exit rules in the order they are evaluated. The first match wins.
pub const EXIT_PRIORITY: [ExitReason; 4] = [
    ExitReason::StopLoss,
    ExitReason::TakeProfit,
    ExitReason::MaxHoldDays,
    ExitReason::SellSignal,
];

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Fractional loss that triggers a stop (0.05 = 5%).
    pub stop_loss_pct: f64,
    /// Fractional gain that triggers a take-profit.
    pub take_profit_pct: f64,
    /// Bars held before a forced exit.
    pub max_hold_days: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            stop_loss_pct: 0.05,
            take_profit_pct: 0.08,
            max_hold_days: 20,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        if !(self.stop_loss_pct.is_finite() && self.stop_loss_pct > 0.0) {
            return Err(SignalError::InvalidBacktestConfig {
                reason: format!("stop_loss_pct must be positive, got {}", self.stop_loss_pct),
            });
        }
        if !(self.take_profit_pct.is_finite() && self.take_profit_pct > 0.0) {
            return Err(SignalError::InvalidBacktestConfig {
                reason: format!(
                    "take_profit_pct must be positive, got {}",
                    self.take_profit_pct
                ),
            });
        }
        if self.max_hold_days == 0 {
            return Err(SignalError::InvalidBacktestConfig {
                reason: "max_hold_days must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    #[serde(flatten)]
    pub stats: TradeStats,
    /// The most recent trades, oldest first.
    pub trades: Vec<BacktestTrade>,
}

impl BacktestResult {
    fn from_trades(mut trades: Vec<BacktestTrade>) -> Self {
        let stats = TradeStats::compute(&trades);
        let excess = trades.len().saturating_sub(MAX_REPORTED_TRADES);
        trades.drain(..excess);
        BacktestResult { stats, trades }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum PositionState {
    Flat,
    Long(Position),
}

/// The first rule in `EXIT_PRIORITY` that fires for `position` at `close`.
///
/// `bars_held` must already include the current bar.
pub fn exit_reason(
    position: &Position,
    close: f64,
    action: SignalAction,
    config: &BacktestConfig,
) -> Option<ExitReason> {
    EXIT_PRIORITY.into_iter().find(|reason| match reason {
        ExitReason::StopLoss => position.should_stop_loss(close, config.stop_loss_pct),
        ExitReason::TakeProfit => position.should_take_profit(close, config.take_profit_pct),
        ExitReason::MaxHoldDays => position.bars_held >= config.max_hold_days,
        ExitReason::SellSignal => action == SignalAction::Sell,
    })
}

/// Replay `bars` through the simulator.
///
/// Histories shorter than the warm-up produce an empty, zeroed result. A
/// position still open on the last bar is not recorded.
pub fn run_backtest(bars: &[Bar], config: &BacktestConfig) -> Result<BacktestResult, SignalError> {
    validate_bars(bars)?;
    config.validate()?;

    let ctx = SignalContext::new(bars);
    let mut trades = Vec::new();
    let mut state = PositionState::Flat;

    for (i, bar) in bars.iter().enumerate().skip(WARMUP_BARS) {
        let action = ctx
            .signal_at(i)
            .map_or(SignalAction::Hold, |signal| signal.action);

        state = match state {
            PositionState::Flat if action == SignalAction::Buy => {
                debug!(date = %bar.date, price = bar.close, "entry");
                PositionState::Long(Position::open(bar))
            }
            PositionState::Flat => PositionState::Flat,
            PositionState::Long(mut position) => {
                position.bars_held += 1;
                match exit_reason(&position, bar.close, action, config) {
                    Some(reason) => {
                        let trade = position.close(bar, reason);
                        debug!(
                            date = %trade.sell_date,
                            price = trade.sell_price,
                            return_pct = trade.return_pct,
                            reason = %reason,
                            "exit"
                        );
                        trades.push(trade);
                        PositionState::Flat
                    }
                    None => PositionState::Long(position),
                }
            }
        };
    }

    if let PositionState::Long(position) = &state {
        debug!(entry = %position.entry_date, "position still open at end of history");
    }

    Ok(BacktestResult::from_trades(trades))
}
