//! Trade statistics for a finished backtest.
//!
//! All inputs are the per-trade percent returns as recorded on each
//! `BacktestTrade` (already rounded to 2 places).

use serde::Serialize;

use crate::domain::numeric::round2;
use crate::domain::position::BacktestTrade;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    pub total_trades: usize,
    pub win_trades: usize,
    pub lose_trades: usize,
    /// Percent of trades with a positive return.
    pub win_rate: f64,
    /// Sum of per-trade percent returns, not compounded.
    pub total_return: f64,
    pub avg_return: f64,
    /// Largest peak-to-trough drop of the compounded equity curve, in percent.
    pub max_drawdown: f64,
    /// Mean over sample standard deviation of per-trade returns.
    pub sharpe_ratio: f64,
}

impl TradeStats {
    pub fn compute(trades: &[BacktestTrade]) -> Self {
        if trades.is_empty() {
            return TradeStats::default();
        }

        let returns: Vec<f64> = trades.iter().map(|t| t.return_pct).collect();
        let total_trades = returns.len();
        let win_trades = returns.iter().filter(|&&r| r > 0.0).count();
        let lose_trades = total_trades - win_trades;

        let total: f64 = returns.iter().sum();
        let n = total_trades as f64;

        TradeStats {
            total_trades,
            win_trades,
            lose_trades,
            win_rate: round2(win_trades as f64 / n * 100.0),
            total_return: round2(total),
            avg_return: round2(total / n),
            max_drawdown: round2(compute_drawdown(&returns) * 100.0),
            sharpe_ratio: round2(sharpe_like(&returns)),
        }
    }
}

/// Equity starts at 1.0 and compounds by each trade's return.
fn compute_drawdown(returns_pct: &[f64]) -> f64 {
    let mut equity = 1.0_f64;
    let mut peak = equity;
    let mut max_dd = 0.0_f64;

    for r in returns_pct {
        equity *= 1.0 + r / 100.0;
        if equity > peak {
            peak = equity;
        } else if peak > 0.0 {
            let dd = (peak - equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

fn sharpe_like(returns_pct: &[f64]) -> f64 {
    if returns_pct.len() < 2 {
        return 0.0;
    }

    let n = returns_pct.len() as f64;
    let mean = returns_pct.iter().sum::<f64>() / n;
    let variance = returns_pct.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 { mean / stddev } else { 0.0 }
}
