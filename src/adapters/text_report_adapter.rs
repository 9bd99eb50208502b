//! Plain-text report adapter.
//!
//! Renders the analysis as a short terminal summary followed by an
//! indicator table, and the backtest as statistics plus a trade log.

use std::io::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SignalError;
use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::position::BacktestTrade;
use crate::ports::report_port::{AnalysisReport, ReportPort};

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for TextReportAdapter {
    fn write_analysis(
        &self,
        report: &AnalysisReport<'_>,
        out: &mut dyn Write,
    ) -> Result<(), SignalError> {
        let quote = report.quote;
        let analysis = report.analysis;

        writeln!(
            out,
            "{}  {:.2}  {:+.2} ({:+.2}%)",
            report.symbol, quote.price, quote.change, quote.change_percent
        )?;
        writeln!(out, "Signal: {} (score {:+})", analysis.signal, analysis.score)?;
        writeln!(out)?;
        writeln!(out, "{}", analysis.summary)?;
        writeln!(out)?;
        writeln!(out, "{}", analysis.suggestion)?;
        writeln!(
            out,
            "Stop loss: {:.2}  Take profit: {:.2}",
            analysis.stop_loss, analysis.take_profit
        )?;
        writeln!(out)?;
        out.write_all(format_indicators(report.indicators).as_bytes())?;
        Ok(())
    }

    fn write_backtest(
        &self,
        symbol: &str,
        result: &BacktestResult,
        out: &mut dyn Write,
    ) -> Result<(), SignalError> {
        let stats = &result.stats;

        writeln!(out, "Backtest {symbol}")?;
        writeln!(
            out,
            "Trades: {} (win {} / lose {})  Win rate: {:.2}%",
            stats.total_trades, stats.win_trades, stats.lose_trades, stats.win_rate
        )?;
        writeln!(
            out,
            "Total return: {:.2}%  Avg return: {:.2}%",
            stats.total_return, stats.avg_return
        )?;
        writeln!(
            out,
            "Max drawdown: {:.2}%  Sharpe: {:.2}",
            stats.max_drawdown, stats.sharpe_ratio
        )?;

        if result.trades.is_empty() {
            writeln!(out, "No completed trades.")?;
            return Ok(());
        }

        writeln!(out)?;
        out.write_all(format_trade_log(&result.trades).as_bytes())?;
        Ok(())
    }
}

fn opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn format_indicators(ind: &IndicatorSnapshot) -> String {
    let mut output = String::new();
    output.push_str("Indicators\n");
    output.push_str(&format!(
        "  MA      5: {}  10: {}  20: {}  60: {}  120: {}\n",
        opt(ind.ma.ma5),
        opt(ind.ma.ma10),
        opt(ind.ma.ma20),
        opt(ind.ma.ma60),
        opt(ind.ma.ma120)
    ));
    output.push_str(&format!(
        "  MACD    DIF: {:.4}  DEA: {:.4}  hist: {:.4}\n",
        ind.macd.dif, ind.macd.dea, ind.macd.histogram
    ));
    output.push_str(&format!(
        "  RSI     6: {}  12: {}  24: {}\n",
        opt(ind.rsi.rsi6),
        opt(ind.rsi.rsi12),
        opt(ind.rsi.rsi24)
    ));
    output.push_str(&format!(
        "  KDJ     K: {:.2}  D: {:.2}  J: {:.2}\n",
        ind.kdj.k, ind.kdj.d, ind.kdj.j
    ));
    match &ind.boll {
        Some(b) => output.push_str(&format!(
            "  BOLL    upper: {:.2}  middle: {:.2}  lower: {:.2}\n",
            b.upper, b.middle, b.lower
        )),
        None => output.push_str("  BOLL    n/a\n"),
    }
    output.push_str(&format!("  ATR     {}\n", opt(ind.atr)));
    output.push_str(&format!("  OBV     {:.0}\n", ind.obv));
    output.push_str(&format!("  Vol/avg {}\n", opt(ind.volume_ratio)));
    if let Some(hint) = &ind.divergence {
        for line in &hint.description {
            output.push_str(&format!("  Divergence: {line}\n"));
        }
    }
    output
}

fn format_trade_log(trades: &[BacktestTrade]) -> String {
    let mut output = format!(
        "{:<20} {:>10} {:<20} {:>10} {:>8} {:>5}  {}\n",
        "Buy date", "Buy", "Sell date", "Sell", "Return", "Days", "Exit"
    );
    for t in trades {
        output.push_str(&format!(
            "{:<20} {:>10.2} {:<20} {:>10.2} {:>7.2}% {:>5}  {}\n",
            t.buy_date, t.buy_price, t.sell_date, t.sell_price, t.return_pct, t.hold_days,
            t.exit_reason
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analyzer::{AnalysisResult, Signal};
    use crate::domain::metrics::TradeStats;
    use crate::domain::position::ExitReason;
    use crate::domain::quote::Quote;

    fn quote() -> Quote {
        Quote {
            price: 15.0,
            open: 14.6,
            high: 15.2,
            low: 14.5,
            close: 14.5,
            volume: 1_000.0,
            amount: 15_000.0,
            change: 0.5,
            change_percent: 3.45,
            turnover: 0.0,
        }
    }

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            signal: Signal::Bullish,
            score: 35,
            summary: "Bullish signal\n\nMA bullish stack (+25)".into(),
            suggestion: "Bullish: consider building a position on dips.".into(),
            stop_loss: 14.0,
            take_profit: 16.5,
        }
    }

    fn render_analysis(ind: &IndicatorSnapshot) -> String {
        let quote = quote();
        let analysis = analysis();
        let report = AnalysisReport {
            symbol: "600519",
            quote: &quote,
            indicators: ind,
            analysis: &analysis,
        };
        let mut out = Vec::new();
        TextReportAdapter::new()
            .write_analysis(&report, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn analysis_header_and_levels() {
        let text = render_analysis(&IndicatorSnapshot::default());
        let first = text.lines().next().unwrap();
        assert_eq!(first, "600519  15.00  +0.50 (+3.45%)");
        assert!(text.contains("Signal: bullish (score +35)"));
        assert!(text.contains("Stop loss: 14.00  Take profit: 16.50"));
    }

    #[test]
    fn undefined_indicators_render_as_na() {
        let text = render_analysis(&IndicatorSnapshot::default());
        assert!(text.contains("RSI     6: n/a"));
        assert!(text.contains("BOLL    n/a"));
        assert!(text.contains("ATR     n/a"));
    }

    #[test]
    fn empty_backtest_says_so() {
        let result = BacktestResult {
            stats: TradeStats::default(),
            trades: Vec::new(),
        };
        let mut out = Vec::new();
        TextReportAdapter::new()
            .write_backtest("600519", &result, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Backtest 600519\n"));
        assert!(text.contains("Trades: 0 (win 0 / lose 0)"));
        assert!(text.ends_with("No completed trades.\n"));
    }

    #[test]
    fn trade_log_lists_exit_reason() {
        let trades = vec![BacktestTrade {
            buy_date: "2024-03-01".into(),
            buy_price: 10.0,
            sell_date: "2024-03-08".into(),
            sell_price: 10.8,
            return_pct: 8.0,
            exit_reason: ExitReason::TakeProfit,
            hold_days: 5,
        }];
        let log = format_trade_log(&trades);
        let row = log.lines().nth(1).unwrap();
        assert!(row.starts_with("2024-03-01"));
        assert!(row.contains("8.00%"));
        assert!(row.ends_with("take profit"));
    }
}
