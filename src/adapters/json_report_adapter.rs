//! JSON report adapter.

use std::io::Write;

use serde::Serialize;

use crate::domain::analyzer::AnalysisResult;
use crate::domain::backtest::BacktestResult;
use crate::domain::error::SignalError;
use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::quote::Quote;
use crate::ports::report_port::{AnalysisReport, ReportPort};

#[derive(Serialize)]
struct AnalysisDocument<'a> {
    symbol: &'a str,
    quote: &'a Quote,
    indicators: &'a IndicatorSnapshot,
    analysis: &'a AnalysisResult,
}

#[derive(Serialize)]
struct BacktestDocument<'a> {
    symbol: &'a str,
    backtest: &'a BacktestResult,
}

/// Writes each report as one pretty-printed JSON document followed by a
/// newline.
#[derive(Debug, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn emit<T: Serialize>(&self, value: &T, out: &mut dyn Write) -> Result<(), SignalError> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_analysis(
        &self,
        report: &AnalysisReport<'_>,
        out: &mut dyn Write,
    ) -> Result<(), SignalError> {
        self.emit(
            &AnalysisDocument {
                symbol: report.symbol,
                quote: report.quote,
                indicators: report.indicators,
                analysis: report.analysis,
            },
            out,
        )
    }

    fn write_backtest(
        &self,
        symbol: &str,
        result: &BacktestResult,
        out: &mut dyn Write,
    ) -> Result<(), SignalError> {
        self.emit(
            &BacktestDocument {
                symbol,
                backtest: result,
            },
            out,
        )
    }
}
