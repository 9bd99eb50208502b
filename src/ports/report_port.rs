//! Report output port.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::domain::analyzer::AnalysisResult;
use crate::domain::backtest::BacktestResult;
use crate::domain::error::SignalError;
use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::quote::Quote;

/// Everything a report needs about one analyzed symbol.
pub struct AnalysisReport<'a> {
    pub symbol: &'a str,
    pub quote: &'a Quote,
    pub indicators: &'a IndicatorSnapshot,
    pub analysis: &'a AnalysisResult,
}

/// Port for rendering analysis and backtest results.
pub trait ReportPort {
    fn write_analysis(
        &self,
        report: &AnalysisReport<'_>,
        out: &mut dyn Write,
    ) -> Result<(), SignalError>;

    fn write_backtest(
        &self,
        symbol: &str,
        result: &BacktestResult,
        out: &mut dyn Write,
    ) -> Result<(), SignalError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}', expected text or json")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!(" text ".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert!("html".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn format_display_round_trips() {
        for format in [ReportFormat::Text, ReportFormat::Json] {
            assert_eq!(format.to_string().parse::<ReportFormat>(), Ok(format));
        }
    }
}
