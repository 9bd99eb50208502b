//! Concrete adapter implementations for ports.

pub mod cache;
pub mod cached_data_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_report_adapter;
pub mod text_report_adapter;

use crate::ports::report_port::{ReportFormat, ReportPort};

/// Report adapter for the requested output format.
pub fn report_adapter(format: ReportFormat) -> Box<dyn ReportPort> {
    match format {
        ReportFormat::Text => Box::new(text_report_adapter::TextReportAdapter::new()),
        ReportFormat::Json => Box::new(json_report_adapter::JsonReportAdapter::new()),
    }
}
