//! Port traits the domain depends on for data, configuration and output.

pub mod config_port;
pub mod data_port;
pub mod report_port;
