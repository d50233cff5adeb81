//! I/O module
//!
//! Handles loading accounts and presenting run outcomes.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, result serialization)
//! - `account_source` - CSV-backed and in-memory account sources
//! - `report` - Summary line formatting and the channel-backed report view

pub mod account_source;
pub mod csv_format;
pub mod report;

pub use account_source::{CsvAccountSource, InMemoryAccountSource};
pub use csv_format::{convert_csv_movement, write_results_csv, CsvMovement, Movement};
pub use report::{summary_message, Report, ReportView};
