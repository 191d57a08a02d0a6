//! Report tool: loads a book, runs the ledger engine, emits a JSON report.

pub mod config;
pub mod report;

pub use config::ReportConfig;
pub use report::{Report, build_report};
