//! `enrollment-dashboard` library crate.
//!
//! The binary (`dash`) is a thin wrapper around this library so that:
//!
//! - the metric and selection logic is testable without a terminal
//! - any other host (web, notebook, exports) can reuse the same report views
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod telemetry;
pub mod tui;

pub use app::pipeline::{Dashboard, build_dashboard, build_report};
pub use error::{AppError, ReportError, ReportResult};
