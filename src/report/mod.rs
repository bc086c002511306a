//! Reporting utilities: aggregation, growth metrics, and terminal tables.

pub mod aggregate;
pub mod format;
pub mod metrics;

pub use aggregate::{aggregate, department_label, department_quantities};
pub use format::{format_dashboard_summary, format_metric_table, format_view_summary};
pub use metrics::{MetricRow, MetricTable, build_metric_table};
