//! Formatted terminal output for `dash summary`.
//!
//! We keep formatting code in one place so:
//! - the metric/chart code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::Dashboard;
use crate::chart::ReportView;
use crate::report::metrics::MetricTable;

/// Format every report of the dashboard, plus ingest notes.
pub fn format_dashboard_summary(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    out.push_str("=== dash - University Growth & Dept. Enrollment ===\n");
    out.push_str(&format!("Source: {}\n", dashboard.source));
    out.push_str(&format!(
        "Rows: read={} used={}\n",
        dashboard.rows_read, dashboard.rows_used
    ));
    for e in &dashboard.row_errors {
        out.push_str(&format!("  (skipped line {}) {}\n", e.line, e.message));
    }

    for view in &dashboard.reports {
        out.push('\n');
        out.push_str(&format_view_summary(view));
    }

    out
}

/// Format one report: the metric table followed by the active chart state.
pub fn format_view_summary(view: &ReportView) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {}\n", view.name()));
    out.push_str(&format_metric_table(view.table()));
    out.push('\n');

    let range = view.axis_range();
    out.push_str(&format!(
        "Active: {} | y=[{:.1}, {:.1}]\n",
        view.title(),
        range.min,
        range.max
    ));
    for bar in &view.active_series().bars {
        out.push_str(&format!("  {:<24} {:>8}\n", truncate(&bar.x_label, 24), bar.text));
    }
    out
}

/// Category rows × metric columns, "N/A" for undefined cells.
pub fn format_metric_table(table: &MetricTable) -> String {
    let mut out = String::new();

    let headers: Vec<String> = table.metrics().iter().map(|&m| table.metric_label(m)).collect();
    let mut line = format!("{:<24}", "category");
    for h in &headers {
        line.push_str(&format!(" {:>16}", truncate(h, 16)));
    }
    out.push_str(line.trim_end());
    out.push('\n');

    let mut rule = format!("{:-<24}", "");
    for _ in &headers {
        rule.push_str(&format!(" {:-<16}", ""));
    }
    out.push_str(&rule);
    out.push('\n');

    for row in table.rows().values() {
        let mut line = format!("{:<24}", truncate(&row.label, 24));
        for metric in table.metrics() {
            let cell = row.values.get(metric).map(|v| v.to_string()).unwrap_or_default();
            line.push_str(&format!(" {cell:>16}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
