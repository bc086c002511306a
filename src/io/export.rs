//! Export dashboard state for other hosts.
//!
//! - JSON: every report view as a host would render it (series, bars, colors,
//!   visibility, selector labels, axis range, title)
//! - CSV: the metric tables in long form, easy to consume in spreadsheets

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;
use serde::Serialize;

use crate::app::pipeline::Dashboard;
use crate::chart::{AxisRange, Bar, ReportView};
use crate::domain::AxisPolicy;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct DashboardExport<'a> {
    pub tool: &'static str,
    pub generated_at: String,
    pub source: &'a str,
    pub reports: Vec<ReportExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ReportExport<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub active: usize,
    pub axis_policy: AxisPolicy,
    pub axis_range: AxisRange,
    pub selectors: Vec<&'a str>,
    pub series: Vec<SeriesExport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SeriesExport<'a> {
    pub label: &'a str,
    pub visible: bool,
    pub bars: &'a [Bar],
}

pub fn dashboard_export(dashboard: &Dashboard) -> DashboardExport<'_> {
    DashboardExport {
        tool: "dash",
        generated_at: Local::now().to_rfc3339(),
        source: &dashboard.source,
        reports: dashboard.reports.iter().map(report_export).collect(),
    }
}

fn report_export(view: &ReportView) -> ReportExport<'_> {
    let chart = view.chart();
    ReportExport {
        name: view.name(),
        title: view.title(),
        active: chart.active_index(),
        axis_policy: view.axis_policy(),
        axis_range: view.axis_range(),
        selectors: view.selectors().iter().map(|e| e.label.as_str()).collect(),
        series: chart
            .series()
            .iter()
            .enumerate()
            .map(|(i, s)| SeriesExport {
                label: &s.label,
                visible: chart.is_active(i),
                bars: &s.bars,
            })
            .collect(),
    }
}

/// Write the dashboard views as pretty JSON.
pub fn write_dashboard_json(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &dashboard_export(dashboard))
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// Write every metric table as `report,category,metric,value` rows.
///
/// Undefined cells are written as an empty `value`.
pub fn write_metric_tables_csv(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_metric_tables(file, dashboard)
}

pub fn write_metric_tables<W: Write>(out: W, dashboard: &Dashboard) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["report", "category", "metric", "value"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for view in &dashboard.reports {
        let table = view.table();
        for row in table.rows().values() {
            for &metric in table.metrics() {
                let value = row
                    .values
                    .get(&metric)
                    .and_then(|v| v.value())
                    .map(|v| format!("{v:.1}"))
                    .unwrap_or_default();
                writer
                    .write_record([
                        view.name(),
                        row.label.as_str(),
                        table.metric_label(metric).as_str(),
                        value.as_str(),
                    ])
                    .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
            }
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
