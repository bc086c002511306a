//! Shared "report pipeline" logic used by the CLI, the TUI and the exports.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! records -> aggregation -> metric table -> chart model -> selector view
//!
//! The front-ends can then focus on presentation (printing vs widgets vs files).

use tracing::info;

use crate::chart::{ChartModel, ReportSpec, ReportView};
use crate::data::{SAMPLE_SOURCE, sample_records};
use crate::domain::{DashboardConfig, RawRecord};
use crate::error::{AppError, ReportResult};
use crate::io::ingest::{RowError, load_records};
use crate::report::{aggregate, build_metric_table};

/// All report views for one data load, in tab order.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub source: String,
    pub reports: Vec<ReportView>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Build one report from raw records. Pure; fails before any chart is built
/// if a quantity is missing or has too few years.
pub fn build_report(records: &[RawRecord], spec: &ReportSpec) -> ReportResult<ReportView> {
    let categories = spec.resolve_categories(records);
    let keys: Vec<String> = categories.iter().map(|(key, _)| key.clone()).collect();

    let series = aggregate(records, &keys)?;
    let table = build_metric_table(&spec.name, &series, &categories, &spec.metrics)?;
    let chart = ChartModel::build(&spec.name, &table, spec.grouping, &spec.palette)?;
    let view = ReportView::new(spec, table, chart);

    info!(
        report = spec.name.as_str(),
        categories = categories.len(),
        groups = view.chart().len(),
        title = view.title(),
        "report built"
    );
    Ok(view)
}

/// Build every report; the first failure aborts the whole dashboard.
pub fn build_dashboard(
    records: Vec<RawRecord>,
    source: String,
    specs: &[ReportSpec],
) -> ReportResult<Dashboard> {
    let reports = specs
        .iter()
        .map(|spec| build_report(&records, spec))
        .collect::<ReportResult<Vec<_>>>()?;

    Ok(Dashboard {
        source,
        reports,
        row_errors: Vec::new(),
        rows_read: records.len(),
        rows_used: records.len(),
    })
}

/// Load the configured data source and build the dashboard.
pub fn run_dashboard(config: &DashboardConfig) -> Result<Dashboard, AppError> {
    let specs = config.report_specs();

    let Some(path) = &config.csv_path else {
        return Ok(build_dashboard(sample_records(), SAMPLE_SOURCE.to_string(), &specs)?);
    };

    let ingested = load_records(path, &config.year_column)?;
    let row_errors = ingested.row_errors;
    let mut dashboard = build_dashboard(ingested.records, path.display().to_string(), &specs)
        .map_err(|err| with_skipped_rows(AppError::from(err), &row_errors))?;
    dashboard.row_errors = row_errors;
    dashboard.rows_read = ingested.rows_read;
    dashboard.rows_used = ingested.rows_used;
    Ok(dashboard)
}

/// Skipped rows are the usual cause of a later gap or missing year, so a
/// failed build names them.
fn with_skipped_rows(err: AppError, row_errors: &[RowError]) -> AppError {
    const SHOWN: usize = 3;
    if row_errors.is_empty() {
        return err;
    }

    let mut lines: Vec<String> = row_errors
        .iter()
        .take(SHOWN)
        .map(|e| format!("line {} {}", e.line, e.message))
        .collect();
    if row_errors.len() > SHOWN {
        lines.push(format!("and {} more", row_errors.len() - SHOWN));
    }
    let noun = if row_errors.len() == 1 { "row" } else { "rows" };
    AppError::new(
        err.exit_code(),
        format!("{err}; {} {noun} skipped: {}", row_errors.len(), lines.join("; ")),
    )
}
