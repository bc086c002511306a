//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data source (CSV or built-in sample)
//! - builds both reports
//! - prints, exports, or hands the views to the TUI

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, DashArgs, ExportArgs};
use crate::domain::{AxisPolicy, DashboardConfig};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable consulted when `--csv` is not given.
pub const CSV_ENV_VAR: &str = "DASHBOARD_CSV";

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `dash` and `dash -f data.csv` to behave like `dash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    // A subscriber writing to stderr would corrupt the alternate screen, so the
    // TUI only logs when asked to.
    if let Some(level) = &args.log_level {
        let _ = crate::telemetry::init_tracing(level);
    }
    let config = config_from_args(&args);
    crate::tui::run(config)
}

fn handle_summary(args: DashArgs) -> Result<(), AppError> {
    let _ = crate::telemetry::init_tracing(args.log_level.as_deref().unwrap_or("warn"));
    let config = config_from_args(&args);
    let dashboard = pipeline::run_dashboard(&config)?;
    print!("{}", crate::report::format_dashboard_summary(&dashboard));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let _ = crate::telemetry::init_tracing(args.common.log_level.as_deref().unwrap_or("warn"));
    let mut config = config_from_args(&args.common);
    config.export_json = args.json.clone();
    config.export_csv = args.csv_out.clone();

    if config.export_json.is_none() && config.export_csv.is_none() {
        return Err(AppError::new(2, "Nothing to export: pass --json and/or --csv-out."));
    }

    let dashboard = pipeline::run_dashboard(&config)?;
    if let Some(path) = &config.export_json {
        crate::io::export::write_dashboard_json(path, &dashboard)?;
        info!(path = %path.display(), "wrote JSON export");
        println!("Views written to {}.", path.display());
    }
    if let Some(path) = &config.export_csv {
        crate::io::export::write_metric_tables_csv(path, &dashboard)?;
        info!(path = %path.display(), "wrote CSV export");
        println!("Metric tables written to {}.", path.display());
    }
    Ok(())
}

pub fn config_from_args(args: &DashArgs) -> DashboardConfig {
    DashboardConfig {
        csv_path: args.csv.clone().or_else(csv_path_from_env),
        year_column: args.year_column.clone(),
        department_suffix: args.department_suffix.clone(),
        axis_policy: if args.shared_axis {
            AxisPolicy::Shared
        } else {
            AxisPolicy::PerSeries
        },
        palette: (!args.palette.is_empty()).then(|| args.palette.clone()),
        export_json: None,
        export_csv: None,
    }
}

/// `DASHBOARD_CSV` from the environment or a `.env` file, if set and non-empty.
fn csv_path_from_env() -> Option<PathBuf> {
    dotenvy::dotenv().ok();
    std::env::var(CSV_ENV_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                      -> `dash tui`
/// - `dash -f data.csv ...`      -> `dash tui -f data.csv ...`
/// - `dash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "summary" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
