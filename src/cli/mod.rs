//! Command-line parsing for the enrollment dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the metric/chart code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Rgb;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "University Growth & Dept. Enrollment Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive two-tab dashboard (default).
    Tui(DashArgs),
    /// Print every report's metric table and active chart.
    Summary(DashArgs),
    /// Write the dashboard views to JSON and/or the metric tables to CSV.
    Export(ExportArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    /// Yearly records CSV (falls back to DASHBOARD_CSV, then the built-in sample).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Header of the year column.
    #[arg(long, default_value = "Year")]
    pub year_column: String,

    /// Columns ending with this suffix are treated as departments.
    #[arg(long, default_value = "Enrolled")]
    pub department_suffix: String,

    /// Keep one y-range across all selections of a report.
    #[arg(long)]
    pub shared_axis: bool,

    /// Bar colors for every report, e.g. `#1f77b4,#ff7f0e,#2ca02c`.
    #[arg(long, value_delimiter = ',', value_name = "HEX")]
    pub palette: Vec<Rgb>,

    /// Log level (overridden by RUST_LOG). Logging is off in the TUI unless set.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Options for `dash export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub common: DashArgs,

    /// Write the report views as JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Write the metric tables as long-form CSV.
    #[arg(long = "csv-out", value_name = "CSV")]
    pub csv_out: Option<PathBuf>,
}
