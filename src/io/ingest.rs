//! CSV ingest and normalization.
//!
//! This module turns a yearly-records CSV into `RawRecord`s:
//!
//! - one year column (name configurable, matched case-insensitively)
//! - every other column is a numeric count, kept under its header name
//!
//! Design goals:
//! - **Strict schema** for the year column and headers (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no aggregation or metric logic here

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::RawRecord;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed records + row errors.
#[derive(Debug, Clone)]
pub struct IngestedRecords {
    pub records: Vec<RawRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load records from a CSV file on disk.
pub fn load_records(path: &Path, year_column: &str) -> Result<IngestedRecords, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_records(file, year_column)?;
    info!(
        path = %path.display(),
        rows_read = ingested.rows_read,
        rows_used = ingested.rows_used,
        "loaded CSV"
    );
    Ok(ingested)
}

/// Parse records from any CSV reader.
pub fn read_records<R: Read>(input: R, year_column: &str) -> Result<IngestedRecords, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = resolve_columns(&headers, year_column)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let outcome = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, &columns));
        match outcome {
            Ok(record) => records.push(record),
            Err(message) => {
                warn!(line, message = message.as_str(), "skipping CSV row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = records.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows remain after parsing the CSV."));
    }

    Ok(IngestedRecords {
        records,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Column layout: the year index plus `(index, name)` for every quantity.
#[derive(Debug)]
struct Columns {
    year: usize,
    quantities: Vec<(usize, String)>,
}

fn resolve_columns(headers: &StringRecord, year_column: &str) -> Result<Columns, AppError> {
    let wanted = year_column.trim().to_ascii_lowercase();
    let mut year = None;
    let mut quantities = Vec::new();
    let mut seen = HashSet::new();

    for (idx, raw) in headers.iter().enumerate() {
        let name = normalize_header_name(raw);
        if name.is_empty() {
            return Err(AppError::new(2, format!("CSV column {} has an empty header.", idx + 1)));
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(AppError::new(2, format!("Duplicate CSV column '{name}'.")));
        }
        if name.to_ascii_lowercase() == wanted {
            year = Some(idx);
        } else {
            quantities.push((idx, name));
        }
    }

    let year = year.ok_or_else(|| {
        AppError::new(2, format!("CSV is missing the year column '{year_column}'."))
    })?;
    Ok(Columns { year, quantities })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, the year column is never found.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<RawRecord, String> {
    let year_raw = record
        .get(columns.year)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing year".to_string())?;
    let year: i32 = year_raw
        .parse()
        .map_err(|_| format!("invalid year '{year_raw}'"))?;

    let mut out = RawRecord::new(year);
    for (idx, name) in &columns.quantities {
        let raw = record
            .get(*idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("missing value for '{name}'"))?;
        let value: f64 = raw
            .parse()
            .map_err(|_| format!("invalid number '{raw}' for '{name}'"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("'{name}' must be a non-negative count, got {raw}"));
        }
        out.values.insert(name.clone(), value);
    }
    Ok(out)
}
