//! Raw records → per-quantity year series.
//!
//! Group-by-year + sum, followed by the checks every growth metric relies on:
//! at least two years, no gaps, and finite non-negative counts.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::domain::{RawRecord, YearSeries};
use crate::error::{ReportError, ReportResult};

/// Build one `YearSeries` per requested quantity, in request order.
///
/// Fails on the first quantity that is absent, ragged, invalid, or too short.
pub fn aggregate(
    records: &[RawRecord],
    quantities: &[String],
) -> ReportResult<IndexMap<String, YearSeries>> {
    let mut out = IndexMap::with_capacity(quantities.len());
    for quantity in quantities {
        let series = aggregate_quantity(records, quantity)?;
        debug!(
            quantity = quantity.as_str(),
            years = series.len(),
            "aggregated year series"
        );
        out.insert(quantity.clone(), series);
    }
    Ok(out)
}

fn aggregate_quantity(records: &[RawRecord], quantity: &str) -> ReportResult<YearSeries> {
    if !records.iter().any(|r| r.values.contains_key(quantity)) {
        return Err(ReportError::InvalidQuantity {
            quantity: quantity.to_string(),
        });
    }

    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        let value = record.get(quantity).ok_or_else(|| ReportError::MissingValue {
            quantity: quantity.to_string(),
            year: record.year,
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(ReportError::InvalidValue {
                quantity: quantity.to_string(),
                year: record.year,
                value,
            });
        }
        *by_year.entry(record.year).or_insert(0.0) += value;
    }

    if by_year.len() < 2 {
        return Err(ReportError::InsufficientData {
            quantity: quantity.to_string(),
            years: by_year.len(),
        });
    }

    let points: Vec<(i32, f64)> = by_year.into_iter().collect();
    if let Some(w) = points.windows(2).find(|w| w[1].0 != w[0].0 + 1) {
        return Err(ReportError::YearGap {
            quantity: quantity.to_string(),
            from: w[0].0,
            to: w[1].0,
        });
    }

    Ok(YearSeries::new(quantity, points))
}

/// Column names ending in `suffix`, in first-seen column order.
pub fn department_quantities(records: &[RawRecord], suffix: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for record in records {
        for name in record.values.keys() {
            if name.ends_with(suffix) && !out.iter().any(|q| q == name) {
                out.push(name.clone());
            }
        }
    }
    out
}

/// Display label for a department column: the suffix stripped, trimmed.
///
/// Falls back to the full name if stripping would leave nothing.
pub fn department_label(quantity: &str, suffix: &str) -> String {
    let stripped = quantity.strip_suffix(suffix).unwrap_or(quantity).trim();
    if stripped.is_empty() {
        quantity.to_string()
    } else {
        stripped.to_string()
    }
}
