//! Shared domain types.
//!
//! These types are intentionally kept lightweight value objects so they can be:
//!
//! - built fresh on every report build
//! - exported to JSON/CSV
//! - handed to any rendering host without shared state

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::chart::spec::{DEFAULT_DEPARTMENT_SUFFIX, ReportSpec, default_specs};
use crate::error::ReportError;

/// One observation row: a year plus one count per tracked quantity.
///
/// Column order is preserved because it doubles as the department display order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub year: i32,
    pub values: IndexMap<String, f64>,
}

impl RawRecord {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            values: IndexMap::new(),
        }
    }

    /// Builder-style helper used by the sample dataset and tests.
    pub fn with(mut self, quantity: impl Into<String>, value: f64) -> Self {
        self.values.insert(quantity.into(), value);
        self
    }

    pub fn get(&self, quantity: &str) -> Option<f64> {
        self.values.get(quantity).copied()
    }
}

/// Year → aggregate value for one quantity, ascending by year.
///
/// Built by the aggregator, which guarantees at least two consecutive years.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
    quantity: String,
    points: Vec<(i32, f64)>,
}

impl YearSeries {
    /// `points` must already be sorted by year with unique years.
    pub(crate) fn new(quantity: impl Into<String>, points: Vec<(i32, f64)>) -> Self {
        Self {
            quantity: quantity.into(),
            points,
        }
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn points(&self) -> &[(i32, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<(i32, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(i32, f64)> {
        self.points.last().copied()
    }

    /// `lastYear - firstYear`, or 0 for an empty series.
    pub fn year_span(&self) -> i32 {
        match (self.first(), self.last()) {
            (Some((y0, _)), Some((y1, _))) => y1 - y0,
            _ => 0,
        }
    }

    /// Adjacent `(previous, current)` value pairs.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0].1, w[1].1))
    }
}

/// Growth statistics derived from a `YearSeries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthMetric {
    TotalIncrease,
    AverageYoy,
    Cagr,
    LatestYearIncrease,
}

impl GrowthMetric {
    pub const ALL: [GrowthMetric; 4] = [
        GrowthMetric::TotalIncrease,
        GrowthMetric::AverageYoy,
        GrowthMetric::Cagr,
        GrowthMetric::LatestYearIncrease,
    ];

    /// Human-readable label for terminal output.
    ///
    /// `LatestYearIncrease` is labelled after the final observed year
    /// (e.g. "2024 Increase").
    pub fn display_name(self, final_year: i32) -> String {
        match self {
            GrowthMetric::TotalIncrease => "Total Increase".to_string(),
            GrowthMetric::AverageYoy => "Average YoY".to_string(),
            GrowthMetric::Cagr => "CAGR".to_string(),
            GrowthMetric::LatestYearIncrease => format!("{final_year} Increase"),
        }
    }
}

/// A metric cell: a percent value, or `Undefined` when the metric has a zero
/// denominator or too few years.
///
/// `Undefined` is never a bar of height 0; hosts render it as "N/A".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Value(f64),
    Undefined,
}

impl MetricValue {
    /// Wrap a computed percent, mapping non-finite results to `Undefined`.
    pub fn from_percent(value: f64) -> Self {
        if value.is_finite() {
            MetricValue::Value(value)
        } else {
            MetricValue::Undefined
        }
    }

    /// Round to one decimal place. Negative zero collapses to zero.
    pub fn rounded(self) -> Self {
        match self {
            MetricValue::Value(v) => {
                let r = (v * 10.0).round() / 10.0;
                MetricValue::Value(if r == 0.0 { 0.0 } else { r })
            }
            MetricValue::Undefined => MetricValue::Undefined,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(v),
            MetricValue::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, MetricValue::Value(_))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounded() {
            MetricValue::Value(v) => write!(f, "{v:.1}%"),
            MetricValue::Undefined => write!(f, "N/A"),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Which dimension becomes the selectable group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingAxis {
    /// One group per metric; categories are the bars.
    ByMetric,
    /// One group per category; metrics are the bars.
    ByCategory,
}

/// How the y-range follows the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPolicy {
    /// Range computed from the active series only.
    #[default]
    PerSeries,
    /// One range over every series, so switching groups never rescales.
    Shared,
}

/// 24-bit palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl FromStr for Rgb {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReportError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` / environment defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// CSV to load; the built-in sample is used when absent.
    pub csv_path: Option<PathBuf>,
    /// Header of the year column (case-insensitive).
    pub year_column: String,
    /// Columns ending in this suffix are departments.
    pub department_suffix: String,
    pub axis_policy: AxisPolicy,
    /// Overrides every report's palette when set.
    pub palette: Option<Vec<Rgb>>,

    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            year_column: "Year".to_string(),
            department_suffix: DEFAULT_DEPARTMENT_SUFFIX.to_string(),
            axis_policy: AxisPolicy::PerSeries,
            palette: None,
            export_json: None,
            export_csv: None,
        }
    }
}

impl DashboardConfig {
    /// The dashboard tabs with this config's axis policy and palette applied.
    pub fn report_specs(&self) -> Vec<ReportSpec> {
        default_specs(&self.department_suffix)
            .into_iter()
            .map(|spec| {
                let spec = spec.with_axis_policy(self.axis_policy);
                match &self.palette {
                    Some(palette) => spec.with_palette(palette.clone()),
                    None => spec,
                }
            })
            .collect()
    }
}
