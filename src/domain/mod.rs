//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input rows (`RawRecord`) and aggregated series (`YearSeries`)
//! - metric kinds and cell values (`GrowthMetric`, `MetricValue`)
//! - chart configuration enums (`GroupingAxis`, `AxisPolicy`) and colors (`Rgb`)

pub mod types;

pub use types::*;
