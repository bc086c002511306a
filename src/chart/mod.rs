//! Chart state for the dashboard.
//!
//! - `spec`: report configuration (`ReportSpec`) and the built-in tabs
//! - `model`: bar series + axis-range policy (`ChartModel`, `AxisRange`)
//! - `selector`: menu entries and the selection state machine (`ReportView`)

pub mod model;
pub mod selector;
pub mod spec;

pub use model::*;
pub use selector::*;
pub use spec::*;
