//! Report configuration.
//!
//! Both dashboard tabs are the same pipeline with different parameters, so a
//! report is described by one `ReportSpec` rather than bespoke code per tab.

use crate::domain::{AxisPolicy, GroupingAxis, GrowthMetric, RawRecord, Rgb};
use crate::report::aggregate::{department_label, department_quantities};

/// Placeholder in `title_template` replaced by the active group's label.
pub const GROUP_PLACEHOLDER: &str = "{group}";

/// Default department column suffix.
pub const DEFAULT_DEPARTMENT_SUFFIX: &str = "Enrolled";

/// Category10 palette, in plotting order.
pub const DEFAULT_PALETTE: [Rgb; 10] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
    Rgb(0xe3, 0x77, 0xc2),
    Rgb(0x7f, 0x7f, 0x7f),
    Rgb(0xbc, 0xbd, 0x22),
    Rgb(0x17, 0xbe, 0xcf),
];

/// Where a report's categories come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySource {
    /// Fixed quantity names, labelled as-is.
    Fixed(Vec<String>),
    /// Every column ending in the suffix, labelled with the suffix stripped.
    Suffix(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSpec {
    pub name: String,
    pub categories: CategorySource,
    pub metrics: Vec<GrowthMetric>,
    pub grouping: GroupingAxis,
    pub palette: Vec<Rgb>,
    pub axis_policy: AxisPolicy,
    pub title_template: String,
}

impl ReportSpec {
    pub fn new(name: impl Into<String>, categories: CategorySource, metrics: Vec<GrowthMetric>) -> Self {
        Self {
            name: name.into(),
            categories,
            metrics,
            grouping: GroupingAxis::ByMetric,
            palette: DEFAULT_PALETTE.to_vec(),
            axis_policy: AxisPolicy::PerSeries,
            title_template: GROUP_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_grouping(mut self, grouping: GroupingAxis) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Rgb>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_axis_policy(mut self, policy: AxisPolicy) -> Self {
        self.axis_policy = policy;
        self
    }

    pub fn with_title_template(mut self, template: impl Into<String>) -> Self {
        self.title_template = template.into();
        self
    }

    /// Applications/Admissions/Enrollments, one selectable group per metric.
    pub fn overall() -> Self {
        Self::new(
            "Overall Metrics",
            CategorySource::Fixed(vec![
                "Applications".to_string(),
                "Admissions".to_string(),
                "Enrollments".to_string(),
            ]),
            vec![
                GrowthMetric::TotalIncrease,
                GrowthMetric::AverageYoy,
                GrowthMetric::Cagr,
            ],
        )
        .with_palette(vec![DEFAULT_PALETTE[0], DEFAULT_PALETTE[2], DEFAULT_PALETTE[3]])
    }

    /// One selectable group per department column ending in `suffix`.
    pub fn department(suffix: &str) -> Self {
        Self::new(
            "Dept. Enrollment % Changes",
            CategorySource::Suffix(suffix.to_string()),
            vec![GrowthMetric::AverageYoy, GrowthMetric::LatestYearIncrease],
        )
        .with_grouping(GroupingAxis::ByCategory)
        .with_palette(vec![DEFAULT_PALETTE[0], DEFAULT_PALETTE[1]])
        .with_title_template(format!("{GROUP_PLACEHOLDER}: Enrollment % Changes"))
    }

    /// Resolve `(lookup key, display label)` pairs against the records.
    pub fn resolve_categories(&self, records: &[RawRecord]) -> Vec<(String, String)> {
        match &self.categories {
            CategorySource::Fixed(names) => names.iter().map(|n| (n.clone(), n.clone())).collect(),
            CategorySource::Suffix(suffix) => department_quantities(records, suffix)
                .into_iter()
                .map(|q| {
                    let label = department_label(&q, suffix);
                    (q, label)
                })
                .collect(),
        }
    }
}

/// Fill `template`'s `{group}` placeholder with the active group's label.
pub(crate) fn render_title(template: &str, group: &str) -> String {
    template.replace(GROUP_PLACEHOLDER, group)
}

/// The two dashboard tabs, in display order.
pub fn default_specs(department_suffix: &str) -> Vec<ReportSpec> {
    vec![ReportSpec::overall(), ReportSpec::department(department_suffix)]
}
