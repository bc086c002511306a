//! Metric table → bar series, one series per selectable group.
//!
//! Visibility is a single `active` index rather than one flag per series, so
//! "exactly one visible series" holds by construction.

use serde::Serialize;

use crate::domain::{AxisPolicy, GroupingAxis, MetricValue, Rgb};
use crate::error::{ReportError, ReportResult};
use crate::report::metrics::MetricTable;

/// Y-axis bounds for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Range used when there is nothing to scale to.
    pub const FALLBACK: AxisRange = AxisRange { min: 0.0, max: 1.0 };

    /// Sign-aware range over `values`.
    ///
    /// - all non-negative: `[0, max * 1.1]`
    /// - any negative: pad both ends by 10% of the largest magnitude
    pub fn for_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in values.into_iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if !(lo.is_finite() && hi.is_finite()) {
            return Self::FALLBACK;
        }

        if lo >= 0.0 {
            if hi == 0.0 {
                return Self::FALLBACK;
            }
            return AxisRange { min: 0.0, max: hi * 1.1 };
        }

        let pad = lo.abs().max(hi.abs()) * 0.10;
        if lo < hi {
            AxisRange {
                min: lo - pad,
                max: hi + pad,
            }
        } else {
            AxisRange {
                min: hi - pad,
                max: lo + pad,
            }
        }
    }
}

/// One bar within a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub x_label: String,
    pub value: MetricValue,
    /// Display text, e.g. "4.7%" or "N/A".
    pub text: String,
    pub color: Rgb,
}

/// A bar group: the unit the selector switches between.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub bars: Vec<Bar>,
}

impl ChartSeries {
    /// Values of the bars that are defined (`N/A` bars are skipped).
    pub fn defined_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().filter_map(|b| b.value.value())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    series: Vec<ChartSeries>,
    active: usize,
}

impl ChartModel {
    /// Build the series for `table`, grouped along `grouping`.
    ///
    /// The first group starts active. `palette` is matched to bar positions and
    /// must have at least one color per bar.
    pub fn build(
        report: &str,
        table: &MetricTable,
        grouping: GroupingAxis,
        palette: &[Rgb],
    ) -> ReportResult<Self> {
        let bars_per_series = match grouping {
            GroupingAxis::ByMetric => table.rows().len(),
            GroupingAxis::ByCategory => table.metrics().len(),
        };
        if palette.len() < bars_per_series {
            return Err(ReportError::PaletteTooShort {
                report: report.to_string(),
                needed: bars_per_series,
                available: palette.len(),
            });
        }

        let series: Vec<ChartSeries> = match grouping {
            GroupingAxis::ByMetric => table
                .metrics()
                .iter()
                .map(|&metric| ChartSeries {
                    label: table.metric_label(metric),
                    bars: table
                        .rows()
                        .values()
                        .zip(palette)
                        .map(|(row, &color)| {
                            let value = row.values.get(&metric).copied().unwrap_or(MetricValue::Undefined);
                            bar(row.label.clone(), value, color)
                        })
                        .collect(),
                })
                .collect(),
            GroupingAxis::ByCategory => table
                .rows()
                .values()
                .map(|row| ChartSeries {
                    label: row.label.clone(),
                    bars: table
                        .metrics()
                        .iter()
                        .zip(palette)
                        .map(|(&metric, &color)| {
                            let value = row.values.get(&metric).copied().unwrap_or(MetricValue::Undefined);
                            bar(table.metric_label(metric), value, color)
                        })
                        .collect(),
                })
                .collect(),
        };

        if series.is_empty() {
            return Err(match grouping {
                GroupingAxis::ByMetric => ReportError::NoMetrics {
                    report: report.to_string(),
                },
                GroupingAxis::ByCategory => ReportError::NoCategories {
                    report: report.to_string(),
                },
            });
        }

        Ok(Self { series, active: 0 })
    }

    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &ChartSeries {
        &self.series[self.active]
    }

    pub fn is_active(&self, index: usize) -> bool {
        index == self.active
    }

    /// Dense visibility flags, for hosts that toggle series one by one.
    pub fn visibility(&self) -> Vec<bool> {
        (0..self.series.len()).map(|i| i == self.active).collect()
    }

    pub(crate) fn set_active(&mut self, index: usize) -> ReportResult<()> {
        if index >= self.series.len() {
            return Err(ReportError::UnknownSelection {
                index,
                groups: self.series.len(),
            });
        }
        self.active = index;
        Ok(())
    }

    /// Axis range for the current state under `policy`.
    pub fn axis_range(&self, policy: AxisPolicy) -> AxisRange {
        match policy {
            AxisPolicy::PerSeries => AxisRange::for_values(self.active().defined_values()),
            AxisPolicy::Shared => {
                AxisRange::for_values(self.series.iter().flat_map(|s| s.defined_values()))
            }
        }
    }
}

fn bar(x_label: String, value: MetricValue, color: Rgb) -> Bar {
    Bar {
        x_label,
        value,
        text: value.to_string(),
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    use crate::domain::{GrowthMetric, YearSeries};
    use crate::report::metrics::build_metric_table;

    fn palette(n: usize) -> Vec<Rgb> {
        (0..n).map(|i| Rgb(i as u8, 0, 0)).collect()
    }

    fn table() -> MetricTable {
        let mut map = IndexMap::new();
        map.insert(
            "Arts Enrolled".to_string(),
            YearSeries::new("Arts Enrolled", vec![(2023, 100.0), (2024, 106.0)]),
        );
        map.insert(
            "Science Enrolled".to_string(),
            YearSeries::new("Science Enrolled", vec![(2023, 100.0), (2024, 87.0)]),
        );
        let cats = vec![
            ("Arts Enrolled".to_string(), "Arts".to_string()),
            ("Science Enrolled".to_string(), "Science".to_string()),
        ];
        build_metric_table(
            "dept",
            &map,
            &cats,
            &[GrowthMetric::AverageYoy, GrowthMetric::LatestYearIncrease],
        )
        .unwrap()
    }

    #[test]
    fn non_negative_range_starts_at_zero() {
        let r = AxisRange::for_values([4.0, 10.0, 2.5]);
        assert_eq!(r.min, 0.0);
        assert_relative_eq!(r.max, 11.0, epsilon = 1e-12);
    }

    #[test]
    fn all_zero_range_is_not_degenerate() {
        assert_eq!(AxisRange::for_values([0.0, 0.0]), AxisRange::FALLBACK);
        assert_eq!(AxisRange::for_values(std::iter::empty()), AxisRange::FALLBACK);
    }

    #[test]
    fn mixed_sign_range_is_padded_by_largest_magnitude() {
        let r = AxisRange::for_values([-2.3, 4.7]);
        assert_relative_eq!(r.min, -2.3 - 0.47, epsilon = 1e-12);
        assert_relative_eq!(r.max, 4.7 + 0.47, epsilon = 1e-12);
    }

    #[test]
    fn single_negative_value_uses_symmetric_fallback() {
        let r = AxisRange::for_values([-13.0, -13.0]);
        assert_relative_eq!(r.min, -14.3, epsilon = 1e-12);
        assert_relative_eq!(r.max, -11.7, epsilon = 1e-12);
        assert!(r.min < -13.0 && r.max > -13.0);
    }

    #[test]
    fn by_category_groups_departments() {
        let t = table();
        let chart = ChartModel::build("dept", &t, GroupingAxis::ByCategory, &palette(2)).unwrap();
        assert_eq!(chart.len(), 2);
        assert_eq!(chart.active_index(), 0);
        assert_eq!(chart.visibility(), vec![true, false]);

        let science = &chart.series()[1];
        assert_eq!(science.label, "Science");
        assert_eq!(science.bars[1].x_label, "2024 Increase");
        assert_eq!(science.bars[1].text, "-13.0%");
        assert_eq!(science.bars[1].color, Rgb(1, 0, 0));
    }

    #[test]
    fn by_metric_groups_metrics() {
        let t = table();
        let chart = ChartModel::build("dept", &t, GroupingAxis::ByMetric, &palette(2)).unwrap();
        let labels: Vec<_> = chart.series().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Average YoY", "2024 Increase"]);
        let xs: Vec<_> = chart.active().bars.iter().map(|b| b.x_label.as_str()).collect();
        assert_eq!(xs, vec!["Arts", "Science"]);
    }

    #[test]
    fn short_palette_is_rejected() {
        let err = ChartModel::build("dept", &table(), GroupingAxis::ByCategory, &palette(1)).unwrap_err();
        assert_eq!(
            err,
            ReportError::PaletteTooShort {
                report: "dept".to_string(),
                needed: 2,
                available: 1
            }
        );
    }

    #[test]
    fn undefined_cells_become_na_bars_outside_the_range() {
        // Nursing opened in 2023 with zero students: every ratio against the
        // first year is undefined, the latest change is not.
        let mut map = IndexMap::new();
        map.insert(
            "Nursing Enrolled".to_string(),
            YearSeries::new("Nursing Enrolled", vec![(2022, 0.0), (2023, 0.0), (2024, 50.0)]),
        );
        map.insert(
            "Law Enrolled".to_string(),
            YearSeries::new("Law Enrolled", vec![(2022, 0.0), (2023, 40.0), (2024, 30.0)]),
        );
        let cats = vec![
            ("Nursing Enrolled".to_string(), "Nursing".to_string()),
            ("Law Enrolled".to_string(), "Law".to_string()),
        ];
        let metrics = [GrowthMetric::AverageYoy, GrowthMetric::LatestYearIncrease];
        let t = build_metric_table("dept", &map, &cats, &metrics).unwrap();
        let mut chart = ChartModel::build("dept", &t, GroupingAxis::ByCategory, &palette(2)).unwrap();

        let nursing = &chart.active().bars;
        assert_eq!(nursing[0].value, MetricValue::Undefined);
        assert_eq!(nursing[0].text, "N/A");
        assert_eq!(nursing[1].value, MetricValue::Undefined);
        assert_eq!(nursing[1].text, "N/A");
        assert_eq!(chart.axis_range(AxisPolicy::PerSeries), AxisRange::FALLBACK);

        chart.set_active(1).unwrap();
        let law = &chart.active().bars;
        assert_eq!(law[0].text, "N/A");
        assert_eq!(law[1].value, MetricValue::Value(-25.0));
        let r = chart.axis_range(AxisPolicy::PerSeries);
        assert_relative_eq!(r.min, -27.5, epsilon = 1e-12);
        assert_relative_eq!(r.max, -22.5, epsilon = 1e-12);
    }

    #[test]
    fn shared_policy_spans_every_series() {
        let chart = ChartModel::build("dept", &table(), GroupingAxis::ByCategory, &palette(2)).unwrap();
        let shared = chart.axis_range(AxisPolicy::Shared);
        let per_series = chart.axis_range(AxisPolicy::PerSeries);
        assert!(shared.min < -13.0);
        assert_eq!(per_series.min, 0.0);
    }

    proptest! {
        #[test]
        fn range_never_clips(values in prop::collection::vec(-1_000.0f64..1_000.0, 1..10)) {
            let r = AxisRange::for_values(values.iter().copied());
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if lo >= 0.0 {
                prop_assert_eq!(r.min, 0.0);
                prop_assert!(r.max >= hi);
            } else {
                prop_assert!(r.min < lo);
                prop_assert!(r.max > hi);
            }
        }
    }
}
