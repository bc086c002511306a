//! Growth metrics and the (category × metric) table.
//!
//! Metrics are small, pure functions over a `YearSeries`. A zero denominator
//! or a series that is too short yields `MetricValue::Undefined`; it never
//! fails the table as a whole.

use indexmap::IndexMap;
use tracing::warn;

use crate::domain::{GrowthMetric, MetricValue, YearSeries};
use crate::error::{ReportError, ReportResult};

/// Compute one metric (unrounded).
pub fn compute(metric: GrowthMetric, series: &YearSeries) -> MetricValue {
    if series.len() < 2 {
        return MetricValue::Undefined;
    }
    match metric {
        GrowthMetric::TotalIncrease => total_increase(series),
        GrowthMetric::AverageYoy => average_yoy(series),
        GrowthMetric::Cagr => cagr(series),
        GrowthMetric::LatestYearIncrease => latest_year_increase(series),
    }
}

/// `(last - first) / first * 100`.
pub fn total_increase(series: &YearSeries) -> MetricValue {
    match (series.first(), series.last()) {
        (Some((_, first)), Some((_, last))) => pct_change(first, last),
        _ => MetricValue::Undefined,
    }
}

/// Mean of the year-over-year percent changes across every adjacent pair.
pub fn average_yoy(series: &YearSeries) -> MetricValue {
    let mut sum = 0.0;
    let mut n = 0usize;
    for (prev, cur) in series.adjacent_pairs() {
        match pct_change(prev, cur) {
            MetricValue::Value(v) => sum += v,
            MetricValue::Undefined => return MetricValue::Undefined,
        }
        n += 1;
    }
    if n == 0 {
        return MetricValue::Undefined;
    }
    MetricValue::from_percent(sum / n as f64)
}

/// `((last / first)^(1 / span) - 1) * 100`, span in years.
pub fn cagr(series: &YearSeries) -> MetricValue {
    let span = series.year_span();
    let (Some((_, first)), Some((_, last))) = (series.first(), series.last()) else {
        return MetricValue::Undefined;
    };
    if span <= 0 || first == 0.0 {
        return MetricValue::Undefined;
    }
    MetricValue::from_percent(((last / first).powf(1.0 / f64::from(span)) - 1.0) * 100.0)
}

/// Year-over-year change of the final year only.
pub fn latest_year_increase(series: &YearSeries) -> MetricValue {
    match series.adjacent_pairs().last() {
        Some((prev, cur)) => pct_change(prev, cur),
        None => MetricValue::Undefined,
    }
}

fn pct_change(from: f64, to: f64) -> MetricValue {
    if from == 0.0 {
        return MetricValue::Undefined;
    }
    MetricValue::from_percent((to - from) / from * 100.0)
}

/// One table row: display label + one cell per metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: String,
    pub values: IndexMap<GrowthMetric, MetricValue>,
}

/// Category → metric → rounded percent. Row order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    metrics: Vec<GrowthMetric>,
    rows: IndexMap<String, MetricRow>,
    final_year: i32,
}

impl MetricTable {
    pub fn metrics(&self) -> &[GrowthMetric] {
        &self.metrics
    }

    /// Rows keyed by the full quantity name.
    pub fn rows(&self) -> &IndexMap<String, MetricRow> {
        &self.rows
    }

    pub fn row(&self, category: &str) -> Option<&MetricRow> {
        self.rows.get(category)
    }

    pub fn get(&self, category: &str, metric: GrowthMetric) -> Option<MetricValue> {
        self.rows.get(category)?.values.get(&metric).copied()
    }

    /// Last year observed across every series.
    pub fn final_year(&self) -> i32 {
        self.final_year
    }

    pub fn metric_label(&self, metric: GrowthMetric) -> String {
        metric.display_name(self.final_year)
    }
}

/// Build a metric table.
///
/// `categories` pairs each series key with its display label; the order given
/// is the row order. Every key must be present in `series`.
pub fn build_metric_table(
    report: &str,
    series: &IndexMap<String, YearSeries>,
    categories: &[(String, String)],
    metrics: &[GrowthMetric],
) -> ReportResult<MetricTable> {
    if categories.is_empty() {
        return Err(ReportError::NoCategories {
            report: report.to_string(),
        });
    }
    if metrics.is_empty() {
        return Err(ReportError::NoMetrics {
            report: report.to_string(),
        });
    }

    let mut rows = IndexMap::with_capacity(categories.len());
    let mut final_year = i32::MIN;
    for (key, label) in categories {
        let s = series.get(key).ok_or_else(|| ReportError::InvalidQuantity {
            quantity: key.clone(),
        })?;
        if let Some((year, _)) = s.last() {
            final_year = final_year.max(year);
        }

        let mut values = IndexMap::with_capacity(metrics.len());
        for &metric in metrics {
            let value = compute(metric, s).rounded();
            if !value.is_defined() {
                warn!(report, category = key.as_str(), ?metric, "metric undefined, rendering as N/A");
            }
            values.insert(metric, value);
        }
        rows.insert(
            key.clone(),
            MetricRow {
                label: label.clone(),
                values,
            },
        );
    }

    Ok(MetricTable {
        metrics: metrics.to_vec(),
        rows,
        final_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn series(points: &[(i32, f64)]) -> YearSeries {
        YearSeries::new("q", points.to_vec())
    }

    #[test]
    fn two_year_scenario_all_metrics_agree() {
        let s = series(&[(2023, 100.0), (2024, 140.0)]);
        assert_eq!(compute(GrowthMetric::TotalIncrease, &s).rounded(), MetricValue::Value(40.0));
        assert_eq!(compute(GrowthMetric::AverageYoy, &s).rounded(), MetricValue::Value(40.0));
        assert_eq!(compute(GrowthMetric::Cagr, &s).rounded(), MetricValue::Value(40.0));
        assert_eq!(
            compute(GrowthMetric::LatestYearIncrease, &s).rounded(),
            MetricValue::Value(40.0)
        );
    }

    #[test]
    fn science_decline_is_negative() {
        let s = series(&[(2023, 100.0), (2024, 87.0)]);
        assert_eq!(
            compute(GrowthMetric::LatestYearIncrease, &s).rounded(),
            MetricValue::Value(-13.0)
        );
    }

    #[test]
    fn average_yoy_is_mean_of_pairwise_changes() {
        let s = series(&[(2021, 100.0), (2022, 110.0), (2023, 99.0)]);
        // +10% then -10%
        let v = average_yoy(&s).value().unwrap();
        assert_relative_eq!(v, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn cagr_over_multiple_years() {
        let s = series(&[(2020, 100.0), (2021, 105.0), (2022, 121.0)]);
        let v = cagr(&s).value().unwrap();
        assert_relative_eq!(v, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_denominators_are_undefined() {
        let s = series(&[(2023, 0.0), (2024, 50.0)]);
        assert_eq!(total_increase(&s), MetricValue::Undefined);
        assert_eq!(average_yoy(&s), MetricValue::Undefined);
        assert_eq!(cagr(&s), MetricValue::Undefined);
        assert_eq!(latest_year_increase(&s), MetricValue::Undefined);

        // Only the final pair matters for the latest increase.
        let s = series(&[(2022, 0.0), (2023, 10.0), (2024, 12.0)]);
        assert_eq!(latest_year_increase(&s).rounded(), MetricValue::Value(20.0));
        assert_eq!(average_yoy(&s), MetricValue::Undefined);
    }

    #[test]
    fn single_point_is_undefined() {
        let s = series(&[(2024, 10.0)]);
        for metric in GrowthMetric::ALL {
            assert_eq!(compute(metric, &s), MetricValue::Undefined);
        }
    }

    #[test]
    fn table_keeps_order_and_marks_undefined_cells() {
        let mut map = IndexMap::new();
        map.insert("B".to_string(), series(&[(2023, 0.0), (2024, 5.0)]));
        map.insert("A".to_string(), series(&[(2023, 10.0), (2024, 11.0)]));
        let cats = vec![
            ("B".to_string(), "Bee".to_string()),
            ("A".to_string(), "Ay".to_string()),
        ];
        let table = build_metric_table(
            "t",
            &map,
            &cats,
            &[GrowthMetric::TotalIncrease, GrowthMetric::LatestYearIncrease],
        )
        .unwrap();

        let keys: Vec<_> = table.rows().keys().cloned().collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(table.get("B", GrowthMetric::TotalIncrease), Some(MetricValue::Undefined));
        assert_eq!(table.get("A", GrowthMetric::TotalIncrease), Some(MetricValue::Value(10.0)));
        assert_eq!(table.row("A").unwrap().label, "Ay");
        assert_eq!(table.final_year(), 2024);
        assert_eq!(table.metric_label(GrowthMetric::LatestYearIncrease), "2024 Increase");
    }

    #[test]
    fn empty_table_inputs_are_rejected() {
        let map = IndexMap::new();
        let err = build_metric_table("t", &map, &[], &[GrowthMetric::Cagr]).unwrap_err();
        assert!(matches!(err, ReportError::NoCategories { .. }));

        let cats = vec![("A".to_string(), "A".to_string())];
        let err = build_metric_table("t", &map, &cats, &[]).unwrap_err();
        assert!(matches!(err, ReportError::NoMetrics { .. }));
    }

    proptest! {
        #[test]
        fn total_increase_matches_formula(
            first in 1.0f64..10_000.0,
            mid in 0.0f64..10_000.0,
            last in 0.0f64..10_000.0,
        ) {
            let s = series(&[(2020, first), (2021, mid), (2022, last)]);
            let expected = MetricValue::Value((last - first) / first * 100.0).rounded();
            prop_assert_eq!(compute(GrowthMetric::TotalIncrease, &s).rounded(), expected);
        }

        #[test]
        fn average_yoy_matches_mean(values in prop::collection::vec(1.0f64..10_000.0, 2..8)) {
            let points: Vec<(i32, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| (2000 + i as i32, v))
                .collect();
            let s = series(&points);
            let changes: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]) / w[0] * 100.0).collect();
            let mean = changes.iter().sum::<f64>() / changes.len() as f64;
            let got = average_yoy(&s).value().unwrap();
            prop_assert!((got - mean).abs() <= 1e-9 * mean.abs().max(1.0));
        }

        #[test]
        fn cagr_undefined_for_zero_first(last in 0.0f64..10_000.0, years in 1i32..10) {
            let s = series(&[(2000, 0.0), (2000 + years, last)]);
            prop_assert_eq!(cagr(&s), MetricValue::Undefined);
        }
    }
}
