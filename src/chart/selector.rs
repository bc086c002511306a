//! Selector menu and the per-report selection state machine.
//!
//! States are the groups of a `ChartModel`; any group can be selected from any
//! other, the first group is the initial state and there is no terminal state.
//! A selection swaps the active series, recomputes the axis range, and updates
//! the title in one `&mut self` call, so hosts never observe a partial update.

use tracing::debug;

use crate::chart::model::{AxisRange, ChartModel, ChartSeries};
use crate::chart::spec::{ReportSpec, render_title};
use crate::domain::AxisPolicy;
use crate::error::ReportResult;
use crate::report::metrics::MetricTable;

/// One menu entry: selecting it activates `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEntry {
    pub label: String,
    pub target: usize,
}

/// Result of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Everything a host needs to draw one report tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    name: String,
    title: String,
    axis_range: AxisRange,
    axis_policy: AxisPolicy,
    chart: ChartModel,
    selectors: Vec<SelectorEntry>,
    title_template: String,
    table: MetricTable,
}

impl ReportView {
    pub fn new(spec: &ReportSpec, table: MetricTable, chart: ChartModel) -> Self {
        let selectors = chart
            .series()
            .iter()
            .enumerate()
            .map(|(target, s)| SelectorEntry {
                label: s.label.clone(),
                target,
            })
            .collect();

        let mut view = Self {
            name: spec.name.clone(),
            title: String::new(),
            axis_range: AxisRange::FALLBACK,
            axis_policy: spec.axis_policy,
            chart,
            selectors,
            title_template: spec.title_template.clone(),
            table,
        };
        view.refresh();
        view
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn axis_range(&self) -> AxisRange {
        self.axis_range
    }

    pub fn chart(&self) -> &ChartModel {
        &self.chart
    }

    pub fn active_series(&self) -> &ChartSeries {
        self.chart.active()
    }

    pub fn active_index(&self) -> usize {
        self.chart.active_index()
    }

    pub fn selectors(&self) -> &[SelectorEntry] {
        &self.selectors
    }

    pub fn table(&self) -> &MetricTable {
        &self.table
    }

    pub fn axis_policy(&self) -> AxisPolicy {
        self.axis_policy
    }

    /// Switch the y-range policy in place; selection and title are kept.
    pub fn set_axis_policy(&mut self, policy: AxisPolicy) {
        self.axis_policy = policy;
        self.refresh();
    }

    /// Activate group `index`. Re-selecting the active group is a no-op.
    pub fn select(&mut self, index: usize) -> ReportResult<Transition> {
        let from = self.chart.active_index();
        self.chart.set_active(index)?;
        self.refresh();
        debug!(
            report = self.name.as_str(),
            from,
            to = index,
            title = self.title.as_str(),
            "selection applied"
        );
        Ok(Transition { from, to: index })
    }

    /// Activate the entry labelled `label`, if there is one.
    pub fn select_label(&mut self, label: &str) -> Option<ReportResult<Transition>> {
        let target = self.selectors.iter().find(|e| e.label == label)?.target;
        Some(self.select(target))
    }

    /// Activate an entry from the menu.
    pub fn apply(&mut self, entry: &SelectorEntry) -> ReportResult<Transition> {
        self.select(entry.target)
    }

    fn refresh(&mut self) {
        self.axis_range = self.chart.axis_range(self.axis_policy);
        self.title = render_title(&self.title_template, &self.chart.active().label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    use crate::domain::{GrowthMetric, YearSeries};
    use crate::error::ReportError;
    use crate::report::metrics::build_metric_table;

    fn view() -> ReportView {
        let spec = ReportSpec::department("Enrolled");
        let mut map = IndexMap::new();
        let mut cats = Vec::new();
        for (name, last) in [("Arts", 106.0), ("Science", 87.0), ("Business", 107.0)] {
            let key = format!("{name} Enrolled");
            map.insert(key.clone(), YearSeries::new(key.clone(), vec![(2023, 100.0), (2024, last)]));
            cats.push((key, name.to_string()));
        }
        let table = build_metric_table(&spec.name, &map, &cats, &spec.metrics).unwrap();
        let chart = ChartModel::build(&spec.name, &table, spec.grouping, &spec.palette).unwrap();
        ReportView::new(&spec, table, chart)
    }

    #[test]
    fn starts_on_first_group() {
        let v = view();
        assert_eq!(v.active_index(), 0);
        assert_eq!(v.title(), "Arts: Enrollment % Changes");
        assert_eq!(v.axis_range().min, 0.0);
        let labels: Vec<_> = v.selectors().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Arts", "Science", "Business"]);
    }

    #[test]
    fn selecting_recomputes_range_and_title() {
        let mut v = view();
        let t = v.select(1).unwrap();
        assert_eq!(t, Transition { from: 0, to: 1 });
        assert!(t.changed());
        assert_eq!(v.title(), "Science: Enrollment % Changes");
        assert!(v.axis_range().min < -13.0);
        assert_eq!(v.chart().visibility(), vec![false, true, false]);
    }

    #[test]
    fn reselecting_is_idempotent() {
        let mut once = view();
        once.select(2).unwrap();
        let mut twice = once.clone();
        let t = twice.select(2).unwrap();
        assert!(!t.changed());
        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_range_selection_keeps_state() {
        let mut v = view();
        let before = v.clone();
        let err = v.select(7).unwrap_err();
        assert_eq!(err, ReportError::UnknownSelection { index: 7, groups: 3 });
        assert_eq!(v, before);
    }

    #[test]
    fn select_by_label_and_entry() {
        let mut v = view();
        assert!(v.select_label("Nursing").is_none());
        v.select_label("Business").unwrap().unwrap();
        assert_eq!(v.active_series().label, "Business");
        let entry = v.selectors()[0].clone();
        v.apply(&entry).unwrap();
        assert_eq!(v.active_index(), 0);
        assert_eq!(v.table().metrics(), &[GrowthMetric::AverageYoy, GrowthMetric::LatestYearIncrease]);
    }

    #[test]
    fn axis_policy_switch_keeps_selection() {
        let mut v = view();
        v.select(2).unwrap();
        let per_series = v.axis_range();
        assert_eq!(per_series.min, 0.0);

        v.set_axis_policy(AxisPolicy::Shared);
        assert_eq!(v.axis_policy(), AxisPolicy::Shared);
        assert_eq!(v.active_index(), 2);
        assert_eq!(v.title(), "Business: Enrollment % Changes");
        assert!(v.axis_range().min < -13.0);

        v.set_axis_policy(AxisPolicy::PerSeries);
        assert_eq!(v.axis_range(), per_series);
    }

    proptest! {
        #[test]
        fn exactly_one_active_after_any_sequence(picks in prop::collection::vec(0usize..5, 0..20)) {
            let mut v = view();
            for p in picks {
                let _ = v.select(p);
                let active = v.chart().visibility().into_iter().filter(|&b| b).count();
                prop_assert_eq!(active, 1);
            }
        }
    }
}
