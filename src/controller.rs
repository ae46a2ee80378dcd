use serde::{Deserialize, Serialize};

use crate::data::aggregate::{ChartResult, ChartShape};
use crate::data::filter::{FilterSelection, filter_and_aggregate};
use crate::data::model::SalesDataset;

/// Control id of the button that recomputes the sales chart.
pub const UPDATE_BUTTON: &str = "update-button";
/// Control id of the button that clears the sales chart.
pub const RESET_BUTTON: &str = "reset-button";

// ---------------------------------------------------------------------------
// Trigger – which control fired
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Nothing has been touched yet (first frame after a load).
    Initial,
    Update,
    Reset,
    /// A control this chart does not listen to.
    Unknown(String),
}

impl Trigger {
    pub fn from_control_id(id: &str) -> Self {
        match id {
            UPDATE_BUTTON => Trigger::Update,
            RESET_BUTTON => Trigger::Reset,
            other => Trigger::Unknown(other.to_string()),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Trigger::Initial => 0,
            Trigger::Unknown(_) => 1,
            Trigger::Update => 2,
            Trigger::Reset => 3,
        }
    }

    /// Collapse triggers that fired in the same frame to the one that is
    /// honored: Reset > Update > Unknown > Initial. Nothing fired is `Initial`.
    pub fn resolve(fired: &[Trigger]) -> Trigger {
        fired
            .iter()
            .max_by_key(|t| t.precedence())
            .cloned()
            .unwrap_or(Trigger::Initial)
    }
}

// ---------------------------------------------------------------------------
// Figure / ChartSource
// ---------------------------------------------------------------------------

/// A chart result plus its title; what the plot code draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub chart: ChartResult,
}

/// Where a controlled chart gets its data from.
pub trait ChartSource {
    /// Recompute the figure for `selection`.
    fn compute(&self, selection: &FilterSelection) -> Figure;
    /// The figure shown before any update and after a reset.
    fn blank(&self) -> Figure;
}

/// The dataset-backed source: filter, then reduce to `shape`.
pub struct SalesChart<'a> {
    pub dataset: &'a SalesDataset,
    pub shape: ChartShape,
}

impl<'a> SalesChart<'a> {
    pub fn new(dataset: &'a SalesDataset, shape: ChartShape) -> Self {
        SalesChart { dataset, shape }
    }
}

impl ChartSource for SalesChart<'_> {
    fn compute(&self, selection: &FilterSelection) -> Figure {
        let title = match &selection.category {
            Some(category) => format!("Sales of Product {category}"),
            None => "Sales of all products".to_string(),
        };
        Figure {
            title: Some(title),
            chart: filter_and_aggregate(self.dataset, selection, &self.shape),
        }
    }

    fn blank(&self) -> Figure {
        Figure {
            title: None,
            chart: ChartResult::empty(&self.shape),
        }
    }
}

// ---------------------------------------------------------------------------
// UpdateController – per-chart state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartState {
    Idle,
    ShowingFiltered,
    Reset,
}

/// Decides, per trigger, whether a chart is recomputed, cleared or left alone.
#[derive(Debug, Clone)]
pub struct UpdateController {
    state: ChartState,
    figure: Option<Figure>,
}

impl Default for UpdateController {
    fn default() -> Self {
        Self {
            state: ChartState::Idle,
            figure: None,
        }
    }
}

impl UpdateController {
    pub fn state(&self) -> ChartState {
        self.state
    }

    /// The last emitted figure, if any trigger has been handled.
    pub fn figure(&self) -> Option<&Figure> {
        self.figure.as_ref()
    }

    /// Handle one trigger and return the figure to show.
    pub fn dispatch<S: ChartSource + ?Sized>(
        &mut self,
        source: &S,
        trigger: &Trigger,
        selection: &FilterSelection,
    ) -> &Figure {
        match trigger {
            Trigger::Update => {
                self.state = ChartState::ShowingFiltered;
                self.figure = Some(source.compute(selection));
            }
            Trigger::Reset => {
                self.state = ChartState::Reset;
                self.figure = Some(source.blank());
            }
            Trigger::Initial => {
                self.state = ChartState::Idle;
                self.figure = Some(source.blank());
            }
            Trigger::Unknown(id) => {
                log::debug!("Ignoring trigger from unknown control '{id}'");
            }
        }
        self.figure.get_or_insert_with(|| source.blank())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::aggregate::Group;
    use crate::data::model::{Dimension, Metric, YearRange, record};

    /// Counts how often the engine is asked to recompute.
    struct CountingSource {
        calls: Cell<usize>,
    }

    impl CountingSource {
        fn new() -> Self {
            CountingSource { calls: Cell::new(0) }
        }
    }

    impl ChartSource for CountingSource {
        fn compute(&self, _selection: &FilterSelection) -> Figure {
            self.calls.set(self.calls.get() + 1);
            Figure {
                title: Some("computed".into()),
                chart: ChartResult::Aggregate {
                    groups: vec![Group { label: "x".into(), value: 1.0 }],
                },
            }
        }

        fn blank(&self) -> Figure {
            Figure {
                title: None,
                chart: ChartResult::Aggregate { groups: Vec::new() },
            }
        }
    }

    fn selection() -> FilterSelection {
        FilterSelection {
            category: Some("Snacks".into()),
            region: None,
            year_range: YearRange::new(2015, 2018),
        }
    }

    #[test]
    fn starts_idle_with_blank_figure() {
        let source = CountingSource::new();
        let mut ctl = UpdateController::default();
        assert_eq!(ctl.state(), ChartState::Idle);
        assert!(ctl.figure().is_none());

        let fig = ctl.dispatch(&source, &Trigger::Initial, &selection()).clone();
        assert_eq!(fig, source.blank());
        assert_eq!(ctl.state(), ChartState::Idle);
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn update_recomputes_from_any_state() {
        let source = CountingSource::new();
        let mut ctl = UpdateController::default();
        for _ in 0..2 {
            ctl.dispatch(&source, &Trigger::Update, &selection());
            assert_eq!(ctl.state(), ChartState::ShowingFiltered);
        }
        ctl.dispatch(&source, &Trigger::Reset, &selection());
        let fig = ctl.dispatch(&source, &Trigger::Update, &selection());
        assert_eq!(fig.title.as_deref(), Some("computed"));
        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn reset_never_invokes_the_engine() {
        let source = CountingSource::new();
        let mut ctl = UpdateController::default();
        let other = FilterSelection {
            category: None,
            region: Some("East".into()),
            year_range: YearRange::single(1999),
        };
        for sel in [selection(), other] {
            let fig = ctl.dispatch(&source, &Trigger::Reset, &sel).clone();
            assert_eq!(fig, source.blank());
            assert_eq!(ctl.state(), ChartState::Reset);
        }
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn unknown_trigger_keeps_prior_figure() {
        let source = CountingSource::new();
        let mut ctl = UpdateController::default();

        let fig = ctl
            .dispatch(&source, &Trigger::from_control_id("year-slider"), &selection())
            .clone();
        assert_eq!(fig, source.blank());
        assert_eq!(ctl.state(), ChartState::Idle);

        let shown = ctl.dispatch(&source, &Trigger::Update, &selection()).clone();
        let after = ctl
            .dispatch(&source, &Trigger::Unknown("social-buttons".into()), &selection())
            .clone();
        assert_eq!(after, shown);
        assert_eq!(ctl.state(), ChartState::ShowingFiltered);
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn control_ids_map_to_triggers() {
        assert_eq!(Trigger::from_control_id("update-button"), Trigger::Update);
        assert_eq!(Trigger::from_control_id("reset-button"), Trigger::Reset);
        assert_eq!(
            Trigger::from_control_id("Region-dropdown"),
            Trigger::Unknown("Region-dropdown".into())
        );
    }

    #[test]
    fn simultaneous_triggers_resolve_by_precedence() {
        assert_eq!(Trigger::resolve(&[]), Trigger::Initial);
        assert_eq!(Trigger::resolve(&[Trigger::Update, Trigger::Reset]), Trigger::Reset);
        assert_eq!(Trigger::resolve(&[Trigger::Reset, Trigger::Update]), Trigger::Reset);
        assert_eq!(
            Trigger::resolve(&[Trigger::Unknown("a".into()), Trigger::Update]),
            Trigger::Update
        );

        let source = CountingSource::new();
        let mut ctl = UpdateController::default();
        let fired = [Trigger::Update, Trigger::Reset];
        ctl.dispatch(&source, &Trigger::resolve(&fired), &selection());
        assert_eq!(ctl.state(), ChartState::Reset);
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn sales_chart_filters_the_dataset() {
        let ds = SalesDataset::from_records(vec![
            record((2017, 6, 1), "East", "Snacks", 100.0),
            record((2019, 6, 1), "West", "Snacks", 200.0),
        ]);
        let source = SalesChart::new(
            &ds,
            ChartShape::GroupSum {
                dimension: Dimension::Category,
                metric: Metric::Sales,
            },
        );
        let mut ctl = UpdateController::default();
        let fig = ctl.dispatch(&source, &Trigger::Update, &selection());
        assert_eq!(fig.title.as_deref(), Some("Sales of Product Snacks"));
        assert_eq!(fig.chart.total(), 100.0);

        let fig = ctl.dispatch(&source, &Trigger::Reset, &selection());
        assert_eq!(fig.title, None);
        assert!(fig.chart.is_empty());
    }
}
