use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::config::{AppConfig, UpdateMode};
use crate::controller::{Figure, SalesChart, Trigger, UpdateController};
use crate::data::aggregate::{ChartResult, ChartShape};
use crate::data::filter::{FilterSelection, filter_and_aggregate, filtered_indices};
use crate::data::model::{Dimension, Metric, SalesDataset};
use crate::pages::Page;

/// The controlled sales chart: raw order lines, date against sales.
pub const SALES_SHAPE: ChartShape = ChartShape::TimeSeries { metric: Metric::Sales };

// ---------------------------------------------------------------------------
// Overview charts
// ---------------------------------------------------------------------------

/// Static charts over the whole dataset, computed once per load.
#[derive(Debug, Clone)]
pub struct OverviewCharts {
    /// Region → City, profit.
    pub sunburst: ChartResult,
    /// Sales per category.
    pub by_category: ChartResult,
    /// Sales per region.
    pub by_region: ChartResult,
}

impl OverviewCharts {
    pub fn compute(dataset: &SalesDataset) -> Self {
        let all = FilterSelection::everything(dataset);
        OverviewCharts {
            sunburst: filter_and_aggregate(
                dataset,
                &all,
                &ChartShape::Hierarchy {
                    outer: Dimension::Region,
                    inner: Dimension::City,
                    metric: Metric::Profit,
                },
            ),
            by_category: filter_and_aggregate(
                dataset,
                &all,
                &ChartShape::GroupSum {
                    dimension: Dimension::Category,
                    metric: Metric::Sales,
                },
            ),
            by_region: filter_and_aggregate(
                dataset,
                &all,
                &ChartShape::GroupSum {
                    dimension: Dimension::Region,
                    metric: Metric::Sales,
                },
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file or the sample is loaded).
    pub dataset: Option<Arc<SalesDataset>>,

    /// Current control values.
    pub selection: FilterSelection,

    /// State machine behind the sales chart.
    pub controller: UpdateController,

    /// Triggers fired since the last frame.
    pub pending: Vec<Trigger>,

    /// Indices of records passing the current selection (Records page).
    pub visible_indices: Vec<usize>,

    pub overview: Option<OverviewCharts>,

    pub region_colors: ColorMap,
    pub category_colors: ColorMap,

    pub update_mode: UpdateMode,
    pub page: Page,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::everything(&SalesDataset::default()),
            controller: UpdateController::default(),
            pending: Vec::new(),
            visible_indices: Vec::new(),
            overview: None,
            region_colors: ColorMap::default(),
            category_colors: ColorMap::default(),
            update_mode: UpdateMode::default(),
            page: Page::default(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            update_mode: config.update_mode,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset: reset controls, charts and colours.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.selection = FilterSelection::initial(&dataset);
        self.overview = Some(OverviewCharts::compute(&dataset));
        self.region_colors = ColorMap::new(&dataset.regions);
        self.category_colors = ColorMap::new(&dataset.categories);
        self.dataset = Some(Arc::new(dataset));
        self.controller = UpdateController::default();
        self.status_message = None;

        self.pending.clear();
        self.pending.push(match self.update_mode {
            UpdateMode::Live => Trigger::Update,
            UpdateMode::OnDemand => Trigger::Initial,
        });
        self.process_triggers();
    }

    /// Load `path` and make it the current dataset. On failure the previous
    /// dataset stays and the error is shown in the top bar.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Queue a trigger for the next [`AppState::process_triggers`].
    pub fn fire(&mut self, trigger: Trigger) {
        self.pending.push(trigger);
    }

    /// A dropdown or slider changed. Live mode turns this into an update;
    /// otherwise the chart ignores it until a button fires.
    pub fn control_changed(&mut self, control_id: &str) {
        let trigger = match self.update_mode {
            UpdateMode::Live => Trigger::Update,
            UpdateMode::OnDemand => Trigger::from_control_id(control_id),
        };
        self.fire(trigger);
    }

    /// Resolve this frame's triggers and run the sales chart controller once.
    pub fn process_triggers(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let fired = std::mem::take(&mut self.pending);
        let trigger = Trigger::resolve(&fired);

        let Some(dataset) = self.dataset.clone() else {
            return;
        };
        if trigger == Trigger::Reset && self.update_mode == UpdateMode::OnDemand {
            self.selection = FilterSelection::initial(&dataset);
        }

        let source = SalesChart::new(&dataset, SALES_SHAPE);
        self.controller.dispatch(&source, &trigger, &self.selection);
        self.refilter();
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.selection);
        }
    }

    /// The sales figure currently on screen.
    pub fn figure(&self) -> Option<&Figure> {
        self.controller.figure()
    }

    /// Write the current sales figure as pretty JSON.
    pub fn export_figure(&self, path: &Path) -> Result<()> {
        let figure = self.figure().context("no chart to export")?;
        let json = serde_json::to_string_pretty(figure).context("serialising chart")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported chart to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ChartState, RESET_BUTTON, UPDATE_BUTTON};
    use crate::data::model::{YearRange, record};

    fn dataset() -> SalesDataset {
        SalesDataset::from_records(vec![
            record((2017, 6, 1), "East", "Snacks", 100.0),
            record((2019, 6, 1), "West", "Snacks", 200.0),
            record((2018, 2, 2), "West", "Bakery", 70.0),
        ])
    }

    fn state(mode: UpdateMode) -> AppState {
        let mut st = AppState::new(&AppConfig {
            data_path: None,
            update_mode: mode,
        });
        st.set_dataset(dataset());
        st
    }

    #[test]
    fn on_demand_load_starts_idle() {
        let st = state(UpdateMode::OnDemand);
        assert_eq!(st.controller.state(), ChartState::Idle);
        assert!(st.figure().unwrap().chart.is_empty());
        assert_eq!(st.selection.category.as_deref(), Some("Snacks"));
        assert_eq!(st.visible_indices, vec![0, 1]);
    }

    #[test]
    fn live_load_shows_first_category() {
        let st = state(UpdateMode::Live);
        assert_eq!(st.controller.state(), ChartState::ShowingFiltered);
        assert_eq!(st.figure().unwrap().chart.total(), 300.0);
    }

    #[test]
    fn on_demand_controls_wait_for_the_button() {
        let mut st = state(UpdateMode::OnDemand);
        st.selection.year_range = YearRange::new(2015, 2018);
        st.control_changed("year-slider");
        st.process_triggers();
        assert_eq!(st.controller.state(), ChartState::Idle);
        assert_eq!(st.visible_indices, vec![0]);

        st.fire(Trigger::from_control_id(UPDATE_BUTTON));
        st.process_triggers();
        let fig = st.figure().unwrap();
        assert_eq!(fig.title.as_deref(), Some("Sales of Product Snacks"));
        assert_eq!(fig.chart.total(), 100.0);
    }

    #[test]
    fn live_controls_update_immediately() {
        let mut st = state(UpdateMode::Live);
        st.selection.region = Some("West".into());
        st.control_changed("Region-dropdown");
        st.process_triggers();
        assert_eq!(st.figure().unwrap().chart.total(), 200.0);
    }

    #[test]
    fn reset_clears_chart_and_restores_controls() {
        let mut st = state(UpdateMode::OnDemand);
        st.selection.category = Some("Bakery".into());
        st.fire(Trigger::Update);
        st.process_triggers();
        assert_eq!(st.figure().unwrap().chart.total(), 70.0);

        st.fire(Trigger::from_control_id(RESET_BUTTON));
        st.process_triggers();
        assert_eq!(st.controller.state(), ChartState::Reset);
        assert!(st.figure().unwrap().chart.is_empty());
        assert_eq!(st.selection, FilterSelection::initial(&dataset()));
    }

    #[test]
    fn overview_covers_whole_dataset() {
        let st = state(UpdateMode::OnDemand);
        let overview = st.overview.as_ref().unwrap();
        assert_eq!(overview.by_category.total(), 370.0);
        assert_eq!(overview.by_region.total(), 370.0);
        assert!((overview.sunburst.total() - 37.0).abs() < 1e-9);
    }

    #[test]
    fn bad_file_keeps_previous_dataset() {
        let mut st = state(UpdateMode::OnDemand);
        st.load_path(Path::new("/definitely/not/here.csv"));
        assert!(st.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(st.dataset.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn export_writes_tagged_json() {
        let mut st = state(UpdateMode::OnDemand);
        st.fire(Trigger::Update);
        st.process_triggers();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        st.export_figure(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["chart"]["kind"], "timeseries");
        assert_eq!(value["chart"]["points"].as_array().unwrap().len(), 2);
    }
}
