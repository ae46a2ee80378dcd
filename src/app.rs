use eframe::egui;

use crate::config::AppConfig;
use crate::pages::Page;
use crate::state::AppState;
use crate::ui::{panels, plot, records};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SupermartApp {
    pub state: AppState,
}

impl SupermartApp {
    /// Build the app and load the configured file, or the bundled sample.
    pub fn new(config: &AppConfig) -> Self {
        let mut state = AppState::new(config);
        match &config.data_path {
            Some(path) => state.load_path(path),
            None => panels::load_sample(&mut state),
        }
        Self { state }
    }
}

impl eframe::App for SupermartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + navigation ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        if self.state.page.uses_filters() {
            egui::SidePanel::left("filter_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // Controls fired this frame are handled before the page is drawn.
        self.state.process_triggers();

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.page {
            Page::Welcome => panels::welcome(ui, &self.state),
            Page::Sales => plot::sales_plot(ui, &self.state),
            Page::Overview => plot::overview(ui, &self.state),
            Page::Records => records::records_table(ui, &self.state),
        });
    }
}
