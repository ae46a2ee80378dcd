use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::UpdateMode;
use crate::controller::{RESET_BUTTON, Trigger, UPDATE_BUTTON};
use crate::pages::Page;
use crate::state::AppState;

/// Control ids of the side-panel widgets.
pub const CATEGORY_DROPDOWN: &str = "product-dropdown";
pub const REGION_DROPDOWN: &str = "Region-dropdown";
pub const YEAR_SLIDER: &str = "year-slider";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category (never cleared) ----
            ui.strong("Select Product:");
            let current = state.selection.category.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt(CATEGORY_DROPDOWN)
                .selected_text(&current)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for cat in &dataset.categories {
                        if ui.selectable_label(current == *cat, cat).clicked() && current != *cat {
                            state.selection.category = Some(cat.clone());
                            state.control_changed(CATEGORY_DROPDOWN);
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- Region (clearable) ----
            ui.strong("Select Region:");
            let current = state.selection.region.clone();
            ui.horizontal(|ui: &mut Ui| {
                egui::ComboBox::from_id_salt(REGION_DROPDOWN)
                    .selected_text(current.as_deref().unwrap_or("All regions"))
                    .show_ui(ui, |ui: &mut Ui| {
                        for region in &dataset.regions {
                            let selected = current.as_deref() == Some(region.as_str());
                            if ui.selectable_label(selected, region).clicked() && !selected {
                                state.selection.region = Some(region.clone());
                                state.control_changed(REGION_DROPDOWN);
                            }
                        }
                    });
                if current.is_some() && ui.small_button("✖").on_hover_text("Clear region").clicked() {
                    state.selection.region = None;
                    state.control_changed(REGION_DROPDOWN);
                }
            });
            ui.add_space(8.0);

            // ---- Year range ----
            ui.strong("Select Year Range:");
            if let Some(bounds) = dataset.year_bounds {
                let range = &mut state.selection.year_range;
                let mut changed = false;
                changed |= ui
                    .add(egui::Slider::new(&mut range.min, bounds.min..=bounds.max).text("from"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut range.max, bounds.min..=bounds.max).text("to"))
                    .changed();
                if range.min > range.max {
                    std::mem::swap(&mut range.min, &mut range.max);
                }
                if changed {
                    state.control_changed(YEAR_SLIDER);
                }
            }
            ui.add_space(12.0);

            // ---- Update / reset ----
            if state.update_mode == UpdateMode::OnDemand {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.button("Update Graph").clicked() {
                        state.fire(Trigger::from_control_id(UPDATE_BUTTON));
                    }
                    if ui.button("Reset Filters").clicked() {
                        state.fire(Trigger::from_control_id(RESET_BUTTON));
                    }
                });
            } else {
                ui.weak("Live mode: the chart follows the controls.");
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar and the page navigation.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load sample").clicked() {
                load_sample(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.figure().is_some(), egui::Button::new("Export chart…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for page in Page::ALL {
            ui.selectable_value(&mut state.page, page, page.title())
                .on_hover_text(page.description());
        }

        ui.separator();

        let mut live = state.update_mode == UpdateMode::Live;
        if ui.checkbox(&mut live, "Live update").changed() {
            state.update_mode = if live { UpdateMode::Live } else { UpdateMode::OnDemand };
            log::debug!("Update mode: {:?}", state.update_mode);
            if live {
                state.fire(Trigger::Update);
            }
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} match",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Welcome page
// ---------------------------------------------------------------------------

pub fn welcome(ui: &mut Ui, state: &AppState) {
    ui.heading("Supermart Grocery Sales Dashboard");
    ui.label("Explore grocery sales by product category, region and year.");
    ui.add_space(8.0);

    ui.strong("Data overview");
    for line in [
        "Sales: total sales across different regions",
        "Profit: profit for different items",
        "Region: sales categorised by region",
        "Category: product categories",
        "Order Date: when each order was placed",
    ] {
        ui.label(format!("• {line}"));
    }
    ui.add_space(8.0);

    if let Some(ds) = &state.dataset {
        let years = ds
            .year_bounds
            .map(|r| r.to_string())
            .unwrap_or_else(|| "none".to_string());
        ui.label(format!(
            "{} records, {} categories, {} regions, years {years}.",
            ds.len(),
            ds.categories.len(),
            ds.regions.len()
        ));
    }
    ui.add_space(8.0);

    ui.strong("Pages");
    for page in Page::ALL {
        ui.label(format!("{}: {}", page.title(), page.description()));
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn load_sample(state: &mut AppState) {
    match crate::data::sample::sample_dataset() {
        Ok(dataset) => state.set_dataset(dataset),
        Err(e) => {
            log::error!("Failed to load sample: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .add_filter("JSON", &["json"])
        .set_file_name("sales_chart.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_figure(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
