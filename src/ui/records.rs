use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader::REQUIRED_COLUMNS;
use crate::state::AppState;

/// Table of the records passing the current selection.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    if state.visible_indices.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    let sales: f64 = state.visible_indices.iter().map(|&i| dataset.records[i].sales).sum();
    let profit: f64 = state.visible_indices.iter().map(|&i| dataset.records[i].profit).sum();
    ui.label(format!(
        "{} records · sales {sales:.2} · profit {profit:.2}",
        state.visible_indices.len()
    ));
    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(80.0), 4)
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for name in REQUIRED_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let rec = &dataset.records[state.visible_indices[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(rec.order_date.format("%Y-%m-%d").to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.region);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.city);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.category);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", rec.sales));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", rec.profit));
                });
            });
        });
}
