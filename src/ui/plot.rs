use std::f32::consts::TAU;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, Painter, Pos2, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{ColorMap, value_color};
use crate::controller::ChartState;
use crate::data::aggregate::{ChartResult, Group, GroupTree, Point};
use crate::data::model::Metric;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Sales chart (central panel of the Sales page)
// ---------------------------------------------------------------------------

/// Render the controlled sales chart.
pub fn sales_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view sales  (File → Open…)");
        });
        return;
    }

    let Some(figure) = state.figure() else {
        return;
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(figure.title.as_deref().unwrap_or("Sales"));
        if !figure.chart.is_empty() {
            ui.label(format!("total {:.2}", figure.chart.total()));
        }
    });

    match &figure.chart {
        chart if chart.is_empty() => {
            ui.label(match state.controller.state() {
                ChartState::Idle => "Pick filters and press “Update Graph”.",
                ChartState::Reset => "Filters reset.",
                ChartState::ShowingFiltered => "No sales match these filters.",
            });
        }
        ChartResult::TimeSeries { points } => time_series_plot(ui, "sales_plot", points, Metric::Sales),
        ChartResult::Aggregate { groups } => group_bars(ui, "sales_plot", groups, &state.category_colors),
        ChartResult::Hierarchy { groups } => sunburst(ui, groups, &state.region_colors),
    }
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn format_day(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One bar per order line, x = order date.
fn time_series_plot(ui: &mut Ui, id: &str, points: &[Point], metric: Metric) {
    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::new(day_number(p.date), p.value)
                .width(4.0)
                .name(p.date.format("%Y-%m-%d").to_string())
        })
        .collect();

    Plot::new(id)
        .x_axis_label("Order Date")
        .y_axis_label(metric.column_name())
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(metric.column_name()).color(Color32::LIGHT_BLUE));
        });
}

/// Vertical bars, one per group, labelled on the x axis.
fn group_bars(ui: &mut Ui, id: &str, groups: &[Group], colors: &ColorMap) {
    let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.value)
                .width(0.7)
                .name(&g.label)
                .fill(colors.color_for(&g.label))
        })
        .collect();

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Pie / sunburst (painted directly; egui_plot has no radial charts)
// ---------------------------------------------------------------------------

/// Angular extent `(label, start, end)` in radians for each positive group.
/// Non-positive values cannot be drawn as wedges and are left out.
pub fn pie_slices<'a>(groups: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<(&'a str, f32, f32)> {
    let positive: Vec<(&str, f64)> = groups.into_iter().filter(|(_, v)| *v > 0.0).collect();
    let total: f64 = positive.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = 0.0f32;
    positive
        .into_iter()
        .map(|(label, v)| {
            let end = start + (v / total) as f32 * TAU;
            let slice = (label, start, end);
            start = end;
            slice
        })
        .collect()
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    // Angle 0 at twelve o'clock, clockwise.
    center + Vec2::new(angle.sin(), -angle.cos()) * radius
}

/// Paint a ring segment; `inner == 0` gives a pie wedge.
fn paint_wedge(painter: &Painter, center: Pos2, inner: f32, outer: f32, start: f32, end: f32, fill: Color32) {
    let step = TAU / 90.0;
    let n = ((end - start) / step).ceil().max(1.0) as usize;
    for i in 0..n {
        let a0 = start + (end - start) * i as f32 / n as f32;
        let a1 = start + (end - start) * (i + 1) as f32 / n as f32;
        let points = if inner <= 0.0 {
            vec![center, polar(center, outer, a0), polar(center, outer, a1)]
        } else {
            vec![
                polar(center, inner, a0),
                polar(center, outer, a0),
                polar(center, outer, a1),
                polar(center, inner, a1),
            ]
        };
        painter.add(Shape::convex_polygon(points, fill, Stroke::NONE));
    }
}

fn legend_row(ui: &mut Ui, color: Color32, label: &str, value: f64) {
    ui.horizontal(|ui: &mut Ui| {
        ui.colored_label(color, "■");
        ui.label(format!("{label}: {value:.0}"));
    });
}

/// Pie chart with a legend to its right.
pub fn pie(ui: &mut Ui, groups: &[Group], colors: &ColorMap) {
    let slices = pie_slices(groups.iter().map(|g| (g.label.as_str(), g.value)));
    ui.horizontal(|ui: &mut Ui| {
        let side = ui.available_height().clamp(160.0, 320.0);
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
        let center = response.rect.center();
        for (label, start, end) in &slices {
            paint_wedge(&painter, center, 0.0, side * 0.48, *start, *end, colors.color_for(label));
        }
        ui.vertical(|ui: &mut Ui| {
            for g in groups {
                legend_row(ui, colors.color_for(&g.label), &g.label, g.value);
            }
        });
    });
}

/// Smallest and largest child value, the range of the outer ring's colour scale.
pub fn child_value_range(groups: &[GroupTree]) -> Option<(f64, f64)> {
    groups
        .iter()
        .flat_map(|g| &g.children)
        .map(|c| c.value)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Two-ring sunburst: outer groups inside, their children outside. The
/// inner ring uses the group colours, the outer ring is shaded by value.
pub fn sunburst(ui: &mut Ui, groups: &[GroupTree], colors: &ColorMap) {
    let parents = pie_slices(groups.iter().map(|g| (g.label.as_str(), g.value)));
    let (lo, hi) = child_value_range(groups).unwrap_or((0.0, 0.0));
    ui.horizontal(|ui: &mut Ui| {
        let side = ui.available_height().clamp(200.0, 360.0);
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
        let center = response.rect.center();
        let r1 = side * 0.26;
        let r2 = side * 0.48;

        for (label, start, end) in &parents {
            let color = colors.color_for(label);
            paint_wedge(&painter, center, 0.0, r1, *start, *end, color);

            let Some(tree) = groups.iter().find(|g| g.label == *label) else {
                continue;
            };
            let span = end - start;
            let children_slices = pie_slices(tree.children.iter().map(|c| (c.label.as_str(), c.value)));
            for child in &tree.children {
                let Some(&(_, c0, c1)) = children_slices.iter().find(|(l, _, _)| *l == child.label) else {
                    continue;
                };
                let shade = value_color(child.value, lo, hi);
                let a0 = start + c0 / TAU * span;
                let a1 = start + c1 / TAU * span;
                paint_wedge(&painter, center, r1 + 2.0, r2, a0, a1, shade);
            }
        }

        egui::ScrollArea::vertical()
            .id_salt("sunburst_legend")
            .max_height(side)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    ui.colored_label(value_color(lo, lo, hi), "■");
                    ui.label(format!("{lo:.0}"));
                    ui.colored_label(value_color((lo + hi) / 2.0, lo, hi), "■");
                    ui.colored_label(value_color(hi, lo, hi), "■");
                    ui.label(format!("{hi:.0}"));
                });
                for g in groups {
                    legend_row(ui, colors.color_for(&g.label), &g.label, g.value);
                    ui.indent(&g.label, |ui: &mut Ui| {
                        for c in &g.children {
                            legend_row(ui, value_color(c.value, lo, hi), &c.label, c.value);
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Overview page
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, state: &AppState) {
    let Some(charts) = &state.overview else {
        ui.label("No dataset loaded.");
        return;
    };

    egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.heading("Profit by Region and City");
        if let ChartResult::Hierarchy { groups } = &charts.sunburst {
            sunburst(ui, groups, &state.region_colors);
        }
        ui.separator();

        ui.heading("Sales by Category");
        if let ChartResult::Aggregate { groups } = &charts.by_category {
            ui.allocate_ui(Vec2::new(ui.available_width(), 300.0), |ui: &mut Ui| {
                group_bars(ui, "category_bars", groups, &state.category_colors);
            });
        }
        ui.separator();

        ui.heading("Sales by Region");
        if let ChartResult::Aggregate { groups } = &charts.by_region {
            pie(ui, groups, &state.region_colors);
        }
    });
}
