mod app;
mod color;
mod config;
mod controller;
mod data;
mod pages;
mod state;
mod ui;

use app::SupermartApp;
use clap::Parser;
use config::{AppConfig, Cli};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from(Cli::parse());
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Supermart – Sales Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SupermartApp::new(&config)))),
    )
}
