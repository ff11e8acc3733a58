mod app;
mod chart;
mod color;
mod config;
mod dashboard;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use app::NetUseApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Optional first argument: JSON config file.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DashboardConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    log::info!(
        "loading {} source(s) from {} for {}",
        config::Source::ALL.len(),
        config.base,
        config.latest_year
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Internet Usage Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(NetUseApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("running UI: {e}"))
}
