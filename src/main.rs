mod app;
mod callbacks;
mod color;
mod config;
mod data;
mod figure;
mod layout;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::LaunchDashApp;
use config::DashConfig;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashConfig::from_env();

    // The table must be complete before anything is served.
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;
    log::info!(
        "Loaded {} launches from {}, payload {}..={} kg, sites {:?}",
        dataset.len(),
        config.data_path.display(),
        dataset.min_payload(),
        dataset.max_payload(),
        dataset.sites().collect::<Vec<_>>()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        config::WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(dataset)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
