mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use app::PmiDashboardApp;
use config::Config;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::shared();

    // The dashboard cannot render anything without data, so a load failure
    // stops here.
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading PMI table from {}", config.data_path.display()))?;
    log::info!(
        "Loaded {} records covering {} places from {}",
        dataset.len(),
        dataset.placenames().len(),
        config.data_path.display()
    );
    if dataset.is_empty() {
        log::warn!("{} holds no records; every chart will be empty", config.data_path.display());
    }
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "PMI Scores Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(PmiDashboardApp::new(dataset, config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
