mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::FraudLensApp;
use config::DashboardConfig;
use eframe::egui;

/// `fraud-lens [--report] [PATH]`
fn main() -> Result<()> {
    env_logger::init();

    let mut report_only = false;
    let mut cli_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--report" => report_only = true,
            _ => cli_path = Some(PathBuf::from(arg)),
        }
    }

    let config = DashboardConfig::resolve(cli_path)?;
    log::info!("Predictions file: {}", config.predictions_path.display());

    if report_only {
        let table = data::loader::load_file(&config.predictions_path)
            .with_context(|| format!("loading {}", config.predictions_path.display()))?;
        print!("{}", report::render(&table)?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(FraudLensApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
