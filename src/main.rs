mod app;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::SstViewerApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

use sst_trends::config::{Cli, PipelineConfig};
use sst_trends::pipeline;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from(Cli::parse());
    log::debug!("configuration: {config:?}");

    let analysis = pipeline::analyze(&config)
        .with_context(|| format!("analysing {}", config.input.display()))?;
    for line in analysis.summary.lines() {
        println!("{line}");
    }

    if !config.viewer && config.figures_dir.is_none() {
        return Ok(());
    }
    let figures = pipeline::render_figures(&analysis, &config).context("rendering figures")?;
    if !config.viewer {
        return Ok(());
    }

    let mut state = AppState::new(config);
    state.set_analysis(analysis, figures);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1500.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SST Trends – Figure Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(SstViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("figure viewer: {e}"))
}
