mod app;
mod color;
mod state;
mod ui;

use anyhow::{Context, Result, anyhow};
use app::BikeDashboardApp;
use bikeshare_dashboard::{Args, DashboardConfig};
use clap::Parser;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = DashboardConfig::from_args(&args).context("reading configuration")?;
    log::debug!("Configuration: {config:?}");

    // The dataset is loaded once here and only read afterwards.
    let mut state = AppState::new(config, args.start, args.end);
    let data_path = state.config.data_path.clone();
    state.open_path(&data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(BikeDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
