mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use app::HospDashApp;
use config::{DashboardConfig, CONFIG_FILE};
use data::loader::{HttpFetcher, Loader};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let fetcher = HttpFetcher::new(config.http_timeout()).context("building HTTP client")?;
    let loader = Loader::new(
        config.data_url.clone(),
        config.local_path.clone(),
        config.cache_ttl(),
        Box::new(fetcher),
    );

    let mut state = AppState::new(config, loader);
    state.load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        app::TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(HospDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}
