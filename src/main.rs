mod app;
mod color;
mod config;
mod data;
mod images;
mod state;
mod stats;
mod ui;
mod warehouse;

use app::HeritageExplorerApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    match dotenvy::dotenv() {
        Ok(path) => log::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring unreadable .env file: {e}"),
    }
    let config = AppConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Indian Cultural Heritage Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(HeritageExplorerApp::new(config)))),
    )
}
