use eframe::egui;

mod app;
mod config;
mod download;
mod error;
mod localizations;
mod models;
mod options;
mod progress;
mod scratch;
mod theme;
mod thumbnail;
mod ui;

use app::TubegrabApp;
use config::AppConfig;
use localizations::Localizations;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    log::info!(
        "Scratch directory: {}, engine: {}",
        config.scratch_dir.display(),
        config.ytdlp_program.display()
    );
    if which::which(&config.ytdlp_program).is_err() {
        log::warn!("yt-dlp not found at {}; downloads will fail", config.ytdlp_program.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("YouTube Downloader"),
        ..Default::default()
    };

    let app = TubegrabApp::new(config, Localizations::new());

    eframe::run_native(
        "YouTube Downloader",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(app)
        }),
    )
}
