#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use clap::Parser;
use eframe::egui;
use egui_service_monitor::app::StatusBoard;
use egui_service_monitor::config::Config;
use egui_service_monitor::logging::init_logging;
use tr::tr_init;

fn main() -> eframe::Result {
    let config = Config::parse();
    if let Err(e) = config.validate() {
        e.exit();
    }
    init_logging();
    tr_init!("./locales");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&config.window_title)
            .with_inner_size([config.window_width, config.window_height])
            .with_resizable(true),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "egui_service_monitor",
        options,
        Box::new(move |cc| {
            let board = StatusBoard::new(cc, &config).map_err(|e| {
                tracing::error!(error = %e, "failed to start dashboard");
                Box::new(e) as Box<dyn std::error::Error + Send + Sync>
            })?;
            Ok(Box::new(board))
        }),
    )
}
