#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod handlers;
mod logger;
mod ui_components;
mod viewer;
mod views;
mod worker;

fn main() -> eframe::Result<()> {
    let logger = logger::AppLogger::new(500);
    if let Err(e) = logger.clone().init() {
        eprintln!("Failed to install logger: {e}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("testoloji-worker")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Testoloji"),
        ..Default::default()
    };

    eframe::run_native(
        "Testoloji",
        options,
        Box::new(move |cc| Ok(Box::new(app::TestolojiApp::new(cc, handle, logger)))),
    )
}
