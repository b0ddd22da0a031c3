// GUI-subsystem binary: no console window is ever allocated by Windows.
#![windows_subsystem = "windows"]

use eframe::egui;
use pixelfe::app::{self, PixelFEApp};
use pixelfe::logger;

fn main() -> Result<(), eframe::Error> {
    // Session log (overwrites the previous session's file)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(app::window_size())
            .with_resizable(false)
            .with_title("PixelFE"),
        ..Default::default()
    };

    eframe::run_native(
        "PixelFE",
        options,
        Box::new(|cc| Box::new(PixelFEApp::new(cc))),
    )
}
