#![warn(clippy::all, rust_2018_idioms)]

use collage_canvas::{CollageApp, EditorConfig};

const DEFAULT_CONFIG_PATH: &str = "collage_canvas.json";

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let config = EditorConfig::load_or_default(config_path);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Collage Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(CollageApp::new(cc, config)))),
    )
}
