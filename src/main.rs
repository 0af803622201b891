#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

#[allow(unused_imports)]
use feed_glow::{
    AppSettings, // Runtime settings built from the CLI or the page
    Cli,         // The struct from lib.rs
    run_app,     // The function from lib.rs
};

// --- WASM SPECIFIC CODE ---
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast; // <--- REQUIRED for .dyn_into()
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// This keeps the WASM memory allocator from being stripped
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn _keep_alive() {}

// Even though we use 'start', the compiler still wants a main() function
// because this file is compiled as a binary.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    // A. Init Logging
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Feed Glow starting in WASM mode...");

    // B. Settings come from the page, not the command line
    let web_options = eframe::WebOptions::default();
    let settings = AppSettings::for_web();

    // C. Find the canvas element by ID
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("no document on the global window")?;
    let canvas = document
        .get_element_by_id("the_canvas_id")
        .ok_or("failed to find canvas with id 'the_canvas_id'")?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| "the_canvas_id was not a valid HtmlCanvasElement")?;

    // D. Start the App
    eframe::WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(|cc| Ok(run_app(cc, settings))),
        )
        .await
}

// --- NATIVE SPECIFIC CODE ---
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::anyhow;
    use clap::Parser;
    use eframe::NativeOptions;
    use feed_glow::ui::config::UI_TEXT;

    // A. Init Logging
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env() // RUST_LOG still wins
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    let settings = AppSettings::from_cli(&args);
    log::info!(
        "Polling {} every {}s",
        settings.feed_url,
        settings.poll_interval.as_secs()
    );

    // C. Run Native App
    eframe::run_native(
        UI_TEXT.window_title,
        NativeOptions::default(),
        Box::new(move |cc| Ok(run_app(cc, settings))),
    )
    .map_err(|e| anyhow!("eframe failed: {}", e))
}
