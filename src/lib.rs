//! circuit-canvas - animated circuit-board background for the portfolio site
//!
//! The simulation lives in [`core`] and runs anywhere; the eframe app and
//! browser glue are only built for WASM with the `wasm` feature:
//! - Circuit: jittered node grid, degree-capped edges, travelling signals
//! - Drift: wrapping particles joined by faint proximity lines

pub mod core;
#[cfg(any(not(target_arch = "wasm32"), feature = "wasm"))]
pub mod time;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod app;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod theme;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web;

/// Id of the canvas element the backdrop mounts on
pub const CANVAS_ID: &str = "particleCanvas";

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    use tracing::{error, info};

    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();

    let Some(canvas) = web::find_canvas(CANVAS_ID) else {
        info!(id = CANVAS_ID, "No backdrop canvas on this page");
        return;
    };
    let config = web::page_config();
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let observed = canvas.clone();
        let result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(app::BackdropApp::new(cc, config, &observed)))),
            )
            .await;

        if let Err(e) = result {
            error!(?e, "Failed to start eframe");
        }
    });
}
