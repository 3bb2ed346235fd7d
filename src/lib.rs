//! Fullscreen image viewer for chat message images.
//!
//! This crate is compiled to WebAssembly and runs in the browser. Clicking an
//! image inside a message container opens it in a fullscreen overlay where it
//! can be zoomed with the wheel (anchored at the cursor) and dragged once
//! zoomed in. Escape or a background click fades the overlay out.
//!
//! The gesture math and the overlay lifecycle are DOM-free and tested
//! natively; [`host`] is the thin layer that binds them to the page.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`overlay`] | Lifecycle state machine and the testable [`overlay::OverlayCore`] |
//! | [`transform`] | Points, rects and the pan/zoom [`transform::TransformState`] |
//! | [`zoom`] | Cursor-anchored wheel zoom |
//! | [`pan`] | Drag-to-pan, gated on being zoomed in |
//! | [`attach`] | Image discovery, binding registry, rescan decisions |
//! | [`input`] | Key and cursor value types |
//! | [`host`] | DOM glue: overlay nodes, listeners, timers, mutation observer |
//! | [`config`] | JSON configuration and validation |
//! | [`error`] | Setup error types |
//! | [`consts`] | Default limits, timings, selectors and class names |

pub mod attach;
pub mod config;
pub mod consts;
pub mod error;
pub mod host;
pub mod input;
pub mod overlay;
pub mod pan;
pub mod transform;
pub mod zoom;

use wasm_bindgen::prelude::*;

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::host::Viewer;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Install the viewer on the current page.
///
/// `config_json` is an optional JSON object overriding the defaults (see
/// [`config`]). Returns a handle whose `destroy()` removes everything again.
///
/// # Errors
///
/// Rejects invalid config, or a page without a usable document body.
#[wasm_bindgen]
pub fn install(config_json: Option<String>) -> Result<Viewer, JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => ViewerConfig::from_json(json).map_err(ViewerError::from)?,
        None => ViewerConfig::default(),
    };
    init_logging(&config)?;
    Ok(Viewer::install(&config)?)
}

fn init_logging(config: &ViewerConfig) -> Result<(), ViewerError> {
    let level = config.level()?;
    if let Err(err) = console_log::init_with_level(level) {
        // A previous install already set the logger; keep it.
        log::debug!("console logger already set: {err}");
    }
    log::set_max_level(level.to_level_filter());
    Ok(())
}
