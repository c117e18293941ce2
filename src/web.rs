//! Browser glue: canvas lookup, page-provided config and the viewport
//! visibility signal for the canvas.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry};

use crate::core::BackdropConfig;

/// Window property holding the config, either a JSON string or a plain object
const CONFIG_PROPERTY: &str = "__backdrop_config";

/// Canvas element by id. Pages without it simply don't get the backdrop.
pub fn find_canvas(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

/// Config from `window.__backdrop_config`, or defaults when absent or invalid
pub fn page_config() -> BackdropConfig {
    let Some(window) = web_sys::window() else {
        return BackdropConfig::default();
    };

    let value = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_PROPERTY)) {
        Ok(v) if !v.is_undefined() && !v.is_null() => v,
        _ => return BackdropConfig::default(),
    };

    let json = match value.as_string() {
        Some(s) => s,
        None => match js_sys::JSON::stringify(&value) {
            Ok(s) => String::from(s),
            Err(e) => {
                warn!(?e, "Backdrop config is not serializable, using defaults");
                return BackdropConfig::default();
            }
        },
    };

    match BackdropConfig::from_json(&json) {
        Ok(config) => {
            debug!(?config, "Loaded backdrop config from page");
            config
        }
        Err(e) => {
            warn!(error = %e, "Invalid backdrop config, using defaults");
            BackdropConfig::default()
        }
    }
}

/// Tracks whether the canvas intersects the viewport.
///
/// The observer callback only flips a flag and wakes egui; the app reads the
/// flag at the start of its next update.
pub struct VisibilityObserver {
    observer: IntersectionObserver,
    visible: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl VisibilityObserver {
    pub fn observe(canvas: &HtmlCanvasElement, ctx: egui::Context) -> Result<Self, JsValue> {
        let visible = Rc::new(Cell::new(true));

        let visible_clone = visible.clone();
        let onchange = move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let intersecting = entry.is_intersecting();
                if intersecting != visible_clone.get() {
                    info!(visible = intersecting, "Canvas visibility changed");
                }
                visible_clone.set(intersecting);
            }
            // Wake egui so a resumed loop gets its first frame
            ctx.request_repaint();
        };
        let callback = Closure::wrap(
            Box::new(onchange) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>
        );

        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(canvas);

        Ok(Self {
            observer,
            visible,
            _callback: callback,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
