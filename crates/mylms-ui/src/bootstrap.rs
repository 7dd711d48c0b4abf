//! Bootstrap bindings for WASM.
//!
//! Only the two widgets that Bootstrap does not activate through its data
//! API are bound here. `getOrCreateInstance` returns the existing widget for
//! an element when there is one, so activating twice is harmless.

use mylms_core::WidgetKind;
use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "bootstrap", "Tooltip"], js_name = getOrCreateInstance, catch)]
    fn tooltip_get_or_create(element: &Element) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "bootstrap", "Popover"], js_name = getOrCreateInstance, catch)]
    fn popover_get_or_create(element: &Element) -> Result<JsValue, JsValue>;
}

/// Check if the Bootstrap bundle is loaded on the page.
pub fn is_bootstrap_available() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    js_sys::Reflect::get(&window, &JsValue::from_str("bootstrap"))
        .is_ok_and(|bootstrap| !bootstrap.is_undefined() && !bootstrap.is_null())
}

/// Attach a widget to an element, reusing an existing instance.
///
/// # Errors
///
/// Returns the message of the exception Bootstrap threw.
pub fn activate(kind: WidgetKind, element: &Element) -> Result<(), String> {
    let result = match kind {
        WidgetKind::Tooltip => tooltip_get_or_create(element),
        WidgetKind::Popover => popover_get_or_create(element),
    };
    result.map(|_| ()).map_err(|e| {
        e.as_string()
            .or_else(|| {
                e.dyn_ref::<js_sys::Error>()
                    .map(|err| String::from(err.message()))
            })
            .unwrap_or_else(|| format!("Failed to create {kind}"))
    })
}
