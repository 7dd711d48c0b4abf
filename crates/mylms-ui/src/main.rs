//! mylms UI entry point for WASM.

#![no_main]

use wasm_bindgen::prelude::wasm_bindgen;

/// Entry point for the WASM module.
/// This function is called automatically when the module is loaded.
#[wasm_bindgen(start)]
pub fn start() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();

    if let Err(e) = mylms_ui::logging::init_auto() {
        web_sys::console::warn_1(&e.to_string().into());
    }

    mylms_ui::run_when_ready();
}
