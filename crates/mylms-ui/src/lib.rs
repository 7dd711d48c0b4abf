//! `mylms` UI - WASM page glue for the server-rendered site.
//!
//! Runs once per page load: attaches Bootstrap tooltips and popovers, sizes
//! progress bars, and wires the notification "mark as read" controls to
//! [`mylms_core::NotificationSync`].

pub mod bootstrap;
pub mod cookies;
pub mod dom;
pub mod http;
pub mod logging;
pub mod page;

use tracing::warn;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::Document;

pub use page::{InitReport, PageSync, initialize};

/// Run [`initialize`] once the document is parsed.
///
/// If the module loads after `DOMContentLoaded` has already fired, the page
/// is initialized immediately.
pub fn run_when_ready() {
    let Some(document) = current_document() else {
        warn!("No document; page glue not started");
        return;
    };

    if document.ready_state() != "loading" {
        initialize(&document);
        return;
    }

    let ready = Closure::<dyn Fn()>::new({
        let document = document.clone();
        move || {
            initialize(&document);
        }
    });
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())
    {
        warn!("Failed to wait for DOMContentLoaded: {:?}", e);
        return;
    }
    ready.forget();
}

/// Document the glue is running in, if any.
#[must_use]
pub fn current_document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}
