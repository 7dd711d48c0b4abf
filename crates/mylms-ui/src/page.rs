//! Page initialization.
//!
//! Everything the page script does on page-ready: widgets, progress bars,
//! and the notification controls.

use std::rc::Rc;

use mylms_core::{
    CONFIG_ELEMENT_ID, NotificationBoard, NotificationSync, PageConfig, Result, WidgetKind,
};
use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, closure::Closure};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

use crate::bootstrap;
use crate::cookies::DocumentCookies;
use crate::dom::{self, DomRenderer, dom_error};
use crate::http::FetchApi;

/// Attribute set on controls once their click handler is attached.
pub const BOUND_ATTRIBUTE: &str = "data-mylms-bound";

/// The notification controller as wired into a live page.
pub type PageSync = NotificationSync<FetchApi, DomRenderer, DocumentCookies>;

/// Summary of one initialization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Widgets attached (or found already attached).
    pub widgets: usize,
    /// Progress bars whose width was set.
    pub progress_bars: usize,
    /// Mark-as-read controls wired in this pass.
    pub notifications: usize,
}

/// Read the optional `#mylms-page-config` override block.
#[must_use]
pub fn load_config(document: &Document) -> PageConfig {
    let text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    PageConfig::from_optional_json(text.as_deref())
}

/// Run every page-ready step.
///
/// A failing step is logged and does not stop the others.
pub fn initialize(document: &Document) -> InitReport {
    let config = load_config(document);
    let mut report = InitReport::default();

    match activate_widgets(document, &config) {
        Ok(count) => report.widgets = count,
        Err(e) => warn!("Widget activation failed: {}", e),
    }
    match dom::apply_progress_bars(document, &config.selectors.progress_bar) {
        Ok(count) => report.progress_bars = count,
        Err(e) => warn!("Progress bar update failed: {}", e),
    }
    match wire_notifications(document, &config) {
        Ok(Some(sync)) => report.notifications = sync.board().len(),
        Ok(None) => {}
        Err(e) => warn!("Notification wiring failed: {}", e),
    }

    info!(
        widgets = report.widgets,
        progress_bars = report.progress_bars,
        notifications = report.notifications,
        "Page initialized"
    );
    report
}

/// Attach tooltip and popover widgets.
///
/// Skipped with a warning when Bootstrap is not loaded.
///
/// # Errors
///
/// Returns an error if a configured selector is invalid.
pub fn activate_widgets(document: &Document, config: &PageConfig) -> Result<usize> {
    if !bootstrap::is_bootstrap_available() {
        warn!("Bootstrap not loaded; skipping tooltips and popovers");
        return Ok(0);
    }

    let mut activated = 0;
    for kind in WidgetKind::ALL {
        for element in dom::query_all(document, config.selectors.widget(kind))? {
            match bootstrap::activate(kind, &element) {
                Ok(()) => activated += 1,
                Err(e) => warn!("Failed to attach {}: {}", kind, e),
            }
        }
    }
    debug!("Attached {} widgets", activated);
    Ok(activated)
}

/// Wire mark-as-read and mark-all-read controls to a new controller.
///
/// Controls already wired by an earlier pass are skipped. Returns `None`
/// when there is nothing new to wire.
///
/// # Errors
///
/// Returns an error if a selector is invalid or a listener cannot be added.
pub fn wire_notifications(
    document: &Document,
    config: &PageConfig,
) -> Result<Option<Rc<PageSync>>> {
    let mut board = NotificationBoard::new();
    let mut controls = Vec::new();
    for control in unbound(document, &config.selectors.mark_as_read)? {
        let Some(url) = control.get_attribute("href") else {
            warn!("Mark-as-read control without href; skipping");
            continue;
        };
        controls.push((board.register(url), control));
    }
    let mark_all = unbound(document, &config.selectors.mark_all_read)?;

    if controls.is_empty() && mark_all.is_empty() {
        return Ok(None);
    }

    let elements = controls.iter().map(|(_, control)| control.clone()).collect();
    let renderer = DomRenderer::new(document.clone(), elements, config);
    let sync = Rc::new(NotificationSync::new(
        FetchApi,
        renderer,
        DocumentCookies::new(document),
        config.endpoints.clone(),
        board,
    ));

    for (id, control) in &controls {
        let id = *id;
        let sync = Rc::clone(&sync);
        on_click(control, move || {
            let sync = Rc::clone(&sync);
            spawn_local(async move {
                if let Err(e) = sync.mark_read(id).await {
                    warn!("Mark as read failed for notification {}: {}", id, e);
                }
            });
        })?;
    }

    for control in &mark_all {
        let sync = Rc::clone(&sync);
        on_click(control, move || {
            let sync = Rc::clone(&sync);
            spawn_local(async move {
                if let Err(e) = sync.mark_all_read().await {
                    warn!("Mark all as read failed: {}", e);
                }
            });
        })?;
    }

    debug!(
        "Wired {} mark-as-read and {} mark-all-read controls",
        controls.len(),
        mark_all.len()
    );
    Ok(Some(sync))
}

fn unbound(document: &Document, selector: &str) -> Result<Vec<Element>> {
    Ok(dom::query_all(document, selector)?
        .into_iter()
        .filter(|element| !element.has_attribute(BOUND_ATTRIBUTE))
        .collect())
}

/// Attach a click handler that always suppresses default navigation.
///
/// The handler lives as long as the page.
fn on_click(control: &Element, action: impl Fn() + 'static) -> Result<()> {
    let handler = Closure::<dyn Fn(Event)>::new(move |event: Event| {
        event.prevent_default();
        action();
    });
    control
        .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
        .map_err(|e| dom_error("Failed to add click listener", &e))?;
    handler.forget();

    control
        .set_attribute(BOUND_ATTRIBUTE, "")
        .map_err(|e| dom_error("Failed to tag control", &e))
}
