//! DOM queries and patching.

use mylms_core::{
    Error, ItemId, PageConfig, Result, VALUE_ATTRIBUTE, ViewPatch, ViewRenderer, fill_width_for,
};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

/// Convert a thrown JS value into a DOM error.
pub(crate) fn dom_error(context: &str, err: &JsValue) -> Error {
    let detail = err
        .as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"));
    Error::Dom(format!("{context}: {detail}"))
}

/// Every element matching a selector, in document order.
///
/// # Errors
///
/// Returns an error if the selector is invalid.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| dom_error(&format!("Invalid selector {selector:?}"), &e))?;
    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn set_style(element: &Element, property: &str, value: &str) -> Result<()> {
    let element = element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| Error::Dom(format!("<{}> has no inline style", element.tag_name())))?;
    element
        .style()
        .set_property(property, value)
        .map_err(|e| dom_error(&format!("Failed to set {property}"), &e))
}

/// Set each progress bar's width from its `aria-valuenow`.
///
/// Returns how many bars were updated. Bars without the attribute are left
/// alone; values are not validated.
///
/// # Errors
///
/// Returns an error if the selector is invalid.
pub fn apply_progress_bars(document: &Document, selector: &str) -> Result<usize> {
    let mut updated = 0;
    for bar in query_all(document, selector)? {
        let Some(width) = fill_width_for(bar.get_attribute(VALUE_ATTRIBUTE).as_deref()) else {
            continue;
        };
        match set_style(&bar, "width", &width) {
            Ok(()) => updated += 1,
            Err(e) => warn!("Skipping progress bar: {}", e),
        }
    }
    debug!("Updated {} progress bars", updated);
    Ok(updated)
}

/// Applies notification patches to the live page.
pub struct DomRenderer {
    document: Document,
    controls: Vec<Element>,
    item_selector: String,
    badge_selector: String,
    count_badge_id: String,
    unread_class: String,
}

impl DomRenderer {
    /// Create a renderer.
    ///
    /// `controls` must be in the same order the items were registered on the
    /// board: the control at index `n` belongs to `ItemId` `n`.
    #[must_use]
    pub fn new(document: Document, controls: Vec<Element>, config: &PageConfig) -> Self {
        Self {
            document,
            controls,
            item_selector: config.selectors.notification_item.clone(),
            badge_selector: config.selectors.item_badge.clone(),
            count_badge_id: config.selectors.count_badge_id.clone(),
            unread_class: config.unread_class.clone(),
        }
    }

    fn mark_item_read(&self, id: ItemId) -> Result<()> {
        let control = self
            .controls
            .get(id.index())
            .ok_or(Error::UnknownItem(id.index()))?;
        let item = control
            .closest(&self.item_selector)
            .map_err(|e| dom_error("Invalid item selector", &e))?
            .ok_or_else(|| Error::MissingElement(self.item_selector.clone()))?;

        item.class_list()
            .remove_1(&self.unread_class)
            .map_err(|e| dom_error("Failed to remove unread class", &e))?;

        match item
            .query_selector(&self.badge_selector)
            .map_err(|e| dom_error("Invalid badge selector", &e))?
        {
            Some(badge) => badge.remove(),
            None => debug!("Notification {} has no unread badge", id),
        }
        Ok(())
    }

    fn set_count_badge(&self, count: Option<u64>) -> Result<()> {
        let Some(badge) = self.document.get_element_by_id(&self.count_badge_id) else {
            debug!("No #{} on this page", self.count_badge_id);
            return Ok(());
        };
        match count {
            Some(count) => {
                badge.set_text_content(Some(&count.to_string()));
                set_style(&badge, "display", "inline-block")
            }
            None => set_style(&badge, "display", "none"),
        }
    }
}

impl ViewRenderer for DomRenderer {
    fn apply(&self, patch: &ViewPatch) {
        let result = match *patch {
            ViewPatch::MarkItemRead(id) => self.mark_item_read(id),
            ViewPatch::ShowUnreadCount(count) => self.set_count_badge(Some(count)),
            ViewPatch::HideUnreadCount => self.set_count_badge(None),
        };
        if let Err(e) = result {
            warn!("Failed to apply {:?}: {}", patch, e);
        }
    }
}
