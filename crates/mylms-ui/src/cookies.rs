//! `document.cookie` access.

use mylms_core::CookieSource;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlDocument};

/// Reads the live cookie string of an HTML document.
pub struct DocumentCookies {
    document: Option<HtmlDocument>,
}

impl DocumentCookies {
    /// Wrap a document. Non-HTML documents have no cookie jar and always
    /// report an empty string.
    #[must_use]
    pub fn new(document: &Document) -> Self {
        let document = document.clone().dyn_into::<HtmlDocument>().ok();
        if document.is_none() {
            warn!("Document has no cookie jar; requests will carry no CSRF token");
        }
        Self { document }
    }
}

impl CookieSource for DocumentCookies {
    fn cookie_string(&self) -> String {
        let Some(document) = &self.document else {
            return String::new();
        };
        document.cookie().unwrap_or_else(|e| {
            warn!("Failed to read document.cookie: {:?}", e);
            String::new()
        })
    }
}
