//! Page configuration.
//!
//! The DOM contract (selectors, endpoints, class names) the glue depends on.
//! Every field has a default matching the server templates, so a page only
//! needs an override block when it deviates from them.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::widget::WidgetKind;

/// Element id of the optional JSON override block.
pub const CONFIG_ELEMENT_ID: &str = "mylms-page-config";

/// Default endpoint returning the unread notification count.
pub const DEFAULT_UNREAD_COUNT_URL: &str = "/notifications/api/unread-count/";

/// Default endpoint marking every notification as read.
pub const DEFAULT_MARK_ALL_READ_URL: &str = "/notifications/mark-all-read/";

/// Selectors used to find elements on the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Selectors {
    /// Elements that get a tooltip widget.
    pub tooltip: String,
    /// Elements that get a popover widget.
    pub popover: String,
    /// Progress bars whose width is driven by `aria-valuenow`.
    pub progress_bar: String,
    /// Per-item "mark as read" controls.
    pub mark_as_read: String,
    /// The "mark all as read" control.
    pub mark_all_read: String,
    /// Wrapper element of a single notification.
    pub notification_item: String,
    /// Per-item unread badge, looked up inside the wrapper.
    pub item_badge: String,
    /// Id of the global unread count badge.
    pub count_badge_id: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            tooltip: WidgetKind::Tooltip.selector(),
            popover: WidgetKind::Popover.selector(),
            progress_bar: ".progress-bar".to_string(),
            mark_as_read: ".mark-as-read".to_string(),
            mark_all_read: ".mark-all-read".to_string(),
            notification_item: ".notification-item".to_string(),
            item_badge: ".badge".to_string(),
            count_badge_id: "notification-count-badge".to_string(),
        }
    }
}

impl Selectors {
    /// Selector for elements that opt into the given widget.
    #[must_use]
    pub fn widget(&self, kind: WidgetKind) -> &str {
        match kind {
            WidgetKind::Tooltip => &self.tooltip,
            WidgetKind::Popover => &self.popover,
        }
    }
}

/// Endpoints the glue talks to besides the per-item URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    /// `GET` endpoint returning `{"count": n}`.
    pub unread_count: String,
    /// `POST` endpoint marking every notification read.
    pub mark_all_read: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            unread_count: DEFAULT_UNREAD_COUNT_URL.to_string(),
            mark_all_read: DEFAULT_MARK_ALL_READ_URL.to_string(),
        }
    }
}

/// Page-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageConfig {
    /// DOM selectors.
    pub selectors: Selectors,
    /// Server endpoints.
    pub endpoints: Endpoints,
    /// Highlight class removed from an item once it is read.
    pub unread_class: String,
}

fn default_unread_class() -> String {
    "bg-light".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            endpoints: Endpoints::default(),
            unread_class: default_unread_class(),
        }
    }
}

impl PageConfig {
    /// Parse a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or names an empty endpoint.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("Failed to parse page config: {e}")))?;
        if config.unread_class.is_empty() {
            config.unread_class = default_unread_class();
        }
        config.validate()?;
        debug!(?config, "Loaded page config override");
        Ok(config)
    }

    /// Parse an optional override block, falling back to defaults.
    ///
    /// Invalid overrides are logged and ignored so a template typo never
    /// disables the rest of the page glue.
    #[must_use]
    pub fn from_optional_json(json: Option<&str>) -> Self {
        match json.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(text) => Self::from_json(text).unwrap_or_else(|e| {
                warn!("Ignoring page config override: {}", e);
                Self::default()
            }),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.endpoints.unread_count.trim().is_empty() {
            return Err(Error::Configuration(
                "Unread count endpoint must not be empty".to_string(),
            ));
        }
        if self.endpoints.mark_all_read.trim().is_empty() {
            return Err(Error::Configuration(
                "Mark-all-read endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_templates() {
        let config = PageConfig::default();
        assert_eq!(config.selectors.mark_as_read, ".mark-as-read");
        assert_eq!(config.selectors.count_badge_id, "notification-count-badge");
        assert_eq!(
            config.endpoints.unread_count,
            "/notifications/api/unread-count/"
        );
        assert_eq!(config.unread_class, "bg-light");
    }

    #[test]
    fn test_widget_selectors() {
        let selectors = Selectors::default();
        assert_eq!(
            selectors.widget(WidgetKind::Tooltip),
            r#"[data-bs-toggle="tooltip"]"#
        );
        assert_eq!(
            selectors.widget(WidgetKind::Popover),
            r#"[data-bs-toggle="popover"]"#
        );
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config =
            PageConfig::from_json(r#"{"endpoints": {"unread_count": "/api/unread/"}}"#).unwrap();
        assert_eq!(config.endpoints.unread_count, "/api/unread/");
        assert_eq!(config.endpoints.mark_all_read, DEFAULT_MARK_ALL_READ_URL);
        assert_eq!(config.selectors, Selectors::default());
        assert_eq!(config.unread_class, "bg-light");
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let result = PageConfig::from_json(r#"{"endpoints": {"unread_count": "  "}}"#);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let config = PageConfig::from_optional_json(Some("{oops"));
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_missing_override_uses_defaults() {
        assert_eq!(PageConfig::from_optional_json(None), PageConfig::default());
        assert_eq!(
            PageConfig::from_optional_json(Some("   ")),
            PageConfig::default()
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = PageConfig {
            unread_class: "table-warning".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("Should serialize");
        let back: PageConfig = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(config, back);
    }
}
