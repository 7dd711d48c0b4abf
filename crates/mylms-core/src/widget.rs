//! Bootstrap widget markers.
//!
//! Elements opt into a widget with `data-bs-toggle`. Only tooltips and
//! popovers are activated by script; the other toggle values (`collapse`,
//! `dropdown`, ...) are handled by Bootstrap's own data API.

use std::fmt;

/// Attribute elements use to opt into a widget.
pub const TOGGLE_ATTRIBUTE: &str = "data-bs-toggle";

/// Widgets that need explicit activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// `bootstrap.Tooltip`.
    Tooltip,
    /// `bootstrap.Popover`.
    Popover,
}

impl WidgetKind {
    /// Every widget kind, in activation order.
    pub const ALL: [Self; 2] = [Self::Tooltip, Self::Popover];

    /// The `data-bs-toggle` value for this widget.
    #[must_use]
    pub const fn toggle_value(self) -> &'static str {
        match self {
            Self::Tooltip => "tooltip",
            Self::Popover => "popover",
        }
    }

    /// Name of the constructor on the `bootstrap` global.
    #[must_use]
    pub const fn constructor(self) -> &'static str {
        match self {
            Self::Tooltip => "Tooltip",
            Self::Popover => "Popover",
        }
    }

    /// Attribute selector matching elements that opt into this widget.
    #[must_use]
    pub fn selector(self) -> String {
        format!(r#"[{TOGGLE_ATTRIBUTE}="{}"]"#, self.toggle_value())
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constructor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matches_template_markup() {
        assert_eq!(
            WidgetKind::Tooltip.selector(),
            r#"[data-bs-toggle="tooltip"]"#
        );
        assert_eq!(
            WidgetKind::Popover.selector(),
            r#"[data-bs-toggle="popover"]"#
        );
    }

    #[test]
    fn test_toggle_values_are_distinct() {
        assert_eq!(WidgetKind::Tooltip.toggle_value(), "tooltip");
        assert_eq!(WidgetKind::Popover.toggle_value(), "popover");
    }

    #[test]
    fn test_display_is_constructor_name() {
        assert_eq!(WidgetKind::Popover.to_string(), "Popover");
    }
}
