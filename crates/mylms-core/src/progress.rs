//! Progress bar fill widths.

/// Attribute holding the current value of a progress bar.
pub const VALUE_ATTRIBUTE: &str = "aria-valuenow";

/// CSS width for a progress bar with the given `aria-valuenow` value.
///
/// The value is passed through verbatim: no parsing, clamping or
/// validation. A malformed value yields a width the browser ignores.
#[must_use]
pub fn fill_width(value: &str) -> String {
    format!("{value}%")
}

/// CSS width for an optional attribute value.
///
/// `None` means the attribute is absent and the bar should be left alone.
#[must_use]
pub fn fill_width_for(value: Option<&str>) -> Option<String> {
    value.map(fill_width)
}
