//! Anti-forgery token lookup.
//!
//! Django drops its CSRF secret into a `csrftoken` cookie; state-changing
//! requests echo it back in the `X-CSRFToken` header.

use tracing::{trace, warn};

/// Name of the cookie holding the anti-forgery token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Header the server reads the anti-forgery token from.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Look up a cookie value in a `document.cookie` style string.
///
/// Pieces are split on `;` and trimmed; the first one starting with
/// `name=` wins and its value is percent-decoded. Returns `None` when no
/// piece matches, the value has a `%` not followed by two hex digits, or
/// the decoded value is not valid UTF-8.
#[must_use]
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    let raw = cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))?;

    if has_malformed_escape(raw) {
        warn!("Cookie {} has a malformed percent escape", name);
        return None;
    }
    match urlencoding::decode(raw) {
        Ok(value) => Some(value.into_owned()),
        Err(e) => {
            warn!("Cookie {} is not valid UTF-8 after decoding: {}", name, e);
            None
        }
    }
}

fn has_malformed_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !matches!(
                bytes.get(i + 1..i + 3),
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
    })
}

/// Read the anti-forgery token from a cookie string.
#[must_use]
pub fn csrf_token(cookies: &str) -> Option<String> {
    let token = cookie_value(cookies, CSRF_COOKIE_NAME);
    trace!(found = token.is_some(), "CSRF cookie lookup");
    token
}
