//! Notification endpoint contract.
//!
//! Request descriptions and response bodies for the two calls the page
//! makes: marking notifications read (`POST`) and reading the unread count
//! (`GET`). The transport itself lives behind [`NotificationApi`].

use serde::{Deserialize, Serialize};

use crate::csrf::CSRF_HEADER;
use crate::error::Result;

/// Header marking a request as script-originated.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Value of [`REQUESTED_WITH_HEADER`]; the server answers JSON instead of
/// redirecting when it sees it.
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read-only query.
    Get,
    /// State-changing call.
    Post,
}

impl Method {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Target URL, relative to the page origin.
    pub url: String,
    /// Headers in insertion order.
    pub headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    /// State-changing request marking one or all notifications read.
    ///
    /// The anti-forgery header is only attached when a token is known.
    #[must_use]
    pub fn mark_read(url: impl Into<String>, csrf_token: Option<String>) -> Self {
        let mut headers = vec![(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE.to_string())];
        if let Some(token) = csrf_token {
            headers.push((CSRF_HEADER, token));
        }
        Self {
            method: Method::Post,
            url: url.into(),
            headers,
        }
    }

    /// Read-only request for the unread count.
    #[must_use]
    pub fn unread_count(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: vec![(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE.to_string())],
        }
    }

    /// Value of the first header with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Body returned by the mark-read endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkReadResponse {
    /// Whether the server changed the read state. Absent means `false`.
    #[serde(default)]
    pub success: bool,
}

/// Body returned by the unread count endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCountResponse {
    /// Number of unread notifications. Absent means zero.
    #[serde(default)]
    pub count: i64,
}

/// Transport for the notification endpoints.
///
/// Implementations perform the request described by [`ApiRequest`] and
/// decode the JSON body. A non-success status must be reported as
/// [`Error::HttpStatus`](crate::Error::HttpStatus) rather than decoded.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub trait NotificationApi {
    /// Send a mark-read request.
    async fn mark_read(&self, request: &ApiRequest) -> Result<MarkReadResponse>;

    /// Send an unread count request.
    async fn unread_count(&self, request: &ApiRequest) -> Result<UnreadCountResponse>;
}
