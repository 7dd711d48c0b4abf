//! Fetch-based transport for the notification endpoints.

use gloo_net::http::{Request, RequestBuilder};
use mylms_core::{
    ApiRequest, Error, MarkReadResponse, Method, NotificationApi, Result, UnreadCountResponse,
};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

/// [`NotificationApi`] over the browser's `fetch`.
///
/// Requests are same-origin, so the session cookie travels with them.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchApi;

impl NotificationApi for FetchApi {
    async fn mark_read(&self, request: &ApiRequest) -> Result<MarkReadResponse> {
        send(request).await
    }

    async fn unread_count(&self, request: &ApiRequest) -> Result<UnreadCountResponse> {
        send(request).await
    }
}

fn builder(request: &ApiRequest) -> RequestBuilder {
    let builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
    };
    request
        .headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name, value))
}

async fn send<T: DeserializeOwned>(request: &ApiRequest) -> Result<T> {
    debug!("=== {} {} ===", request.method.as_str(), request.url);

    let response = builder(request)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("{} {}: {e}", request.method.as_str(), request.url)))?;

    if !response.ok() {
        return Err(Error::HttpStatus {
            status: response.status(),
            url: request.url.clone(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read body of {}: {e}", request.url)))?;
    trace!("Response body from {}: {}", request.url, body);

    Ok(serde_json::from_str(&body)?)
}
