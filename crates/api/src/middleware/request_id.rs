//! Request correlation IDs.
//!
//! The upstream auth proxy usually stamps `x-request-id`; the gateway keeps
//! that value so its logs line up with the proxy's and the backend's, and
//! mints a UUID v4 otherwise. The ID ends up:
//! - on the `http_request` span (`request_id` field)
//! - as a Sentry tag
//! - in the request extensions as [`RequestId`]
//! - echoed on the response, including error responses

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID accepted as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The correlation ID of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse a usable upstream ID, or mint one.
    ///
    /// Upstream values must be visible ASCII and at most 128 bytes.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let upstream = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_REQUEST_ID_LEN
                    && id.bytes().all(|b| b.is_ascii_graphic())
            });
        Self(upstream.map_or_else(|| Uuid::new_v4().to_string(), String::from))
    }
}

/// Middleware that gives every request a correlation ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());

    Span::current().record("request_id", request_id.0.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id.0);
    });

    let header = HeaderValue::from_str(&request_id.0).ok();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
