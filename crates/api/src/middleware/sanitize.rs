//! Body sanitization ahead of validation.
//!
//! Layered per route with the list of free-text fields that route accepts:
//!
//! ```rust,ignore
//! post(create_product).layer(from_fn_with_state(
//!     SanitizeFields::new(&["name", "description"]),
//!     sanitize_middleware,
//! ))
//! ```
//!
//! The body is buffered under the router's `DefaultBodyLimit`.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request, State},
    http::{StatusCode, header::CONTENT_LENGTH},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use shelfgate_core::sanitize::sanitize_fields;

use crate::error::AppError;

/// Fields to sanitize on one route.
#[derive(Debug, Clone)]
pub struct SanitizeFields {
    fields: Arc<[String]>,
}

impl SanitizeFields {
    /// Sanitize the named top-level `fields`.
    #[must_use]
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| (*f).to_owned()).collect(),
        }
    }
}

/// Buffer the body of `request`, honouring the body limit in its extensions.
async fn buffer(request: &mut Request) -> Result<Bytes, AppError> {
    let mut detached = Request::new(std::mem::take(request.body_mut()));
    *detached.extensions_mut() = request.extensions().clone();
    Bytes::from_request(detached, &()).await.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!(error = %rejection, "Request body over limit");
            AppError::PayloadTooLarge
        } else {
            AppError::Internal(format!("buffering request body: {rejection}"))
        }
    })
}

/// Strip tags from and trim the configured top-level string fields.
///
/// Never rejects on content: bodies that are not JSON objects are forwarded
/// unchanged for the validation stage to judge.
pub async fn sanitize_middleware(
    State(config): State<SanitizeFields>,
    mut request: Request,
    next: Next,
) -> Response {
    let bytes = match buffer(&mut request).await {
        Ok(bytes) => bytes,
        Err(err) => return err.into_response(),
    };
    let (mut parts, _) = request.into_parts();

    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value @ Value::Object(_)) => {
            let changed = sanitize_fields(&mut value, config.fields.as_ref());
            if changed == 0 {
                Body::from(bytes)
            } else {
                tracing::debug!(changed, "Sanitized request fields");
                parts.headers.remove(CONTENT_LENGTH);
                match serde_json::to_vec(&value) {
                    Ok(encoded) => Body::from(encoded),
                    Err(err) => {
                        return AppError::Internal(format!("re-encoding body: {err}"))
                            .into_response();
                    }
                }
            }
        }
        _ => Body::from(bytes),
    };

    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::to_bytes,
        extract::DefaultBodyLimit,
        http::Request as HttpRequest,
        middleware::from_fn_with_state,
        routing::post,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    fn app(limit: usize) -> Router {
        Router::new()
            .route(
                "/echo",
                post(|body: Bytes| async move { body }).layer(from_fn_with_state(
                    SanitizeFields::new(&["name"]),
                    sanitize_middleware,
                )),
            )
            .layer(DefaultBodyLimit::max(limit))
    }

    async fn send_body(app: Router, body: Body) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/echo")
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send(app: Router, body: &'static str) -> (StatusCode, Vec<u8>) {
        send_body(app, Body::from(body)).await
    }

    #[tokio::test]
    async fn test_sanitizes_named_fields() {
        let (status, body) = send(app(1024), r#"{"name":" <b>Pine</b> ","sku":" <b>x</b> "}"#).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"name": "Pine", "sku": " <b>x</b> "}));
    }

    #[tokio::test]
    async fn test_passes_non_objects_through() {
        let (_, body) = send(app(1024), "not json <b>").await;
        assert_eq!(body, b"not json <b>");
        let (_, body) = send(app(1024), r#"[" <b>x</b> "]"#).await;
        assert_eq!(body, br#"[" <b>x</b> "]"#);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let (status, _) = send(app(8), r#"{"name":"far too long"}"#).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_broken_body_stream_is_internal() {
        let stream = futures::stream::once(async {
            Err::<Bytes, _>(std::io::Error::other("connection reset"))
        });
        let (status, body) = send_body(app(1024), Body::from_stream(stream)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({"message": "Internal server error"}));
    }
}
