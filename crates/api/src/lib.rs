//! Shelfgate API - the validating gateway in front of the catalog backend.
//!
//! Every request is sanitized, validated and normalized here; only
//! well-formed, tenant-scoped requests are forwarded to the backend.
//!
//! This crate provides the gateway as a library so the router can be
//! driven in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Request, Response},
    middleware::from_fn,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{gateway_auth_middleware, request_id_middleware};
use crate::state::AppState;

/// Build the full gateway router, minus the Sentry layers added by the binary.
pub fn router(state: AppState) -> Router {
    let config = state.config();
    let body_limit = config.body_limit;

    let mut app = routes::routes().layer(DefaultBodyLimit::max(body_limit));
    if config.trust_gateway_headers {
        app = app.layer(from_fn(gateway_auth_middleware));
    } else {
        tracing::warn!("Gateway identity headers are not trusted; every request is anonymous");
    }

    app.layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
