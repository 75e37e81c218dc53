//! HTTP route handlers for the gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Liveness check
//!
//! # Search
//! GET  /search                               - Search from query string
//! POST /search                               - Search from JSON body
//! GET  /products/{productId}/recommendations - Related products
//!
//! # Writes (sanitized, then validated, then forwarded)
//! POST /products                             - Create product
//! POST /orders                               - Create order
//! POST /customers                            - Create customer
//! ```
//!
//! Every handler validates first, then requires an authenticated tenant, then
//! calls the catalog backend.

pub mod customers;
pub mod orders;
pub mod products;
pub mod recommendations;
pub mod search;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{MethodRouter, get, post},
};

use crate::middleware::{SanitizeFields, sanitize_middleware};
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
pub async fn health() -> &'static str {
    "ok"
}

/// Wrap a write route so `fields` are sanitized before it sees the body.
fn sanitized(route: MethodRouter<AppState>, fields: &[&str]) -> MethodRouter<AppState> {
    route.layer(from_fn_with_state(
        SanitizeFields::new(fields),
        sanitize_middleware,
    ))
}

/// Create the gateway routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/search", get(search::search_get).post(search::search_post))
        .route(
            "/products/{productId}/recommendations",
            get(recommendations::recommendations),
        )
        .route(
            "/products",
            sanitized(post(products::create_product), products::SANITIZED_FIELDS),
        )
        .route(
            "/orders",
            sanitized(post(orders::create_order), orders::SANITIZED_FIELDS),
        )
        .route(
            "/customers",
            sanitized(post(customers::create_customer), customers::SANITIZED_FIELDS),
        )
}
