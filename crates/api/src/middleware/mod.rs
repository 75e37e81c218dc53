//! HTTP middleware stack for the gateway.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record in span, echo in response)
//! 4. Gateway auth (identity headers from the upstream proxy)
//! 5. Body limit
//! 6. Per-route sanitization of free-text fields

pub mod auth;
pub mod request_id;
pub mod sanitize;

pub use auth::{AuthContext, OptionalAuth, gateway_auth_middleware};
pub use request_id::{RequestId, request_id_middleware};
pub use sanitize::{SanitizeFields, sanitize_middleware};
