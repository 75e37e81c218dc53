//! Extractors that run a schema over one input location.
//!
//! Each extractor parses its location into JSON, checks it against the
//! schema named by its type parameter, and hands the handler the typed,
//! defaulted result. Every violation is reported at once as a 400.
//!
//! ```rust,ignore
//! async fn create_product(
//!     ValidBody(product): ValidBody<ProductSchema>,
//! ) -> Result<Json<Value>> {
//!     // product: Product, already checked
//! }
//! ```

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, RawPathParams, Request},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE, request::Parts},
};
use serde_json::{Map, Value};
use shelfgate_core::schema::{self, Schema, Violations};

use super::query_string;
use crate::error::AppError;

/// Typed JSON body checked by `S`.
pub struct ValidBody<S: Schema>(pub S::Output);

/// Typed query string checked by `S` in coercing mode.
pub struct ValidQuery<S: Schema>(pub S::Output);

/// Typed route parameters checked by `S` in coercing mode.
pub struct ValidParams<S: Schema>(pub S::Output);

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Decode a body into JSON. An empty body reads as `{}`.
fn body_json(headers: &HeaderMap, bytes: &[u8]) -> Result<Value, Violations> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    if !has_json_content_type(headers) {
        return Err(Violations::root("Content-Type must be application/json"));
    }
    serde_json::from_slice(bytes).map_err(|err| Violations::root(format!("Malformed JSON: {err}")))
}

fn rejected(location: &'static str, violations: Violations) -> AppError {
    tracing::warn!(
        location,
        violations = violations.len(),
        first = violations.iter().next().map(|v| v.message()),
        "Request failed validation"
    );
    violations.into()
}

impl<St, S> FromRequest<St> for ValidBody<S>
where
    St: Send + Sync,
    S: Schema + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::Internal(format!("reading request body: {rejection}"))
            }
        })?;

        let value = body_json(&headers, &bytes).map_err(|v| rejected("body", v))?;
        schema::parse(&S::default(), &value)
            .map(Self)
            .map_err(|v| rejected("body", v))
    }
}

impl<St, S> FromRequestParts<St> for ValidQuery<S>
where
    St: Send + Sync,
    S: Schema + Default,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        let value = query_string::decode(parts.uri.query().unwrap_or_default());
        schema::parse_coerced(&S::default(), &value)
            .map(Self)
            .map_err(|v| rejected("query", v))
    }
}

impl<St, S> FromRequestParts<St> for ValidParams<S>
where
    St: Send + Sync,
    S: Schema + Default,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Internal(format!("reading route params: {rejection}")))?;

        let value = Value::Object(
            params
                .iter()
                .map(|(key, value)| (key.to_owned(), Value::String(value.to_owned())))
                .collect(),
        );
        schema::parse_coerced(&S::default(), &value)
            .map(Self)
            .map_err(|v| rejected("params", v))
    }
}
