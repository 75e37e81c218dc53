//! Product creation.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use shelfgate_core::schema::product::ProductSchema;
use tracing::{Span, instrument};

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;
use crate::validation::ValidBody;

/// Fields stripped of markup before validation.
pub const SANITIZED_FIELDS: &[&str] = &["name", "description"];

#[instrument(skip_all, fields(tenant_id = tracing::field::Empty))]
pub async fn create_product(
    State(state): State<AppState>,
    auth: OptionalAuth,
    ValidBody(product): ValidBody<ProductSchema>,
) -> Result<(StatusCode, Json<Value>)> {
    let auth = auth.require()?;
    Span::current().record("tenant_id", tracing::field::display(auth.tenant_id));

    tracing::info!(sku = %product.sku, "Creating product");
    let created = state.backend().create_product(auth.tenant_id, &product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
