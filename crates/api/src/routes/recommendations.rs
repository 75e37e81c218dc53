//! Product recommendation handler.

use axum::{Json, extract::State};
use serde_json::Value;
use shelfgate_core::schema::search::{
    ProductRefSchema, RecommendationLimitSchema, RecommendationRequest,
};
use tracing::{Span, instrument};

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;
use crate::validation::{ValidParams, ValidQuery};

/// Products related to `{productId}`, `?limit=` of them (default 5, at most 20).
#[instrument(
    skip_all,
    fields(tenant_id = tracing::field::Empty, product_id = tracing::field::Empty)
)]
pub async fn recommendations(
    State(state): State<AppState>,
    auth: OptionalAuth,
    ValidParams(product_id): ValidParams<ProductRefSchema>,
    ValidQuery(limit): ValidQuery<RecommendationLimitSchema>,
) -> Result<Json<Value>> {
    let auth = auth.require()?;
    let span = Span::current();
    span.record("tenant_id", tracing::field::display(auth.tenant_id));
    span.record("product_id", tracing::field::display(product_id));

    let request = RecommendationRequest { product_id, limit };
    let products = state.backend().recommendations(auth.tenant_id, &request).await?;
    Ok(Json(products))
}
