//! Customer creation.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use shelfgate_core::schema::customer::CustomerSchema;
use tracing::{Span, instrument};

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;
use crate::validation::ValidBody;

/// Fields stripped of markup before validation.
pub const SANITIZED_FIELDS: &[&str] = &["first_name", "last_name"];

#[instrument(skip_all, fields(tenant_id = tracing::field::Empty))]
pub async fn create_customer(
    State(state): State<AppState>,
    auth: OptionalAuth,
    ValidBody(customer): ValidBody<CustomerSchema>,
) -> Result<(StatusCode, Json<Value>)> {
    let auth = auth.require()?;
    Span::current().record("tenant_id", tracing::field::display(auth.tenant_id));

    let created = state
        .backend()
        .create_customer(auth.tenant_id, &customer)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
