//! Order creation.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use shelfgate_core::schema::business::validate_order_items;
use shelfgate_core::schema::order::{OrderItem, OrderSchema};
use tracing::{Span, instrument};

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;
use crate::validation::{ValidBody, check_rule};

/// Fields stripped of markup before validation.
pub const SANITIZED_FIELDS: &[&str] = &["notes"];

const INVALID_ORDER_ITEMS: &str = "Invalid order items";

#[instrument(skip_all, fields(tenant_id = tracing::field::Empty))]
pub async fn create_order(
    State(state): State<AppState>,
    auth: OptionalAuth,
    ValidBody(order): ValidBody<OrderSchema>,
) -> Result<(StatusCode, Json<Value>)> {
    check_rule(order.items.as_slice(), INVALID_ORDER_ITEMS, |items: &[OrderItem]| {
        validate_order_items(items)?;
        Ok(true)
    })?;

    let auth = auth.require()?;
    Span::current().record("tenant_id", tracing::field::display(auth.tenant_id));

    tracing::info!(
        customer_id = %order.customer_id,
        items = order.items.len(),
        "Creating order"
    );
    let created = state.backend().create_order(auth.tenant_id, &order).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
