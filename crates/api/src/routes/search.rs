//! Product search handlers.
//!
//! The same normalized query can arrive as a query string (`GET`) or a JSON
//! body (`POST`); both end up as one [`SearchQuery`].

use axum::{Json, extract::State};
use serde_json::Value;
use shelfgate_core::schema::business::validate_price_range;
use shelfgate_core::schema::search::{SearchFilters, SearchQuery, SearchQuerySchema};
use tracing::{Span, instrument};

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::state::AppState;
use crate::validation::{ValidBody, ValidQuery, check_rule};

/// Reported when the price range rule rejects without a reason.
const INVALID_PRICE_RANGE: &str = "Invalid price range";

/// Search from query-string parameters.
#[instrument(skip_all, fields(tenant_id = tracing::field::Empty))]
pub async fn search_get(
    State(state): State<AppState>,
    auth: OptionalAuth,
    ValidQuery(query): ValidQuery<SearchQuerySchema>,
) -> Result<Json<Value>> {
    search(&state, auth, query).await
}

/// Search from a JSON body.
#[instrument(skip_all, fields(tenant_id = tracing::field::Empty))]
pub async fn search_post(
    State(state): State<AppState>,
    auth: OptionalAuth,
    ValidBody(query): ValidBody<SearchQuerySchema>,
) -> Result<Json<Value>> {
    search(&state, auth, query).await
}

async fn search(state: &AppState, auth: OptionalAuth, query: SearchQuery) -> Result<Json<Value>> {
    check_rule(&query.filters, INVALID_PRICE_RANGE, |filters: &SearchFilters| {
        validate_price_range(filters.min_price, filters.max_price)?;
        Ok(true)
    })?;

    let auth = auth.require()?;
    Span::current().record("tenant_id", tracing::field::display(auth.tenant_id));

    tracing::debug!(
        page = query.page,
        page_size = query.page_size,
        sorted = query.sort.is_some(),
        "Forwarding search"
    );
    let results = state.backend().search_products(auth.tenant_id, &query).await?;
    Ok(Json(results))
}
