//! Search and recommendation requests.
//!
//! The search request arrives flat (`?query=..&minPrice=..&field=price`) and
//! is normalized into a [`SearchQuery`] with grouped filters, an optional
//! sort and defaulted pagination.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::primitives::{id, price};
use super::rules::{array, boolean, integer, one_of, record, string};
use super::{Context, Fields, Schema, object};
use crate::types::{CategoryId, Money, ProductId, SortDirection, SortField};

/// First page.
pub const DEFAULT_PAGE: u64 = 1;
/// Results per page when unspecified.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Largest page size accepted.
pub const MAX_PAGE_SIZE: i64 = 100;
/// Recommendations returned when unspecified.
pub const DEFAULT_RECOMMENDATION_LIMIT: u64 = 5;
/// Largest recommendation limit accepted.
pub const MAX_RECOMMENDATION_LIMIT: i64 = 20;

/// Filters narrowing a search. Unset filters are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub field: SortField,
    pub direction: SortDirection,
}

/// A normalized search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub filters: SearchFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOption>,
    pub page: u64,
    pub page_size: u64,
}

/// Page number and size, with defaults.
fn pagination(fields: &Fields<'_>, cx: &mut Context) -> Option<(u64, u64)> {
    let page = fields.with_default(
        cx,
        "page",
        &integer().positive().map(i64::unsigned_abs),
        DEFAULT_PAGE,
    );
    let page_size = fields.with_default(
        cx,
        "pageSize",
        &integer().min(1).max(MAX_PAGE_SIZE).map(i64::unsigned_abs),
        DEFAULT_PAGE_SIZE,
    );
    Some((page?, page_size?))
}

/// Schema for [`SearchQuery`].
///
/// Structural only: the price range is checked by
/// [`validate_price_range`](super::business::validate_price_range).
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchQuerySchema;

impl Schema for SearchQuerySchema {
    type Output = SearchQuery;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<SearchQuery> {
        let fields = object(value, cx)?;

        let pages = pagination(&fields, cx);
        let query = fields.optional(cx, "query", &string());
        let categories = fields.optional(cx, "categories", &array(id::<CategoryId>()));
        let min_price = fields.optional(cx, "minPrice", &price());
        let max_price = fields.optional(cx, "maxPrice", &price());
        let attributes = fields.optional(cx, "attributes", &record(string(), array(string())));
        let in_stock = fields.optional(cx, "inStock", &boolean());
        let field = fields.optional(cx, "field", &one_of::<SortField>());
        let direction = fields.optional(cx, "direction", &one_of::<SortDirection>());

        let (page, page_size) = pages?;
        let sort = match (field?, direction?) {
            (Some(field), Some(direction)) => Some(SortOption { field, direction }),
            _ => None,
        };

        Some(SearchQuery {
            query: query?,
            filters: SearchFilters {
                categories: categories?,
                min_price: min_price?,
                max_price: max_price?,
                attributes: attributes?,
                in_stock: in_stock?,
            },
            sort,
            page,
            page_size,
        })
    }
}

/// A request for products related to `product_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub product_id: ProductId,
    pub limit: u64,
}

/// Route parameters naming a product: `{ productId }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRefSchema;

impl Schema for ProductRefSchema {
    type Output = ProductId;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<ProductId> {
        let fields = object(value, cx)?;
        fields.required(
            cx,
            "productId",
            &id::<ProductId>().message("Invalid product ID"),
        )
    }
}

/// Recommendation size: `{ limit? }` in 1-20, default 5.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationLimitSchema;

impl Schema for RecommendationLimitSchema {
    type Output = u64;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<u64> {
        let fields = object(value, cx)?;
        fields.with_default(
            cx,
            "limit",
            &integer()
                .min(1)
                .max(MAX_RECOMMENDATION_LIMIT)
                .map(i64::unsigned_abs),
            DEFAULT_RECOMMENDATION_LIMIT,
        )
    }
}

/// Schema for a whole [`RecommendationRequest`] in one document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationSchema;

impl Schema for RecommendationSchema {
    type Output = RecommendationRequest;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<RecommendationRequest> {
        object(value, cx)?;
        let product_id = ProductRefSchema.check(value, cx);
        let limit = RecommendationLimitSchema.check(value, cx);
        Some(RecommendationRequest {
            product_id: product_id?,
            limit: limit?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::schema::{parse, parse_coerced};

    fn failures(value: &Value) -> Vec<(String, String)> {
        parse(&SearchQuerySchema, value)
            .unwrap_err()
            .iter()
            .map(|v| (v.path().to_string(), v.message().to_owned()))
            .collect()
    }

    #[test]
    fn test_pagination_defaults() {
        let query = parse(&SearchQuerySchema, &json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert_eq!(query.filters, SearchFilters::default());
        assert_eq!(query.sort, None);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"filters": {}, "page": 1, "pageSize": 20})
        );
    }

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(
            failures(&json!({"pageSize": 150})),
            vec![(
                "pageSize".to_owned(),
                "Number must be less than or equal to 100".to_owned()
            )]
        );
        assert_eq!(
            failures(&json!({"page": 0}))[0].1,
            "Number must be greater than 0"
        );
    }

    #[test]
    fn test_filters_grouped() {
        let query = parse(
            &SearchQuerySchema,
            &json!({
                "query": "pineapple",
                "categories": ["0f8fad5b-d9cb-469f-a165-70867728950e"],
                "minPrice": 1,
                "maxPrice": 10.5,
                "attributes": {"origin": ["CR"]},
                "inStock": true,
                "page": 2,
                "pageSize": 50,
            }),
        )
        .unwrap();
        assert_eq!(query.query.as_deref(), Some("pineapple"));
        assert_eq!(query.filters.max_price.unwrap().amount(), Decimal::new(105, 1));
        assert_eq!(query.filters.in_stock, Some(true));
        assert_eq!(query.page, 2);

        let out = serde_json::to_value(&query).unwrap();
        assert_eq!(out["filters"]["minPrice"], json!(1.0));
        assert_eq!(out["filters"]["inStock"], json!(true));
        assert_eq!(out["pageSize"], json!(50));
    }

    #[test]
    fn test_sort_requires_both_parts() {
        let query = parse(&SearchQuerySchema, &json!({"field": "price"})).unwrap();
        assert_eq!(query.sort, None);
        let query = parse(&SearchQuerySchema, &json!({"direction": "desc"})).unwrap();
        assert_eq!(query.sort, None);

        let query = parse(
            &SearchQuerySchema,
            &json!({"field": "created_at", "direction": "desc"}),
        )
        .unwrap();
        assert_eq!(
            query.sort,
            Some(SortOption {
                field: SortField::CreatedAt,
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(
            serde_json::to_value(query.sort).unwrap(),
            json!({"field": "created_at", "direction": "desc"})
        );
    }

    #[test]
    fn test_invalid_sort_field() {
        assert_eq!(
            failures(&json!({"field": "rating", "direction": "asc"}))[0].0,
            "field"
        );
    }

    #[test]
    fn test_query_string_form() {
        let query = parse_coerced(
            &SearchQuerySchema,
            &json!({
                "categories": "0f8fad5b-d9cb-469f-a165-70867728950e",
                "minPrice": "5",
                "inStock": "false",
                "attributes": {"color": "red"},
                "page": "3",
            }),
        )
        .unwrap();
        assert_eq!(query.filters.categories.unwrap().len(), 1);
        assert_eq!(query.filters.min_price, Some(Money::parse("5").unwrap()));
        assert_eq!(query.filters.in_stock, Some(false));
        assert_eq!(query.filters.attributes.unwrap()["color"], vec!["red"]);
        assert_eq!(query.page, 3);
    }

    #[test]
    fn test_recommendation_defaults() {
        let request = parse(
            &RecommendationSchema,
            &json!({"productId": "0f8fad5b-d9cb-469f-a165-70867728950e"}),
        )
        .unwrap();
        assert_eq!(request.limit, 5);
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"productId": "0f8fad5b-d9cb-469f-a165-70867728950e", "limit": 5})
        );
    }

    #[test]
    fn test_recommendation_errors() {
        let err = parse(&RecommendationSchema, &json!({"productId": "x", "limit": 21})).unwrap_err();
        let found: Vec<_> = err
            .iter()
            .map(|v| (v.path().to_string(), v.message().to_owned()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("productId".to_owned(), "Invalid product ID".to_owned()),
                (
                    "limit".to_owned(),
                    "Number must be less than or equal to 20".to_owned()
                ),
            ]
        );
    }

    #[test]
    fn test_recommendation_limit_from_query_string() {
        assert_eq!(
            parse_coerced(&RecommendationLimitSchema, &json!({"limit": "12"})).unwrap(),
            12
        );
        assert_eq!(
            parse_coerced(&RecommendationLimitSchema, &json!({})).unwrap(),
            5
        );
    }
}
