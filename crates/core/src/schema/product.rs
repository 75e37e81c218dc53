//! Catalog product payloads.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::primitives::{id, price, quantity, sku, url};
use super::rules::{any, array, boolean, record, string};
use super::{Context, Metadata, Schema, object};
use crate::types::{CategoryId, Money, Quantity, Sku};

/// A validated product ready to be forwarded to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sku: Sku,
    pub price: Money,
    pub stock_quantity: Quantity,
    pub categories: Vec<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Schema for [`Product`]. `is_active` defaults to `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductSchema;

impl Schema for ProductSchema {
    type Output = Product;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<Product> {
        let fields = object(value, cx)?;

        let name = fields.required(
            cx,
            "name",
            &string()
                .min_len(1)
                .message("Name is required")
                .max_len(200)
                .message("Name is too long"),
        );
        let description = fields.optional(
            cx,
            "description",
            &string().max_len(2000).message("Description is too long"),
        );
        let sku = fields.required(cx, "sku", &sku());
        let price = fields.required(cx, "price", &price());
        let stock_quantity = fields.required(cx, "stock_quantity", &quantity());
        let categories = fields.required(
            cx,
            "categories",
            &array(id::<CategoryId>())
                .min_items(1)
                .message("At least one category is required"),
        );
        let attributes = fields.optional(
            cx,
            "attributes",
            &record(
                string().min_len(1).message("Attribute name is required"),
                array(string().min_len(1).message("Attribute value is required"))
                    .min_items(1)
                    .message("At least one attribute value is required"),
            ),
        );
        let images = fields.optional(
            cx,
            "images",
            &array(url().message("Invalid image URL").map(String::from)),
        );
        let is_active = fields.with_default(cx, "is_active", &boolean(), true);
        let metadata = fields.optional(cx, "metadata", &record(string(), any()));

        Some(Product {
            name: name?,
            description: description?,
            sku: sku?,
            price: price?,
            stock_quantity: stock_quantity?,
            categories: categories?,
            attributes: attributes?,
            images: images?,
            is_active: is_active?,
            metadata: metadata?,
        })
    }
}
