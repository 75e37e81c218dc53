//! Order payloads and the addresses they carry.

use serde::Serialize;
use serde_json::Value;

use super::primitives::{id, phone, price};
use super::rules::{any, array, integer, one_of, record, string};
use super::{Context, Metadata, Schema, object};
use crate::types::{CustomerId, Money, PaymentMethod, Phone, ProductId, Quantity, ShippingMethod};

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// ISO 3166-1 alpha-2 code.
    pub country: String,
    pub phone: Phone,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddressSchema;

impl Schema for AddressSchema {
    type Output = Address;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<Address> {
        let fields = object(value, cx)?;

        let required = |message: &'static str| string().min_len(1).message(message);
        let street = fields.required(cx, "street", &required("Street is required"));
        let city = fields.required(cx, "city", &required("City is required"));
        let state = fields.required(cx, "state", &required("State is required"));
        let postal_code = fields.required(cx, "postal_code", &required("Postal code is required"));
        let country = fields.required(
            cx,
            "country",
            &string()
                .min_len(2)
                .message("Country is required")
                .max_len(2)
                .message("Use ISO country code"),
        );
        let phone = fields.required(cx, "phone", &phone());

        Some(Address {
            street: street?,
            city: city?,
            state: state?,
            postal_code: postal_code?,
            country: country?,
            phone: phone?,
        })
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub unit_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderItemSchema;

impl Schema for OrderItemSchema {
    type Output = OrderItem;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<OrderItem> {
        let fields = object(value, cx)?;

        let product_id = fields.required(cx, "product_id", &id::<ProductId>());
        let quantity = fields.required(
            cx,
            "quantity",
            &integer()
                .positive()
                .message("Quantity must be positive")
                .map(|n| Quantity::new(n.unsigned_abs())),
        );
        let unit_price = fields.required(cx, "unit_price", &price());
        let metadata = fields.optional(cx, "metadata", &record(string(), any()));

        Some(OrderItem {
            product_id: product_id?,
            quantity: quantity?,
            unit_price: unit_price?,
            metadata: metadata?,
        })
    }
}

/// A validated order.
///
/// Product uniqueness across `items` is a business rule, checked separately
/// by [`validate_order_items`](super::business::validate_order_items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub customer_id: CustomerId,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    pub shipping_method: ShippingMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderSchema;

impl Schema for OrderSchema {
    type Output = Order;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<Order> {
        let fields = object(value, cx)?;

        let customer_id = fields.required(cx, "customer_id", &id::<CustomerId>());
        let billing_address = fields.required(cx, "billing_address", &AddressSchema);
        let shipping_address = fields.required(cx, "shipping_address", &AddressSchema);
        let items = fields.required(
            cx,
            "items",
            &array(OrderItemSchema)
                .min_items(1)
                .message("Order must contain at least one item"),
        );
        let payment_method = fields.required(cx, "payment_method", &one_of::<PaymentMethod>());
        let shipping_method = fields.required(cx, "shipping_method", &one_of::<ShippingMethod>());
        let notes = fields.optional(
            cx,
            "notes",
            &string().max_len(1000).message("Notes are too long"),
        );
        let metadata = fields.optional(cx, "metadata", &record(string(), any()));

        Some(Order {
            customer_id: customer_id?,
            billing_address: billing_address?,
            shipping_address: shipping_address?,
            items: items?,
            payment_method: payment_method?,
            shipping_method: shipping_method?,
            notes: notes?,
            metadata: metadata?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::parse;

    pub(crate) const PRODUCT_A: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
    pub(crate) const PRODUCT_B: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

    pub(crate) fn address() -> Value {
        json!({
            "street": "1 Market St",
            "city": "San Francisco",
            "state": "CA",
            "postal_code": "94105",
            "country": "US",
            "phone": "+14155550123",
        })
    }

    pub(crate) fn order() -> Value {
        json!({
            "customer_id": "a3bb189e-8bf9-4888-9912-ace4e6543002",
            "billing_address": address(),
            "shipping_address": address(),
            "items": [
                {"product_id": PRODUCT_A, "quantity": 2, "unit_price": 4.99},
                {"product_id": PRODUCT_B, "quantity": 1, "unit_price": 12},
            ],
            "payment_method": "CREDIT_CARD",
            "shipping_method": "EXPRESS",
        })
    }

    fn failures(value: &Value) -> Vec<(String, String)> {
        parse(&OrderSchema, value)
            .unwrap_err()
            .iter()
            .map(|v| (v.path().to_string(), v.message().to_owned()))
            .collect()
    }

    #[test]
    fn test_valid_order() {
        let order = parse(&OrderSchema, &order()).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity.units(), 2);
        assert_eq!(order.payment_method, PaymentMethod::CreditCard);
        assert_eq!(order.shipping_address.country, "US");

        let out = serde_json::to_value(&order).unwrap();
        assert_eq!(out["shipping_method"], json!("EXPRESS"));
        assert!(out.get("notes").is_none());
    }

    #[test]
    fn test_item_paths() {
        let mut value = order();
        value["items"][1]["quantity"] = json!(0);
        value["items"][0]["product_id"] = json!("nope");
        assert_eq!(
            failures(&value),
            vec![
                ("items.0.product_id".to_owned(), "Invalid UUID format".to_owned()),
                ("items.1.quantity".to_owned(), "Quantity must be positive".to_owned()),
            ]
        );
    }

    #[test]
    fn test_empty_items() {
        let mut value = order();
        value["items"] = json!([]);
        assert_eq!(
            failures(&value),
            vec![(
                "items".to_owned(),
                "Order must contain at least one item".to_owned()
            )]
        );
    }

    #[test]
    fn test_address_rules() {
        let mut value = order();
        value["billing_address"]["country"] = json!("USA");
        value["billing_address"]["street"] = json!("");
        value["shipping_address"]["phone"] = json!("555-0123");
        assert_eq!(
            failures(&value),
            vec![
                ("billing_address.street".to_owned(), "Street is required".to_owned()),
                ("billing_address.country".to_owned(), "Use ISO country code".to_owned()),
                (
                    "shipping_address.phone".to_owned(),
                    "Invalid phone number format".to_owned()
                ),
            ]
        );
    }

    #[test]
    fn test_enums_and_notes() {
        let mut value = order();
        value["payment_method"] = json!("CASH");
        value["notes"] = json!("n".repeat(1001));
        assert_eq!(
            failures(&value),
            vec![
                (
                    "payment_method".to_owned(),
                    "Invalid enum value. Expected 'CREDIT_CARD' | 'PAYPAL' | 'BANK_TRANSFER', received 'CASH'"
                        .to_owned()
                ),
                ("notes".to_owned(), "Notes are too long".to_owned()),
            ]
        );
    }
}
