//! Customer payloads.

use serde::Serialize;
use serde_json::Value;

use super::order::{Address, AddressSchema};
use super::primitives::{email, phone};
use super::rules::{any, record, string};
use super::{Context, Metadata, Schema, object};
use crate::types::{Email, Phone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerSchema;

impl Schema for CustomerSchema {
    type Output = Customer;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<Customer> {
        let fields = object(value, cx)?;

        let email = fields.required(cx, "email", &email());
        let first_name = fields.required(
            cx,
            "first_name",
            &string().min_len(1).message("First name is required"),
        );
        let last_name = fields.required(
            cx,
            "last_name",
            &string().min_len(1).message("Last name is required"),
        );
        let phone = fields.optional(cx, "phone", &phone());
        let default_address = fields.optional(cx, "default_address", &AddressSchema);
        let metadata = fields.optional(cx, "metadata", &record(string(), any()));

        Some(Customer {
            email: email?,
            first_name: first_name?,
            last_name: last_name?,
            phone: phone?,
            default_address: default_address?,
            metadata: metadata?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::order::tests::address;
    use crate::schema::parse;

    #[test]
    fn test_valid_customer() {
        let customer = parse(
            &CustomerSchema,
            &json!({
                "email": "ada@example.com",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "default_address": address(),
            }),
        )
        .unwrap();
        assert_eq!(customer.email.as_str(), "ada@example.com");
        assert!(customer.phone.is_none());
        assert_eq!(customer.default_address.unwrap().city, "San Francisco");
    }

    #[test]
    fn test_invalid_customer() {
        let err = parse(
            &CustomerSchema,
            &json!({
                "email": "ada-at-example.com",
                "first_name": "",
                "last_name": "Lovelace",
                "phone": "12a",
                "default_address": {"street": "1 Market St"},
            }),
        )
        .unwrap_err();
        let found: Vec<_> = err
            .iter()
            .map(|v| (v.path().to_string(), v.message().to_owned()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("email".to_owned(), "Invalid email format".to_owned()),
                ("first_name".to_owned(), "First name is required".to_owned()),
                ("phone".to_owned(), "Invalid phone number format".to_owned()),
                ("default_address.city".to_owned(), "Required".to_owned()),
                ("default_address.state".to_owned(), "Required".to_owned()),
                ("default_address.postal_code".to_owned(), "Required".to_owned()),
                ("default_address.country".to_owned(), "Required".to_owned()),
                ("default_address.phone".to_owned(), "Required".to_owned()),
            ]
        );
    }
}
