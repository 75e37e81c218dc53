//! The uniform validation error body.
//!
//! ```json
//! {
//!   "message": "Validation failed",
//!   "errors": [
//!     {"field": "items.2.quantity", "message": "Quantity must be positive"}
//!   ]
//! }
//! ```
//!
//! Business-rule failures use the same shape without `field`.

use serde::{Deserialize, Serialize};

use crate::schema::Violations;
use crate::schema::business::RuleViolation;

/// Top-level message of every validation failure.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// One entry of [`ValidationError::errors`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending value; `""` for the document root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// A rejected request, ready to be serialized as a 400 body.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// A business-rule failure with no field.
    #[must_use]
    pub fn business(message: impl Into<String>) -> Self {
        Self {
            message: VALIDATION_FAILED.to_owned(),
            errors: vec![FieldError {
                field: None,
                message: message.into(),
            }],
        }
    }
}

impl From<Violations> for ValidationError {
    fn from(violations: Violations) -> Self {
        Self {
            message: VALIDATION_FAILED.to_owned(),
            errors: violations
                .into_iter()
                .map(|v| FieldError {
                    field: Some(v.path().to_string()),
                    message: v.message().to_owned(),
                })
                .collect(),
        }
    }
}

impl From<RuleViolation> for ValidationError {
    fn from(violation: RuleViolation) -> Self {
        Self::business(violation.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::product::ProductSchema;
    use crate::schema::{Violations, parse};

    #[test]
    fn test_structural_shape() {
        let violations = parse(
            &ProductSchema,
            &json!({
                "name": "",
                "sku": "AB12",
                "price": 1,
                "stock_quantity": 1,
                "categories": ["0f8fad5b-d9cb-469f-a165-70867728950e"],
                "images": ["nope"],
            }),
        )
        .unwrap_err();
        let body = serde_json::to_value(ValidationError::from(violations)).unwrap();
        assert_eq!(
            body,
            json!({
                "message": "Validation failed",
                "errors": [
                    {"field": "name", "message": "Name is required"},
                    {"field": "images.0", "message": "Invalid image URL"},
                ]
            })
        );
    }

    #[test]
    fn test_root_field_is_empty_string() {
        let body =
            serde_json::to_value(ValidationError::from(Violations::root("Malformed JSON"))).unwrap();
        assert_eq!(body["errors"][0], json!({"field": "", "message": "Malformed JSON"}));
    }

    #[test]
    fn test_business_shape_has_no_field() {
        let body = serde_json::to_value(ValidationError::from(
            RuleViolation::DuplicateOrderItems,
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "message": "Validation failed",
                "errors": [{"message": "Duplicate products in order items"}]
            })
        );
    }

    #[test]
    fn test_deserializes_both_shapes() {
        let parsed: ValidationError = serde_json::from_value(json!({
            "message": "Validation failed",
            "errors": [{"message": "x"}, {"field": "a.b", "message": "y"}]
        }))
        .unwrap();
        assert_eq!(parsed.errors[0].field, None);
        assert_eq!(parsed.errors[1].field.as_deref(), Some("a.b"));
    }
}
