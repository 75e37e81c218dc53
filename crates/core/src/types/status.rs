//! Closed value sets accepted by the gateway.
//!
//! Each enum has a fixed wire spelling shared by serde, `Display` and
//! `FromStr`, and lists its variants through [`Enumerated`] so that schema
//! rules can report the allowed values.

use serde::{Deserialize, Serialize};

/// A closed set of string values.
pub trait Enumerated: Copy + Sized + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// The wire spelling of this variant.
    fn as_str(&self) -> &'static str;

    /// Look up a variant by its exact wire spelling.
    fn from_wire(s: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_str() == s)
    }
}

/// Error returned when a string is not one of an enum's variants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl Enumerated for $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_wire(s).ok_or_else(|| UnknownVariant {
                    kind: $kind,
                    value: s.to_owned(),
                })
            }
        }
    };
}

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
}

wire_enum!(PaymentMethod, "payment method", {
    CreditCard => "CREDIT_CARD",
    Paypal => "PAYPAL",
    BankTransfer => "BANK_TRANSFER",
});

/// How an order is shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingMethod {
    Standard,
    Express,
    Overnight,
}

wire_enum!(ShippingMethod, "shipping method", {
    Standard => "STANDARD",
    Express => "EXPRESS",
    Overnight => "OVERNIGHT",
});

/// Fields the search backend can order results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Price,
    CreatedAt,
    Name,
    Popularity,
}

wire_enum!(SortField, "sort field", {
    Price => "price",
    CreatedAt => "created_at",
    Name => "name",
    Popularity => "popularity",
});

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

wire_enum!(SortDirection, "sort direction", {
    Asc => "asc",
    Desc => "desc",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for method in PaymentMethod::VARIANTS {
            let json = serde_json::to_value(method).unwrap();
            assert_eq!(json, serde_json::Value::String(method.to_string()));
        }
        for field in SortField::VARIANTS {
            let json = serde_json::to_value(field).unwrap();
            assert_eq!(json, serde_json::Value::String(field.to_string()));
        }
        assert_eq!(
            serde_json::to_value(ShippingMethod::Overnight).unwrap(),
            "OVERNIGHT"
        );
        assert_eq!(serde_json::to_value(SortDirection::Desc).unwrap(), "desc");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("created_at".parse::<SortField>(), Ok(SortField::CreatedAt));
        assert_eq!(
            "BANK_TRANSFER".parse::<PaymentMethod>(),
            Ok(PaymentMethod::BankTransfer)
        );
        let err = "sideways".parse::<SortDirection>().unwrap_err();
        assert_eq!(err.to_string(), "invalid sort direction: sideways");
    }

    #[test]
    fn test_from_wire_is_case_sensitive() {
        assert_eq!(SortDirection::from_wire("ASC"), None);
        assert_eq!(ShippingMethod::from_wire("express"), None);
    }
}
