//! Schema rules for the primitive formats in [`crate::types`].

use std::borrow::Cow;
use std::marker::PhantomData;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use url::Url;

use super::rules::{IntegerRule, NumberRule, integer, invalid_type, number};
use super::{Context, Schema};
use crate::types::{Email, Money, Phone, Quantity, Sku, TenantId};

/// A string converted with [`FromStr`], reporting one fixed message when the
/// conversion fails.
pub struct Parsed<T> {
    message: Cow<'static, str>,
    target: PhantomData<fn() -> T>,
}

impl<T> Parsed<T> {
    fn new(message: &'static str) -> Self {
        Self {
            message: Cow::Borrowed(message),
            target: PhantomData,
        }
    }

    /// Replace the failure message.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl<T> Clone for Parsed<T> {
    fn clone(&self) -> Self {
        Self {
            message: self.message.clone(),
            target: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Parsed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parsed")
            .field("message", &self.message)
            .finish()
    }
}

impl<T: FromStr> Schema for Parsed<T> {
    type Output = T;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<T> {
        let Value::String(s) = value else {
            cx.report(invalid_type("string", value));
            return None;
        };
        let parsed = s.parse().ok();
        if parsed.is_none() {
            cx.report(self.message.clone());
        }
        parsed
    }
}

/// Any UUID v4 identifier type.
#[must_use]
pub fn id<T: FromStr>() -> Parsed<T> {
    Parsed::new("Invalid UUID format")
}

#[must_use]
pub fn tenant_id() -> Parsed<TenantId> {
    Parsed::new("Invalid tenant ID format")
}

#[must_use]
pub fn email() -> Parsed<Email> {
    Parsed::new("Invalid email format")
}

#[must_use]
pub fn phone() -> Parsed<Phone> {
    Parsed::new("Invalid phone number format")
}

#[must_use]
pub fn sku() -> Parsed<Sku> {
    Parsed::new("Invalid SKU format")
}

/// An absolute URL, kept in its original spelling.
#[must_use]
pub fn url() -> Parsed<Url> {
    Parsed::new("Invalid url")
}

/// Non-negative monetary amount.
#[must_use]
pub fn price() -> impl Schema<Output = Money> + Clone {
    price_rule().try_map(Money::new, "Price must be non-negative")
}

fn price_rule() -> NumberRule {
    number()
        .min(Decimal::ZERO)
        .message("Price must be non-negative")
}

/// Non-negative whole number of units.
#[must_use]
pub fn quantity() -> impl Schema<Output = Quantity> + Clone {
    quantity_rule().try_map(
        |n| u64::try_from(n).map(Quantity::new),
        "Quantity must be non-negative",
    )
}

fn quantity_rule() -> IntegerRule {
    integer().min(0).message("Quantity must be non-negative")
}
