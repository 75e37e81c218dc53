//! Rule builders for JSON scalars, lists and maps.
//!
//! Bounds are added with builder methods; each bound carries a default
//! message which [`message`](StringRule::message) replaces for the bound
//! added last:
//!
//! ```
//! use shelfgate_core::schema::rules::string;
//!
//! let name = string()
//!     .min_len(1)
//!     .message("Name is required")
//!     .max_len(200)
//!     .message("Name is too long");
//! # let _ = name;
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use super::{Context, Schema};
use crate::types::{Enumerated, parse_decimal};

/// JSON type name of `value` as it appears in type violations.
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `Expected <expected>, received <actual>`.
#[must_use]
pub fn invalid_type(expected: &str, value: &Value) -> String {
    format!("Expected {expected}, received {}", type_name(value))
}

#[derive(Debug, Clone, Copy)]
enum Bound<T> {
    Min(T),
    Max(T),
    Above(T),
}

impl<T: PartialOrd> Bound<T> {
    fn fails(&self, value: &T) -> bool {
        match self {
            Self::Min(min) => value < min,
            Self::Max(max) => value > max,
            Self::Above(floor) => value <= floor,
        }
    }
}

#[derive(Debug, Clone)]
struct Checks<T>(Vec<(Bound<T>, Cow<'static, str>)>);

impl<T> Default for Checks<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: PartialOrd> Checks<T> {
    fn push(&mut self, bound: Bound<T>, message: String) {
        self.0.push((bound, Cow::Owned(message)));
    }

    fn relabel(&mut self, message: Cow<'static, str>) {
        if let Some((_, last)) = self.0.last_mut() {
            *last = message;
        }
    }

    /// Report every failing bound; true if none failed.
    fn enforce(&self, cx: &mut Context, value: &T) -> bool {
        let mut ok = true;
        for (bound, message) in &self.0 {
            if bound.fails(value) {
                cx.report(message.clone());
                ok = false;
            }
        }
        ok
    }
}

// =============================================================================
// Strings
// =============================================================================

/// String rule with optional length bounds, counted in characters.
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    checks: Checks<usize>,
}

/// Any JSON string.
#[must_use]
pub fn string() -> StringRule {
    StringRule::default()
}

impl StringRule {
    #[must_use]
    pub fn min_len(mut self, n: usize) -> Self {
        self.checks.push(
            Bound::Min(n),
            format!("String must contain at least {n} character(s)"),
        );
        self
    }

    #[must_use]
    pub fn max_len(mut self, n: usize) -> Self {
        self.checks.push(
            Bound::Max(n),
            format!("String must contain at most {n} character(s)"),
        );
        self
    }

    /// Replace the message of the bound added last.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.checks.relabel(message.into());
        self
    }
}

impl Schema for StringRule {
    type Output = String;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<String> {
        let Value::String(s) = value else {
            cx.report(invalid_type("string", value));
            return None;
        };
        self.checks
            .enforce(cx, &s.chars().count())
            .then(|| s.clone())
    }
}

// =============================================================================
// Numbers
// =============================================================================

fn read_decimal(value: &Value, cx: &mut Context) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let parsed = parse_decimal(&n.to_string());
            if parsed.is_err() {
                cx.report("Number is out of range");
            }
            parsed.ok()
        }
        Value::String(s) if cx.is_coercing() => {
            let parsed = parse_decimal(s);
            if parsed.is_err() {
                cx.report(invalid_type("number", value));
            }
            parsed.ok()
        }
        _ => {
            cx.report(invalid_type("number", value));
            None
        }
    }
}

/// Decimal number rule.
#[derive(Debug, Clone, Default)]
pub struct NumberRule {
    checks: Checks<Decimal>,
}

/// Any JSON number, read as a [`Decimal`].
#[must_use]
pub fn number() -> NumberRule {
    NumberRule::default()
}

impl NumberRule {
    #[must_use]
    pub fn min(mut self, n: Decimal) -> Self {
        self.checks.push(
            Bound::Min(n),
            format!("Number must be greater than or equal to {n}"),
        );
        self
    }

    #[must_use]
    pub fn max(mut self, n: Decimal) -> Self {
        self.checks.push(
            Bound::Max(n),
            format!("Number must be less than or equal to {n}"),
        );
        self
    }

    #[must_use]
    pub fn positive(mut self) -> Self {
        self.checks.push(
            Bound::Above(Decimal::ZERO),
            "Number must be greater than 0".to_owned(),
        );
        self
    }

    /// Replace the message of the bound added last.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.checks.relabel(message.into());
        self
    }
}

impl Schema for NumberRule {
    type Output = Decimal;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<Decimal> {
        let n = read_decimal(value, cx)?;
        self.checks.enforce(cx, &n).then_some(n)
    }
}

/// Whole number rule.
#[derive(Debug, Clone, Default)]
pub struct IntegerRule {
    checks: Checks<i64>,
}

/// A JSON number without a fractional part.
#[must_use]
pub fn integer() -> IntegerRule {
    IntegerRule::default()
}

impl IntegerRule {
    #[must_use]
    pub fn min(mut self, n: i64) -> Self {
        self.checks.push(
            Bound::Min(n),
            format!("Number must be greater than or equal to {n}"),
        );
        self
    }

    #[must_use]
    pub fn max(mut self, n: i64) -> Self {
        self.checks.push(
            Bound::Max(n),
            format!("Number must be less than or equal to {n}"),
        );
        self
    }

    #[must_use]
    pub fn positive(mut self) -> Self {
        self.checks
            .push(Bound::Above(0), "Number must be greater than 0".to_owned());
        self
    }

    /// Replace the message of the bound added last.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.checks.relabel(message.into());
        self
    }
}

impl Schema for IntegerRule {
    type Output = i64;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<i64> {
        let n = read_decimal(value, cx)?;
        if !n.fract().is_zero() {
            cx.report("Expected integer, received float");
            return None;
        }
        let Some(n) = n.to_i64() else {
            cx.report("Number is out of range");
            return None;
        };
        self.checks.enforce(cx, &n).then_some(n)
    }
}

// =============================================================================
// Booleans
// =============================================================================

/// Boolean rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRule;

/// A JSON boolean; `true`/`false`/`1`/`0` when coercing.
#[must_use]
pub const fn boolean() -> BooleanRule {
    BooleanRule
}

impl Schema for BooleanRule {
    type Output = bool;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if cx.is_coercing() => match s.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => {
                    cx.report(invalid_type("boolean", value));
                    None
                }
            },
            _ => {
                cx.report(invalid_type("boolean", value));
                None
            }
        }
    }
}

// =============================================================================
// Collections
// =============================================================================

/// List rule; every element is checked against the item schema.
#[derive(Debug, Clone)]
pub struct ArrayRule<S> {
    item: S,
    checks: Checks<usize>,
}

/// A JSON array whose elements satisfy `item`.
pub fn array<S: Schema>(item: S) -> ArrayRule<S> {
    ArrayRule {
        item,
        checks: Checks::default(),
    }
}

impl<S> ArrayRule<S> {
    #[must_use]
    pub fn min_items(mut self, n: usize) -> Self {
        self.checks.push(
            Bound::Min(n),
            format!("Array must contain at least {n} element(s)"),
        );
        self
    }

    #[must_use]
    pub fn max_items(mut self, n: usize) -> Self {
        self.checks.push(
            Bound::Max(n),
            format!("Array must contain at most {n} element(s)"),
        );
        self
    }

    /// Replace the message of the bound added last.
    #[must_use]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.checks.relabel(message.into());
        self
    }
}

impl<S: Schema> Schema for ArrayRule<S> {
    type Output = Vec<S::Output>;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<Self::Output> {
        let items = match value {
            Value::Array(items) => items.as_slice(),
            Value::Bool(_) | Value::Number(_) | Value::String(_) if cx.is_coercing() => {
                std::slice::from_ref(value)
            }
            _ => {
                cx.report(invalid_type("array", value));
                return None;
            }
        };

        let mut ok = self.checks.enforce(cx, &items.len());
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match cx.nested(i, |cx| self.item.check(item, cx)) {
                Some(parsed) => out.push(parsed),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }
}

/// Map rule; keys and values are checked separately, both reported at the
/// entry's key.
#[derive(Debug, Clone)]
pub struct RecordRule<K, V> {
    key: K,
    value: V,
}

/// A JSON object read as an ordered map.
pub fn record<K, V>(key: K, value: V) -> RecordRule<K, V>
where
    K: Schema,
    K::Output: Ord,
    V: Schema,
{
    RecordRule { key, value }
}

impl<K, V> Schema for RecordRule<K, V>
where
    K: Schema,
    K::Output: Ord,
    V: Schema,
{
    type Output = BTreeMap<K::Output, V::Output>;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<Self::Output> {
        let Value::Object(map) = value else {
            cx.report(invalid_type("object", value));
            return None;
        };

        let mut ok = true;
        let mut out = BTreeMap::new();
        for (name, entry) in map {
            let (key, parsed) = cx.nested(name.as_str(), |cx| {
                let key = self.key.check(&Value::String(name.clone()), cx);
                (key, self.value.check(entry, cx))
            });
            match (key, parsed) {
                (Some(key), Some(parsed)) => {
                    out.insert(key, parsed);
                }
                _ => ok = false,
            }
        }
        ok.then_some(out)
    }
}

// =============================================================================
// Enums and passthrough
// =============================================================================

/// Rule accepting exactly the wire spellings of `E`.
pub struct OneOf<E>(PhantomData<fn() -> E>);

impl<E> std::fmt::Debug for OneOf<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OneOf")
    }
}

impl<E> Clone for OneOf<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for OneOf<E> {}

impl<E> Default for OneOf<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

/// One of the variants of `E`, matched case-sensitively.
#[must_use]
pub fn one_of<E: Enumerated>() -> OneOf<E> {
    OneOf::default()
}

fn expected_variants<E: Enumerated>() -> String {
    E::VARIANTS
        .iter()
        .map(|v| format!("'{}'", v.as_str()))
        .collect::<Vec<_>>()
        .join(" | ")
}

impl<E: Enumerated> Schema for OneOf<E> {
    type Output = E;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<E> {
        let Value::String(s) = value else {
            cx.report(format!(
                "Expected {}, received {}",
                expected_variants::<E>(),
                type_name(value)
            ));
            return None;
        };
        let variant = E::from_wire(s);
        if variant.is_none() {
            cx.report(format!(
                "Invalid enum value. Expected {}, received '{s}'",
                expected_variants::<E>()
            ));
        }
        variant
    }
}

/// Passthrough rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyRule;

/// Any JSON value, unchanged.
#[must_use]
pub const fn any() -> AnyRule {
    AnyRule
}

impl Schema for AnyRule {
    type Output = Value;

    fn check(&self, value: &Value, _cx: &mut Context) -> Option<Value> {
        Some(value.clone())
    }
}
