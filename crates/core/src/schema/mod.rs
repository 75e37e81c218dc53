//! Schema combinators over untyped JSON.
//!
//! A [`Schema`] turns a [`serde_json::Value`] into a typed value, recording
//! every violation it finds in a [`Context`] instead of stopping at the first
//! one. Entity schemas are plain structs that read an object with
//! [`object`] and check each field with a rule from [`rules`] or
//! [`primitives`].
//!
//! ```
//! use serde_json::json;
//! use shelfgate_core::schema::{self, Context, Schema, object, rules::string};
//!
//! struct Greeting;
//!
//! impl Schema for Greeting {
//!     type Output = String;
//!
//!     fn check(&self, value: &serde_json::Value, cx: &mut Context) -> Option<String> {
//!         let fields = object(value, cx)?;
//!         fields.required(cx, "name", &string().min_len(1).message("Name is required"))
//!     }
//! }
//!
//! assert_eq!(schema::parse(&Greeting, &json!({"name": "Ada"})).unwrap(), "Ada");
//!
//! let err = schema::parse(&Greeting, &json!({"name": ""})).unwrap_err();
//! assert_eq!(err.iter().next().unwrap().message(), "Name is required");
//! ```

pub mod business;
pub mod customer;
pub mod order;
pub mod path;
pub mod primitives;
pub mod product;
pub mod rules;
pub mod search;

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub use path::{Path, PathSegment};

/// Open key-value map attached to entities.
pub type Metadata = BTreeMap<String, Value>;

/// A rule that reads a JSON value into a typed value.
pub trait Schema {
    /// The typed value produced on success.
    type Output;

    /// Check `value`, reporting violations into `cx`.
    ///
    /// Returns `None` when the value is unusable. A `Some` result can still
    /// coexist with violations reported elsewhere in the same document.
    fn check(&self, value: &Value, cx: &mut Context) -> Option<Self::Output>;

    /// Transform the output of a successful check.
    fn map<F, U>(self, f: F) -> Mapped<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Mapped { inner: self, f }
    }

    /// Transform the output with a fallible conversion, reporting `message`
    /// at the current path when it fails.
    fn try_map<F, U, E>(self, f: F, message: impl Into<Cow<'static, str>>) -> TryMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Result<U, E>,
    {
        TryMap {
            inner: self,
            f,
            message: message.into(),
        }
    }
}

/// Schema returned by [`Schema::map`].
#[derive(Debug, Clone)]
pub struct Mapped<S, F> {
    inner: S,
    f: F,
}

impl<S, F, U> Schema for Mapped<S, F>
where
    S: Schema,
    F: Fn(S::Output) -> U,
{
    type Output = U;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<U> {
        self.inner.check(value, cx).map(&self.f)
    }
}

/// Schema returned by [`Schema::try_map`].
#[derive(Debug, Clone)]
pub struct TryMap<S, F> {
    inner: S,
    f: F,
    message: Cow<'static, str>,
}

impl<S, F, U, E> Schema for TryMap<S, F>
where
    S: Schema,
    F: Fn(S::Output) -> Result<U, E>,
{
    type Output = U;

    fn check(&self, value: &Value, cx: &mut Context) -> Option<U> {
        let out = self.inner.check(value, cx)?;
        match (self.f)(out) {
            Ok(mapped) => Some(mapped),
            Err(_) => {
                cx.report(self.message.clone());
                None
            }
        }
    }
}

/// A single violation: where it happened and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    path: Path,
    message: String,
}

impl Violation {
    /// Location of the offending value.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Human-readable reason.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every violation found while parsing one document, in discovery order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{} validation error(s)", .0.len())]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for violations returned by [`parse`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A single violation at the document root.
    #[must_use]
    pub fn root(message: impl Into<String>) -> Self {
        Self(vec![Violation {
            path: Path::root(),
            message: message.into(),
        }])
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// State threaded through a parse: current path, violations so far, and
/// whether textual input should be coerced.
#[derive(Debug, Default)]
pub struct Context {
    path: Vec<PathSegment>,
    violations: Vec<Violation>,
    coerce: bool,
}

impl Context {
    /// A context for JSON bodies, where types must match exactly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context for query strings and route parameters.
    ///
    /// Numeric and boolean rules accept their textual forms and list rules
    /// accept a lone scalar as a one-element list.
    #[must_use]
    pub fn coercing() -> Self {
        Self {
            coerce: true,
            ..Self::default()
        }
    }

    /// Whether textual input should be coerced.
    #[must_use]
    pub const fn is_coercing(&self) -> bool {
        self.coerce
    }

    /// Record a violation at the current path.
    pub fn report(&mut self, message: impl Into<String>) {
        self.violations.push(Violation {
            path: Path::from(self.path.clone()),
            message: message.into(),
        });
    }

    /// Run `f` one level deeper in the document.
    pub fn nested<T>(
        &mut self,
        segment: impl Into<PathSegment>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.path.push(segment.into());
        let out = f(self);
        self.path.pop();
        out
    }

    /// Number of violations recorded so far.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    fn finish<T>(mut self, out: Option<T>) -> Result<T, Violations> {
        match out {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => {
                if self.violations.is_empty() {
                    self.path.clear();
                    self.report("Invalid input");
                }
                Err(Violations(self.violations))
            }
        }
    }
}

/// Parse a JSON body: types must match exactly.
///
/// # Errors
///
/// Returns every violation found if the value does not satisfy `schema`.
pub fn parse<S: Schema + ?Sized>(schema: &S, value: &Value) -> Result<S::Output, Violations> {
    let mut cx = Context::new();
    let out = schema.check(value, &mut cx);
    cx.finish(out)
}

/// Parse decoded query-string or route-parameter input, coercing text.
///
/// # Errors
///
/// Returns every violation found if the value does not satisfy `schema`.
pub fn parse_coerced<S: Schema + ?Sized>(
    schema: &S,
    value: &Value,
) -> Result<S::Output, Violations> {
    let mut cx = Context::coercing();
    let out = schema.check(value, &mut cx);
    cx.finish(out)
}

/// Read `value` as an object, reporting a type violation otherwise.
pub fn object<'v>(value: &'v Value, cx: &mut Context) -> Option<Fields<'v>> {
    if let Value::Object(map) = value {
        Some(Fields { map })
    } else {
        cx.report(rules::invalid_type("object", value));
        None
    }
}

/// Field reader over a JSON object.
///
/// Every accessor checks its field even when earlier ones failed, so all
/// violations of a document are collected in one pass.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'v> {
    map: &'v Map<String, Value>,
}

impl Fields<'_> {
    /// A field that must be present.
    pub fn required<S: Schema + ?Sized>(
        &self,
        cx: &mut Context,
        key: &str,
        schema: &S,
    ) -> Option<S::Output> {
        cx.nested(key, |cx| {
            if let Some(value) = self.map.get(key) {
                schema.check(value, cx)
            } else {
                cx.report("Required");
                None
            }
        })
    }

    /// A field that may be absent. `null` counts as present.
    ///
    /// The outer `Option` is `None` when the field is present but invalid.
    pub fn optional<S: Schema + ?Sized>(
        &self,
        cx: &mut Context,
        key: &str,
        schema: &S,
    ) -> Option<Option<S::Output>> {
        match self.map.get(key) {
            Some(value) => cx.nested(key, |cx| schema.check(value, cx)).map(Some),
            None => Some(None),
        }
    }

    /// A field that takes `default` when absent.
    pub fn with_default<S: Schema + ?Sized>(
        &self,
        cx: &mut Context,
        key: &str,
        schema: &S,
        default: S::Output,
    ) -> Option<S::Output> {
        self.optional(cx, key, schema)
            .map(|value| value.unwrap_or(default))
    }
}
