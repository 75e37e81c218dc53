//! Query-string decoding into a JSON object.
//!
//! - `a=1` becomes `{"a": "1"}`
//! - `a=1&a=2` becomes `{"a": ["1", "2"]}`
//! - `a[]=1` always becomes an array
//! - `attributes[color]=red` becomes `{"attributes": {"color": "red"}}`
//! - nesting stops after five bracket levels
//!
//! Values stay strings; schemas coerce them.

use std::borrow::Cow;

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Deepest bracket nesting decoded; deeper brackets stay in one literal key.
const MAX_DEPTH: usize = 5;

/// Decode a raw (still percent-encoded) query string.
#[must_use]
pub fn decode(query: &str) -> Value {
    let mut root = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        match split_key(&key) {
            Some((base, segments)) => insert(&mut root, base, &segments, value.into_owned()),
            None => insert(&mut root, &key, &[], value.into_owned()),
        }
    }
    Value::Object(root)
}

/// Split `a[b][c]` into `("a", ["b", "c"])`. `None` for plain or malformed keys.
///
/// Past [`MAX_DEPTH`] segments the remainder is kept whole, brackets included:
/// `a[1][2][3][4][5][6][7]` ends in the segment `[6][7]`.
fn split_key(key: &str) -> Option<(&str, Vec<Cow<'_, str>>)> {
    let (base, rest) = key.split_once('[')?;
    if base.is_empty() {
        return None;
    }
    let inner = rest.strip_suffix(']')?;
    let mut parts = inner.splitn(MAX_DEPTH + 1, "][");
    let mut segments: Vec<Cow<'_, str>> =
        parts.by_ref().take(MAX_DEPTH).map(Cow::Borrowed).collect();
    if let Some(remainder) = parts.next() {
        segments.push(Cow::Owned(format!("[{remainder}]")));
    }
    Some((base, segments))
}

fn insert(target: &mut Map<String, Value>, key: &str, segments: &[Cow<'_, str>], value: String) {
    match segments.split_first() {
        None => append(target, key, Value::String(value)),
        Some((first, _)) if first.is_empty() => {
            let slot = target
                .entry(key.to_owned())
                .or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => items.push(Value::String(value)),
                other => {
                    let previous = other.take();
                    *other = Value::Array(vec![previous, Value::String(value)]);
                }
            }
        }
        Some((next, rest)) => {
            let slot = target
                .entry(key.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(nested) = slot {
                insert(nested, next, rest, value);
            }
        }
    }
}

/// Set `key`, turning a repeated key into an array.
fn append(target: &mut Map<String, Value>, key: &str, value: Value) {
    match target.get_mut(key) {
        None => {
            target.insert(key.to_owned(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, value]);
        }
    }
}
