//! Free-text cleanup applied to selected body fields before validation.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Anything that looks like a tag: `<` up to the next `>`.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Remove tag-like substrings.
///
/// ```
/// use shelfgate_core::sanitize::strip_html;
///
/// assert_eq!(strip_html("<b>Bold</b> move"), "Bold move");
/// assert_eq!(strip_html("1 < 2"), "1 < 2");
/// ```
#[must_use]
pub fn strip_html(input: &str) -> String {
    TAG_RE.replace_all(input, "").into_owned()
}

/// Strip tags, then trim surrounding whitespace.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    strip_html(input).trim().to_owned()
}

/// Sanitize the named top-level string fields of a JSON object in place.
///
/// Absent and non-string fields are left alone, as is any value that is not
/// an object. Returns the number of fields that changed.
pub fn sanitize_fields<S: AsRef<str>>(value: &mut Value, fields: &[S]) -> usize {
    let Value::Object(map) = value else {
        return 0;
    };

    let mut changed = 0;
    for field in fields {
        if let Some(Value::String(text)) = map.get_mut(field.as_ref()) {
            let clean = sanitize_text(text);
            if clean != *text {
                *text = clean;
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_strip_and_trim() {
        assert_eq!(
            sanitize_text("  <script>alert(1)</script>Pineapple <em>gold</em> "),
            "alert(1)Pineapple gold"
        );
        assert_eq!(sanitize_text("<>"), "");
        assert_eq!(sanitize_text("a <b"), "a <b");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in [
            "  <p>Hello</p>  ",
            "<<b>>x",
            "a < b > c",
            " <i> padded </i> ",
            "plain",
            "<a href='x'>link</a><",
        ] {
            let once = sanitize_text(input);
            assert_eq!(sanitize_text(&once), once, "{input:?}");
        }
    }

    #[test]
    fn test_sanitize_fields_only_named_strings() {
        let mut body = json!({
            "name": " <b>Pineapple</b> ",
            "description": 42,
            "notes": " keep <i>me</i> ",
            "nested": {"name": " <b>x</b> "},
        });
        let changed = sanitize_fields(&mut body, &["name", "description", "missing"]);
        assert_eq!(changed, 1);
        assert_eq!(
            body,
            json!({
                "name": "Pineapple",
                "description": 42,
                "notes": " keep <i>me</i> ",
                "nested": {"name": " <b>x</b> "},
            })
        );
    }

    #[test]
    fn test_non_object_untouched() {
        let mut body = json!([" <b>x</b> "]);
        assert_eq!(sanitize_fields(&mut body, &["0"]), 0);
        assert_eq!(body, json!([" <b>x</b> "]));
    }
}
