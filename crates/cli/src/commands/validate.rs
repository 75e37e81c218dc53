//! Validate a JSON document offline with the gateway's schemas.
//!
//! Runs the same stages the HTTP routes run: optional sanitization, the
//! schema, then the business rule the route composes.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use shelfgate_core::ValidationError;
use shelfgate_core::sanitize::sanitize_fields;
use shelfgate_core::schema::business::{
    RuleViolation, validate_order_items, validate_price_range,
};
use shelfgate_core::schema::customer::CustomerSchema;
use shelfgate_core::schema::order::OrderSchema;
use shelfgate_core::schema::product::ProductSchema;
use shelfgate_core::schema::search::{RecommendationSchema, SearchQuerySchema};
use shelfgate_core::schema::{self, Schema, Violations};

/// Which document to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Product,
    Order,
    Customer,
    /// A search query, in the shape `POST /search` accepts
    Search,
    /// `{ productId, limit? }`
    Recommendation,
}

/// How to run the validation.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Top-level string fields to sanitize first.
    pub sanitize: Vec<String>,
    /// Accept textual numbers and booleans, as for query strings.
    pub coerce: bool,
}

/// The result of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The normalized document.
    Valid(Value),
    /// The error body the gateway would answer with.
    Invalid(ValidationError),
}

/// Failures of the command itself, as opposed to invalid input.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read standard input: {0}")]
    Stdin(std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read the document from `path`, or standard input when `None` or `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_input(path: Option<&Path>) -> Result<String, CommandError> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|source| CommandError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => std::io::read_to_string(std::io::stdin()).map_err(CommandError::Stdin),
    }
}

/// Validate `input` as a `kind` document.
///
/// # Errors
///
/// Returns an error only if a valid document cannot be re-serialized.
pub fn validate(kind: Kind, input: &str, options: &Options) -> Result<Outcome, CommandError> {
    let mut value: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(err) => {
            return Ok(Outcome::Invalid(
                Violations::root(format!("Malformed JSON: {err}")).into(),
            ));
        }
    };

    let changed = sanitize_fields(&mut value, &options.sanitize);
    if changed > 0 {
        debug!(changed, "Sanitized fields");
    }

    match kind {
        Kind::Product => check(&ProductSchema, &value, options.coerce, |_| Ok(())),
        Kind::Order => check(&OrderSchema, &value, options.coerce, |order| {
            validate_order_items(&order.items)
        }),
        Kind::Customer => check(&CustomerSchema, &value, options.coerce, |_| Ok(())),
        Kind::Search => check(&SearchQuerySchema, &value, options.coerce, |query| {
            validate_price_range(query.filters.min_price, query.filters.max_price)
        }),
        Kind::Recommendation => check(&RecommendationSchema, &value, options.coerce, |_| Ok(())),
    }
}

fn check<S>(
    schema: &S,
    value: &Value,
    coerce: bool,
    rule: impl FnOnce(&S::Output) -> Result<(), RuleViolation>,
) -> Result<Outcome, CommandError>
where
    S: Schema,
    S::Output: Serialize,
{
    let parsed = if coerce {
        schema::parse_coerced(schema, value)
    } else {
        schema::parse(schema, value)
    };

    let output = match parsed {
        Ok(output) => output,
        Err(violations) => return Ok(Outcome::Invalid(violations.into())),
    };
    if let Err(violation) = rule(&output) {
        return Ok(Outcome::Invalid(violation.into()));
    }
    Ok(Outcome::Valid(serde_json::to_value(&output)?))
}
