//! Request validation stages.
//!
//! 1. **Extractors** - [`ValidBody`], [`ValidQuery`] and [`ValidParams`] run a
//!    schema over one input location
//! 2. **Business rules** - [`check_rule`] and [`check_rule_async`] run after
//!    the schema, on the typed value
//!
//! Sanitization runs earlier, as middleware; see
//! [`sanitize_middleware`](crate::middleware::sanitize_middleware).

pub mod business;
pub mod extractors;
pub mod query_string;

pub use business::{RuleError, check_rule, check_rule_async};
pub use extractors::{ValidBody, ValidParams, ValidQuery};
