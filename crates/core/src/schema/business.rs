//! Business rules checked after a payload is structurally valid.
//!
//! Unlike schema violations these are not tied to a field, and checking
//! stops at the first one.

use std::collections::HashSet;

use super::order::OrderItem;
use crate::types::Money;

/// A business rule rejected a structurally valid payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("Duplicate products in order items")]
    DuplicateOrderItems,
    #[error("Minimum price cannot be greater than maximum price")]
    InvertedPriceRange,
    /// Any other rule, with its own message.
    #[error("{0}")]
    Other(String),
}

/// Every item in an order must reference a different product.
///
/// # Errors
///
/// Returns [`RuleViolation::DuplicateOrderItems`] if a product id repeats.
pub fn validate_order_items(items: &[OrderItem]) -> Result<(), RuleViolation> {
    let mut seen = HashSet::with_capacity(items.len());
    if items.iter().all(|item| seen.insert(item.product_id)) {
        Ok(())
    } else {
        Err(RuleViolation::DuplicateOrderItems)
    }
}

/// When both bounds are given, `min` must not exceed `max`.
///
/// # Errors
///
/// Returns [`RuleViolation::InvertedPriceRange`] if `min > max`.
pub fn validate_price_range(min: Option<Money>, max: Option<Money>) -> Result<(), RuleViolation> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(RuleViolation::InvertedPriceRange),
        _ => Ok(()),
    }
}
