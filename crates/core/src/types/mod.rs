//! Core types for Shelfgate.
//!
//! This module provides type-safe wrappers for the primitive formats the
//! gateway accepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod sku;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::{Money, PriceError, Quantity, parse_decimal};
pub use sku::{Sku, SkuError};
pub use status::*;
