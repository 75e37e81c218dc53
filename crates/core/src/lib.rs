//! Shelfgate Core - request validation for the catalog gateway.
//!
//! This crate turns untrusted JSON into well-typed catalog requests:
//! - `api` - the HTTP gateway runs every request body, query string and route
//!   parameter set through these schemas
//! - `cli` - validates documents offline with the same schemas
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Violations are collected, never logged, so callers decide how to
//! report them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, phones, SKUs, prices and enums
//! - [`schema`] - Schema combinators plus product, order, customer and search schemas
//! - [`report`] - The uniform `ValidationError` body
//! - [`sanitize`] - Tag stripping for free-text fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod report;
pub mod sanitize;
pub mod schema;
pub mod types;

pub use report::{FieldError, ValidationError};
pub use schema::{Schema, Violations};
pub use types::*;
