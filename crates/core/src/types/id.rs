//! Newtype IDs for type-safe entity references.
//!
//! Every identifier crossing the gateway is a UUID v4 in its textual
//! 8-4-4-4-12 form. Use the `define_id!` macro to create wrappers that prevent
//! accidentally mixing IDs from different entity types.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

/// UUID v4: version nibble `4`, variant nibble in `{8, 9, a, b}`, any case.
static UUID_V4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("Invalid regex")
});

/// Errors that can occur when parsing an identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input is not a textual UUID v4.
    #[error("id must be a UUID v4 (8-4-4-4-12 hex groups)")]
    NotUuidV4,
}

/// Parse the textual form of a UUID v4.
///
/// Hyphens and group lengths are mandatory; braced, URN and simple forms
/// accepted by [`Uuid::parse_str`] are rejected.
///
/// # Errors
///
/// Returns [`IdError`] if the input is empty or not a UUID v4.
pub fn parse_uuid_v4(s: &str) -> Result<Uuid, IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }
    if !UUID_V4_RE.is_match(s) {
        return Err(IdError::NotUuidV4);
    }
    Uuid::parse_str(s).map_err(|_| IdError::NotUuidV4)
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` as the hyphenated string form
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Ord`, `Hash`
/// - `parse()` enforcing the UUID v4 textual form, plus `FromStr`
/// - `as_uuid()` and `From<$name> for Uuid`
///
/// # Example
///
/// ```rust
/// # use shelfgate_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ShipmentId);
///
/// let id = WarehouseId::parse("0f8fad5b-d9cb-469f-a165-70867728950e").unwrap();
/// assert_eq!(id.to_string(), "0f8fad5b-d9cb-469f-a165-70867728950e");
///
/// // These are different types, so this won't compile:
/// // let _: ShipmentId = id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an ID from its textual UUID v4 form.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not a UUID v4.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::IdError> {
                $crate::types::id::parse_uuid_v4(s).map(Self)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::types::IdError;

            fn try_from(s: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(TenantId);
define_id!(UserId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(CustomerId);
