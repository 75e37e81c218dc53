//! Stock keeping unit codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sku`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkuError {
    /// Shorter than [`Sku::MIN_LENGTH`].
    #[error("SKU must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// Longer than [`Sku::MAX_LENGTH`].
    #[error("SKU must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Contains something other than `A-Z` and `0-9`.
    #[error("SKU may only contain uppercase letters and digits")]
    InvalidCharacter,
}

/// A SKU: 4-16 characters, uppercase ASCII letters and digits only.
///
/// ```
/// use shelfgate_core::Sku;
///
/// assert!(Sku::parse("AB12").is_ok());
/// assert!(Sku::parse("ab12").is_err());
/// assert!(Sku::parse("A").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    /// Minimum SKU length.
    pub const MIN_LENGTH: usize = 4;
    /// Maximum SKU length.
    pub const MAX_LENGTH: usize = 16;

    /// Parse a `Sku` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is outside 4-16 or any character is not
    /// an uppercase ASCII letter or digit.
    pub fn parse(s: &str) -> Result<Self, SkuError> {
        if !s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(SkuError::InvalidCharacter);
        }
        // Only ASCII remains, so byte length equals character count.
        if s.len() < Self::MIN_LENGTH {
            return Err(SkuError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(SkuError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Sku {
    type Err = SkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Sku {
    type Error = SkuError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}
