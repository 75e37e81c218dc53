//! E.164-style phone numbers.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Optional `+`, a non-zero leading digit, 2-15 digits in total.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not an E.164-style number.
    #[error("phone number must be 2-15 digits with an optional leading +, not starting with 0")]
    InvalidFormat,
}

/// A phone number in E.164 style (`+14155550123`, `4155550123`).
///
/// No separators are accepted; callers that want to be lenient about
/// formatting must strip them before parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not E.164-style.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !PHONE_RE.is_match(s) {
            return Err(PhoneError::InvalidFormat);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the digits without the optional leading `+`.
    #[must_use]
    pub fn digits(&self) -> &str {
        self.0.trim_start_matches('+')
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("+14155550123").is_ok());
        assert!(Phone::parse("4155550123").is_ok());
        assert!(Phone::parse("12").is_ok());
        assert!(Phone::parse("+123456789012345").is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("1"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("+0123456"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("1234567890123456"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("(415) 555-0123"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("++14155550123"), Err(PhoneError::InvalidFormat));
    }

    #[test]
    fn test_digits() {
        assert_eq!(Phone::parse("+14155550123").unwrap().digits(), "14155550123");
        assert_eq!(Phone::parse("4155550123").unwrap().digits(), "4155550123");
    }
}
