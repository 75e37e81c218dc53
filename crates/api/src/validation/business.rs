//! Business-rule stage, run on values that already passed their schema.
//!
//! A rule answers `Ok(true)` to accept, `Ok(false)` to reject with the
//! caller's default message, or `Err` to reject with its own reason
//! ([`RuleError::Violation`]) or to abort the request
//! ([`RuleError::Unexpected`]).

use std::future::Future;

use shelfgate_core::ValidationError;
use shelfgate_core::schema::business::RuleViolation;
use thiserror::Error;

use crate::error::AppError;

/// Why a rule did not accept.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The value broke the rule; reported to the client.
    #[error(transparent)]
    Violation(#[from] RuleViolation),

    /// The rule could not be evaluated.
    #[error("{0}")]
    Unexpected(String),
}

fn outcome(default_message: &str, result: Result<bool, RuleError>) -> Result<(), AppError> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::warn!(reason = default_message, "Business rule rejected request");
            Err(ValidationError::business(default_message).into())
        }
        Err(RuleError::Violation(violation)) => {
            tracing::warn!(reason = %violation, "Business rule rejected request");
            Err(violation.into())
        }
        Err(RuleError::Unexpected(detail)) => {
            Err(AppError::Internal(format!("business rule failed: {detail}")))
        }
    }
}

/// Run a synchronous rule over `value`.
///
/// # Errors
///
/// Returns a 400 [`AppError::Validation`] when the rule rejects and
/// [`AppError::Internal`] when it fails unexpectedly.
pub fn check_rule<T: ?Sized>(
    value: &T,
    default_message: &str,
    rule: impl FnOnce(&T) -> Result<bool, RuleError>,
) -> Result<(), AppError> {
    outcome(default_message, rule(value))
}

/// Run an asynchronous rule over `value`.
///
/// # Errors
///
/// Same as [`check_rule`].
pub async fn check_rule_async<'a, T, F, Fut>(
    value: &'a T,
    default_message: &str,
    rule: F,
) -> Result<(), AppError>
where
    T: ?Sized,
    F: FnOnce(&'a T) -> Fut,
    Fut: Future<Output = Result<bool, RuleError>>,
{
    outcome(default_message, rule(value).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn body(err: AppError) -> ValidationError {
        match err {
            AppError::Validation(body) => body,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts() {
        assert!(check_rule(&3, "Too small", |n| Ok(*n > 2)).is_ok());
    }

    #[test]
    fn test_false_uses_default_message() {
        let err = body(check_rule(&1, "Too small", |n| Ok(*n > 2)).unwrap_err());
        assert_eq!(err, ValidationError::business("Too small"));
    }

    #[test]
    fn test_violation_uses_its_own_message() {
        let err = body(
            check_rule(&(), "Invalid order", |_| {
                Err(RuleViolation::DuplicateOrderItems.into())
            })
            .unwrap_err(),
        );
        assert_eq!(err.errors[0].message, "Duplicate products in order items");
        assert_eq!(err.errors[0].field, None);
    }

    #[test]
    fn test_unexpected_is_internal() {
        let err = check_rule(&(), "Invalid", |_| {
            Err(RuleError::Unexpected("lookup failed".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_async_rule() {
        let names = vec!["a".to_string(), "b".to_string()];
        let ok = check_rule_async(&names, "Empty", |names| async move { Ok(!names.is_empty()) });
        assert!(ok.await.is_ok());

        let err = check_rule_async(&names, "Unused", |_| async {
            Err(RuleViolation::Other("Name already taken".to_string()).into())
        })
        .await
        .unwrap_err();
        assert_eq!(body(err).errors[0].message, "Name already taken");
    }
}
