//! The assertion library used inside lesson bodies.
//!
//! Every check either returns `Ok(())` or a [`CheckFailure`] carrying a
//! readable message; nothing else. Lesson bodies chain checks with `?`,
//! so the first violated check ends the lesson with its message as the
//! reported failure.

use std::fmt::Debug;
use store::{StoreError, StoreResult};
use thiserror::Error;

/// A violated check. Distinct from every other error kind the runner
/// can observe, which is what lets the runner tell "the lesson's point
/// did not hold" apart from "something broke".
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct CheckFailure {
    pub message: String,
}

impl CheckFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type CheckResult = Result<(), CheckFailure>;

pub fn equal<T: Debug + PartialEq>(actual: T, expected: T) -> CheckResult {
    if actual == expected {
        Ok(())
    } else {
        Err(CheckFailure::new(format!(
            "expected {expected:?}, got {actual:?}"
        )))
    }
}

pub fn holds(condition: bool, message: &str) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(CheckFailure::new(message))
    }
}

pub fn does_not_hold(condition: bool, message: &str) -> CheckResult {
    holds(!condition, message)
}

/// Non-null check: unwraps the value so the lesson can keep using it.
pub fn found<T>(value: Option<T>, what: &str) -> Result<T, CheckFailure> {
    value.ok_or_else(|| CheckFailure::new(format!("expected {what} to be present, found none")))
}

pub fn none<T: Debug>(value: &Option<T>, what: &str) -> CheckResult {
    match value {
        None => Ok(()),
        Some(inner) => Err(CheckFailure::new(format!(
            "expected {what} to be absent, found {inner:?}"
        ))),
    }
}

pub fn contains<T: Debug + PartialEq>(items: &[T], element: &T) -> CheckResult {
    if items.contains(element) {
        Ok(())
    } else {
        Err(CheckFailure::new(format!(
            "expected collection to contain {element:?}, got {items:?}"
        )))
    }
}

pub fn empty<T: Debug>(items: &[T]) -> CheckResult {
    if items.is_empty() {
        Ok(())
    } else {
        Err(CheckFailure::new(format!(
            "expected an empty collection, got {items:?}"
        )))
    }
}

pub fn has_len<T>(items: &[T], expected: usize) -> CheckResult {
    if items.len() == expected {
        Ok(())
    } else {
        Err(CheckFailure::new(format!(
            "expected exactly {expected} elements, got {}",
            items.len()
        )))
    }
}

/// The "this operation must fail, and fail in exactly this way" check.
///
/// Passes only when the result is a constraint violation. A success or
/// any other error kind becomes a [`CheckFailure`] describing what was
/// expected against what actually happened.
pub fn rejects_with_constraint<T: Debug>(result: StoreResult<T>) -> CheckResult {
    match result {
        Err(StoreError::Constraint { .. }) => Ok(()),
        Err(other) => Err(CheckFailure::new(format!(
            "expected a constraint violation, got a different error: {other}"
        ))),
        Ok(value) => Err(CheckFailure::new(format!(
            "expected a constraint violation, but the operation succeeded with {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal() {
        assert!(equal(2, 2).is_ok());

        let failure = equal(2, 3).unwrap_err();
        assert!(failure.message.contains("expected 3"));
        assert!(failure.message.contains("got 2"));
    }

    #[test]
    fn test_holds_and_does_not_hold() {
        assert!(holds(true, "fine").is_ok());
        assert_eq!(holds(false, "nope").unwrap_err().message, "nope");
        assert!(does_not_hold(false, "fine").is_ok());
        assert!(does_not_hold(true, "nope").is_err());
    }

    #[test]
    fn test_found_and_none() {
        assert_eq!(found(Some(7), "value").unwrap(), 7);
        assert!(found::<i32>(None, "value").is_err());

        assert!(none(&None::<i32>, "value").is_ok());
        assert!(none(&Some(7), "value").is_err());
    }

    #[test]
    fn test_collection_checks() {
        let items = vec![1, 2, 3];
        assert!(contains(&items, &2).is_ok());
        assert!(contains(&items, &9).is_err());
        assert!(empty::<i32>(&[]).is_ok());
        assert!(empty(&items).is_err());
        assert!(has_len(&items, 3).is_ok());
        assert!(has_len(&items, 2).is_err());
    }

    #[test]
    fn test_rejects_with_constraint() {
        let constraint: StoreResult<()> = Err(StoreError::Constraint {
            message: "UNIQUE failed".to_string(),
        });
        assert!(rejects_with_constraint(constraint).is_ok());

        let success: StoreResult<i64> = Ok(42);
        let failure = rejects_with_constraint(success).unwrap_err();
        assert!(failure.message.contains("succeeded with 42"));

        let other: StoreResult<()> = Err(StoreError::RowNotFound {
            entity: "author",
            id: 1,
        });
        let failure = rejects_with_constraint(other).unwrap_err();
        assert!(failure.message.contains("different error"));
    }
}
