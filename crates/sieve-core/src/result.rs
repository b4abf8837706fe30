//! # Validation Result
//!
//! Every schema returns a [`ValidationResult`]: exactly one value on success,
//! one or more issues on failure, never both.

use crate::error::ParseError;
use crate::issue::{Issue, PathSegment};

/// Outcome of validating one input.
///
/// # Invariants
///
/// - `Success` carries no issues.
/// - `Failure` carries at least one issue and no value.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ValidationResult<T> {
    /// The input produced a value.
    Success(T),
    /// The input was rejected.
    Failure(Vec<Issue>),
}

impl<T> ValidationResult<T> {
    /// Fail with a single issue.
    pub fn fail(issue: Issue) -> Self {
        ValidationResult::Failure(vec![issue])
    }

    /// Succeed with `value` when `issues` is empty, otherwise fail with them.
    ///
    /// Used by containers that aggregate sibling issues before deciding.
    pub fn from_issues(issues: Vec<Issue>, value: impl FnOnce() -> T) -> Self {
        if issues.is_empty() {
            ValidationResult::Success(value())
        } else {
            ValidationResult::Failure(issues)
        }
    }

    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success(_))
    }

    /// Returns true for `Failure`.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The value, if successful.
    pub fn value(&self) -> Option<&T> {
        match self {
            ValidationResult::Success(v) => Some(v),
            ValidationResult::Failure(_) => None,
        }
    }

    /// Consume into the value, if successful.
    pub fn into_value(self) -> Option<T> {
        match self {
            ValidationResult::Success(v) => Some(v),
            ValidationResult::Failure(_) => None,
        }
    }

    /// The issues; empty on success.
    pub fn issues(&self) -> &[Issue] {
        match self {
            ValidationResult::Success(_) => &[],
            ValidationResult::Failure(issues) => issues,
        }
    }

    /// Path-tagged messages, in order.
    pub fn error_messages(&self) -> Vec<String> {
        self.issues().iter().map(ToString::to_string).collect()
    }

    /// Map the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        match self {
            ValidationResult::Success(v) => ValidationResult::Success(f(v)),
            ValidationResult::Failure(issues) => ValidationResult::Failure(issues),
        }
    }

    /// Chain a further validation step on success.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> ValidationResult<U>) -> ValidationResult<U> {
        match self {
            ValidationResult::Success(v) => f(v),
            ValidationResult::Failure(issues) => ValidationResult::Failure(issues),
        }
    }

    /// Prefix every issue's path with `segment`.
    pub fn at(self, segment: PathSegment) -> Self {
        match self {
            ValidationResult::Success(v) => ValidationResult::Success(v),
            ValidationResult::Failure(issues) => ValidationResult::Failure(
                issues.into_iter().map(|i| i.at(segment.clone())).collect(),
            ),
        }
    }

    /// Convert into a `Result` carrying the aggregate [`ParseError`].
    pub fn into_result(self) -> Result<T, ParseError> {
        match self {
            ValidationResult::Success(v) => Ok(v),
            ValidationResult::Failure(issues) => Err(ParseError::new(issues)),
        }
    }
}

impl<T> From<ValidationResult<T>> for Result<T, ParseError> {
    fn from(result: ValidationResult<T>) -> Self {
        result.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;

    #[test]
    fn test_from_issues_success_when_empty() {
        let r = ValidationResult::from_issues(Vec::new(), || 5);
        assert_eq!(r, ValidationResult::Success(5));
        assert!(r.issues().is_empty());
    }

    #[test]
    fn test_from_issues_failure_drops_value() {
        let r = ValidationResult::from_issues(vec![Issue::missing_field()], || 5);
        assert!(r.is_failure());
        assert_eq!(r.value(), None);
        assert_eq!(r.issues().len(), 1);
    }

    #[test]
    fn test_at_prefixes_every_issue() {
        let r: ValidationResult<()> = ValidationResult::Failure(vec![
            Issue::missing_field(),
            Issue::null_not_allowed(),
        ]);
        let r = r.at(PathSegment::Index(2));
        assert_eq!(
            r.error_messages(),
            vec!["[2]: missing required field", "[2]: null is not allowed"]
        );
    }

    #[test]
    fn test_into_result_carries_issues() {
        let r: ValidationResult<i64> = ValidationResult::fail(Issue::new(
            IssueKind::ConstraintViolation,
            "too small",
        ));
        let err = r.into_result().unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].kind(), IssueKind::ConstraintViolation);
    }

    #[test]
    fn test_and_then_short_circuits() {
        let r: ValidationResult<i64> = ValidationResult::fail(Issue::missing_field());
        let chained = r.and_then(|v| ValidationResult::Success(v + 1));
        assert!(chained.is_failure());
        let ok = ValidationResult::Success(1).and_then(|v| ValidationResult::Success(v + 1));
        assert_eq!(ok.into_value(), Some(2));
    }
}
