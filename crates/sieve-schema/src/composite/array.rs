//! Array and set schemas.

use std::collections::HashSet;
use std::hash::Hash;

use sieve_core::{PathSegment, ValidationResult, Value};

use super::expect_sequence;
use crate::bounds::LengthBounds;
use crate::context::ParseContext;
use crate::schema::Schema;

/// Validate every element, collecting outputs and `[i]`-tagged issues.
fn parse_elements<S: Schema>(
    element: &S,
    items: &[Value],
    ctx: &mut ParseContext<'_>,
) -> ValidationResult<Vec<S::Output>> {
    let mut values = Vec::with_capacity(items.len());
    let mut issues = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match element.parse_in(item, ctx) {
            ValidationResult::Success(v) => values.push(v),
            ValidationResult::Failure(child) => issues.extend(
                child
                    .into_iter()
                    .map(|issue| issue.at(PathSegment::Index(i))),
            ),
        }
    }
    ValidationResult::from_issues(issues, || values)
}

macro_rules! length_builders {
    () => {
        /// Require exactly `n` items.
        pub fn length(mut self, n: usize) -> Self {
            self.bounds.exact = Some(n);
            self
        }

        /// Require at least `n` items.
        pub fn min(mut self, n: usize) -> Self {
            self.bounds.min = Some(n);
            self
        }

        /// Require at most `n` items.
        pub fn max(mut self, n: usize) -> Self {
            self.bounds.max = Some(n);
            self
        }

        /// Require at least one item.
        pub fn non_empty(mut self) -> Self {
            self.bounds.non_empty = true;
            self
        }
    };
}

/// An ordered list whose elements all match one schema.
#[derive(Debug, Clone)]
pub struct ArraySchema<S> {
    element: S,
    bounds: LengthBounds,
}

impl<S: Schema> ArraySchema<S> {
    /// Elements validated by `element`.
    pub fn new(element: S) -> Self {
        Self {
            element,
            bounds: LengthBounds::default(),
        }
    }

    length_builders!();
}

impl<S: Schema> Schema for ArraySchema<S> {
    type Output = Vec<S::Output>;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<Self::Output> {
        let items = match expect_sequence(input) {
            Ok(items) => items,
            Err(issue) => return ValidationResult::fail(issue),
        };
        parse_elements(&self.element, items, ctx).and_then(|values| {
            match self.bounds.check(values.len(), "items") {
                Some(issue) => ValidationResult::fail(issue),
                None => ValidationResult::Success(values),
            }
        })
    }

    fn kind(&self) -> &'static str {
        "array"
    }
}

/// A duplicate-free collection. Length bounds apply to the deduplicated
/// set, not to the raw sequence.
#[derive(Debug, Clone)]
pub struct SetSchema<S> {
    element: S,
    bounds: LengthBounds,
}

impl<S> SetSchema<S>
where
    S: Schema,
    S::Output: Eq + Hash,
{
    /// Elements validated by `element`.
    pub fn new(element: S) -> Self {
        Self {
            element,
            bounds: LengthBounds::default(),
        }
    }

    length_builders!();
}

impl<S> Schema for SetSchema<S>
where
    S: Schema,
    S::Output: Eq + Hash,
{
    type Output = HashSet<S::Output>;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<Self::Output> {
        let items = match expect_sequence(input) {
            Ok(items) => items,
            Err(issue) => return ValidationResult::fail(issue),
        };
        parse_elements(&self.element, items, ctx).and_then(|values| {
            let set: HashSet<S::Output> = values.into_iter().collect();
            match self.bounds.check(set.len(), "items") {
                Some(issue) => ValidationResult::fail(issue),
                None => ValidationResult::Success(set),
            }
        })
    }

    fn kind(&self) -> &'static str {
        "set"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{int, string};
    use crate::schema::SchemaExt;
    use sieve_core::IssueKind;

    #[test]
    fn test_array_collects_every_element_issue() {
        let schema = ArraySchema::new(int());
        let r = schema.parse(vec![Value::string("a"), 2.into(), Value::string("c")]);
        assert_eq!(
            r.error_messages(),
            vec![
                "[0]: expected integer, received string \"a\"",
                "[2]: expected integer, received string \"c\"",
            ]
        );
    }

    #[test]
    fn test_array_shape_mismatch_short_circuits() {
        let r = ArraySchema::new(int()).parse(5);
        assert_eq!(r.error_messages(), vec!["expected sequence, received integer"]);
    }

    #[test]
    fn test_array_null_rejected() {
        let r = ArraySchema::new(int()).parse(Value::Null);
        assert_eq!(r.issues()[0].kind(), IssueKind::NullNotAllowed);
    }

    #[test]
    fn test_length_checked_only_without_element_errors() {
        let schema = ArraySchema::new(int()).min(3);
        let r = schema.parse(vec![Value::string("x")]);
        assert_eq!(r.issues().len(), 1);
        assert_eq!(r.issues()[0].path(), &[PathSegment::Index(0)]);
        let r = schema.parse(vec![1]);
        assert_eq!(r.error_messages(), vec!["expected at least 3 items, received 1"]);
    }

    #[test]
    fn test_exact_length_is_length_mismatch() {
        let r = ArraySchema::new(int()).length(2).parse(vec![1, 2, 3]);
        assert_eq!(r.issues()[0].kind(), IssueKind::LengthMismatch);
    }

    #[test]
    fn test_non_empty() {
        let r = ArraySchema::new(string()).non_empty().parse(Vec::<Value>::new());
        assert_eq!(r.error_messages(), vec!["must not be empty"]);
    }

    #[test]
    fn test_set_deduplicates() {
        let set = SetSchema::new(int()).parse(vec![1, 2, 2, 3]).into_value().unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&2));
    }

    #[test]
    fn test_set_bounds_use_distinct_count() {
        let r = SetSchema::new(int()).min(2).parse(vec![7, 7]);
        assert_eq!(r.error_messages(), vec!["expected at least 2 items, received 1"]);
    }
}
