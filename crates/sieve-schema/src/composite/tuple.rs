//! Fixed-arity tuple schemas, arity 1 through 4.
//!
//! The input must be a sequence of exactly N items. A wrong count is one
//! `LengthMismatch` issue for the whole tuple; item issues are tagged with
//! the 1-based position (`Item 2: …`).

use sieve_core::{Issue, IssueKind, PathSegment, ValidationResult, Value};

use super::expect_sequence;
use crate::context::ParseContext;
use crate::schema::Schema;

/// A tuple of item schemas, validated position-wise.
#[derive(Debug, Clone)]
pub struct TupleSchema<T> {
    items: T,
}

impl<T> TupleSchema<T> {
    /// Wrap a tuple of schemas, e.g. `TupleSchema::new((string(), int()))`.
    pub fn new(items: T) -> Self {
        Self { items }
    }
}

fn arity_issue(expected: usize, received: usize) -> Issue {
    Issue::new(
        IssueKind::LengthMismatch,
        format!("expected tuple of {expected} items, received {received}"),
    )
}

macro_rules! impl_tuple_schema {
    ($arity:literal; $($ty:ident . $idx:tt => $var:ident),+) => {
        impl<$($ty: Schema),+> Schema for TupleSchema<($($ty,)+)> {
            type Output = ($($ty::Output,)+);

            fn parse_in(
                &self,
                input: &Value,
                ctx: &mut ParseContext<'_>,
            ) -> ValidationResult<Self::Output> {
                let items = match expect_sequence(input) {
                    Ok(items) => items,
                    Err(issue) => return ValidationResult::fail(issue),
                };
                if items.len() != $arity {
                    return ValidationResult::fail(arity_issue($arity, items.len()));
                }
                let mut issues = Vec::new();
                $(
                    let $var = match self.items.$idx.parse_in(&items[$idx], ctx) {
                        ValidationResult::Success(v) => Some(v),
                        ValidationResult::Failure(child) => {
                            issues.extend(
                                child
                                    .into_iter()
                                    .map(|i| i.at(PathSegment::Item($idx + 1))),
                            );
                            None
                        }
                    };
                )+
                match ($($var,)+) {
                    ($(Some($var),)+) if issues.is_empty() => {
                        ValidationResult::Success(($($var,)+))
                    }
                    _ => ValidationResult::Failure(issues),
                }
            }

            fn kind(&self) -> &'static str {
                "tuple"
            }
        }
    };
}

impl_tuple_schema!(1; A.0 => a);
impl_tuple_schema!(2; A.0 => a, B.1 => b);
impl_tuple_schema!(3; A.0 => a, B.1 => b, C.2 => c);
impl_tuple_schema!(4; A.0 => a, B.1 => b, C.2 => c, D.3 => d);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{boolean, int, string};
    use crate::schema::SchemaExt;

    #[test]
    fn test_pair() {
        let schema = TupleSchema::new((string(), int()));
        let v = schema.parse(vec![Value::string("x"), Value::from(3)]).into_value();
        assert_eq!(v, Some(("x".to_string(), 3)));
    }

    #[test]
    fn test_item_issues_use_one_based_positions() {
        let schema = TupleSchema::new((string(), int(), boolean()));
        let r = schema.parse(vec![Value::string("x"), Value::string("y"), Value::from(1)]);
        assert_eq!(
            r.error_messages(),
            vec![
                "Item 2: expected integer, received string \"y\"",
                "Item 3: expected boolean, received integer",
            ]
        );
    }

    #[test]
    fn test_wrong_count_is_single_issue() {
        let schema = TupleSchema::new((int(), int()));
        let r = schema.parse(vec![1, 2, 3]);
        assert_eq!(r.error_messages(), vec!["expected tuple of 2 items, received 3"]);
        assert_eq!(r.issues()[0].kind(), IssueKind::LengthMismatch);
    }

    #[test]
    fn test_quad() {
        let schema = TupleSchema::new((int(), int(), int(), string()));
        let v = schema
            .parse(vec![Value::from(1), Value::from(2), Value::from(3), Value::string("z")])
            .into_value();
        assert_eq!(v, Some((1, 2, 3, "z".to_string())));
    }
}
