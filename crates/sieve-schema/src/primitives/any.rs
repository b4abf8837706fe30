//! Pass-through and literal schemas.

use sieve_core::{Issue, ValidationResult, Value};

use crate::context::ParseContext;
use crate::schema::Schema;

/// Accepts anything, including null, and returns it unchanged.
#[derive(Debug, Clone, Default)]
pub struct AnySchema;

impl Schema for AnySchema {
    type Output = Value;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<Value> {
        ValidationResult::Success(input.clone())
    }

    fn kind(&self) -> &'static str {
        "any"
    }
}

/// Accepts exactly one value.
#[derive(Debug, Clone)]
pub struct LiteralSchema {
    expected: Value,
}

impl LiteralSchema {
    /// Match `expected` exactly.
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Schema for LiteralSchema {
    type Output = Value;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<Value> {
        if *input == self.expected {
            ValidationResult::Success(input.clone())
        } else if input.is_null() {
            ValidationResult::fail(Issue::null_not_allowed())
        } else {
            ValidationResult::fail(Issue::constraint(format!(
                "expected literal {}, received {input}",
                self.expected
            )))
        }
    }

    fn kind(&self) -> &'static str {
        "literal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaExt;

    #[test]
    fn test_any_accepts_null() {
        assert_eq!(AnySchema.parse(Value::Null).into_value(), Some(Value::Null));
    }

    #[test]
    fn test_literal() {
        let schema = LiteralSchema::new("circle");
        assert!(schema.parse("circle").is_success());
        assert_eq!(
            schema.parse("square").error_messages(),
            vec![r#"expected literal "circle", received "square""#]
        );
    }
}
