//! Boolean schema. Strict by default: only native booleans pass. The
//! token vocabulary (`"yes"`, `"off"`, `1`, …) is enabled through
//! [`crate::coerce::boolean`].

use sieve_core::{Issue, Scalar, ValidationResult, Value};

use super::{coerce_input, Coercion};
use crate::context::ParseContext;
use crate::schema::Schema;

/// Validates booleans.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    coercion: Option<Coercion>,
}

impl BooleanSchema {
    /// A strict boolean schema.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }
}

impl Schema for BooleanSchema {
    type Output = bool;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<bool> {
        let input = coerce_input(input, self.coercion);
        match input.as_ref() {
            Value::Null => ValidationResult::fail(Issue::null_not_allowed()),
            Value::Scalar(Scalar::Bool(b)) => ValidationResult::Success(*b),
            other => ValidationResult::fail(Issue::type_mismatch("boolean", other)),
        }
    }

    fn kind(&self) -> &'static str {
        "boolean"
    }
}
