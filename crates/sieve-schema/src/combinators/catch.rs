//! Infallible fallback wrapper.

use std::panic::{catch_unwind, AssertUnwindSafe};

use sieve_core::{ValidationResult, Value};

use crate::context::ParseContext;
use crate::schema::{panic_message, Schema};

/// Returns the inner schema's output, or `fallback` when it fails or
/// panics. Never produces a failure.
#[derive(Debug, Clone)]
pub struct Catch<S: Schema> {
    inner: S,
    fallback: S::Output,
}

impl<S: Schema> Catch<S> {
    pub(crate) fn new(inner: S, fallback: S::Output) -> Self {
        Self { inner, fallback }
    }
}

impl<S> Schema for Catch<S>
where
    S: Schema,
    S::Output: Clone + Send + Sync,
{
    type Output = S::Output;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<S::Output> {
        let depth = ctx.depth();
        match catch_unwind(AssertUnwindSafe(|| self.inner.parse_in(input, ctx))) {
            Ok(ValidationResult::Success(v)) => ValidationResult::Success(v),
            Ok(ValidationResult::Failure(_)) => ValidationResult::Success(self.fallback.clone()),
            Err(payload) => {
                ctx.restore_depth(depth);
                tracing::warn!(
                    schema = self.inner.kind(),
                    panic = %panic_message(payload.as_ref()),
                    "trapped panic in catch"
                );
                ValidationResult::Success(self.fallback.clone())
            }
        }
    }

    fn kind(&self) -> &'static str {
        "catch"
    }

    fn accepts_missing(&self) -> bool {
        true
    }

    fn default_output(&self) -> Option<S::Output> {
        Some(self.fallback.clone())
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}
