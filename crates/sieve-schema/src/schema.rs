//! # The Schema Trait
//!
//! [`Schema`] is the one seam every validator implements: turn a canonical
//! [`Value`] into a typed output or a list of issues. It is object safe, so
//! heterogeneous schemas with the same output can be stored as
//! [`BoxedSchema`].
//!
//! [`SchemaExt`] is blanket-implemented for every sized schema and carries
//! the caller-facing surface:
//!
//! - `parse`: never fails outward; returns a [`ValidationResult`].
//! - `safe_parse`: as `parse`, and additionally traps panics raised by
//!   user closures, reporting them as an `InternalFault` issue.
//! - `try_parse`: returns the value directly, or the aggregate
//!   [`ParseError`] carrying every issue.
//!
//! plus the chaining methods that wrap a schema in a modifier or combinator.
//! Every chaining method consumes the schema and returns a new value; nothing
//! is mutated after construction.

use std::any::Any;
use std::borrow::Cow;
use std::fmt::{self, Display};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use sieve_core::{Issue, IssueKind, ParseError, ValidationResult, Value};

use crate::combinators::{Branded, Catch, IntersectionSchema, PipelineSchema, UnionSchema};
use crate::context::ParseContext;
use crate::modifiers::{MapOutput, Nullable, Optional, Preprocess, Refine, Transform, WithDefault};

/// A configured validator producing `Self::Output`.
pub trait Schema: Send + Sync {
    /// The typed value a successful parse produces.
    type Output;

    /// Validate one canonical value.
    ///
    /// Implementations must not mutate `self`; all per-call state lives in
    /// `ctx`.
    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<Self::Output>;

    /// Short name used in trace output.
    fn kind(&self) -> &'static str;

    /// Whether an object field using this schema may be absent.
    fn accepts_missing(&self) -> bool {
        false
    }

    /// The value to use when an object field is absent, if one is configured.
    fn default_output(&self) -> Option<Self::Output> {
        None
    }

    /// Nominal tag attached with `brand`, if any.
    fn brand_tag(&self) -> Option<&str> {
        None
    }

    /// The input after every `preprocess` step this schema applies before
    /// its own checks. Null handling inspects this value, not the raw one.
    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        Cow::Borrowed(input)
    }

    /// Validate a value that has already been through [`Schema::prepare`].
    ///
    /// Schemas that override `prepare` override this too, so preprocessing
    /// runs once.
    fn parse_prepared(
        &self,
        prepared: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<Self::Output> {
        self.parse_in(prepared, ctx)
    }
}

/// Caller-facing entry points and chaining, available on every schema.
pub trait SchemaExt: Schema + Sized {
    /// Parse with the default configuration and no registry.
    fn parse(&self, input: impl Into<Value>) -> ValidationResult<Self::Output> {
        self.parse_with(input, ParseContext::default())
    }

    /// Parse with an explicit context (configuration and registry).
    fn parse_with(
        &self,
        input: impl Into<Value>,
        ctx: ParseContext<'_>,
    ) -> ValidationResult<Self::Output> {
        let input = input.into();
        let mut ctx = ctx;
        let result = self.parse_in(&input, &mut ctx);
        tracing::trace!(
            schema = self.kind(),
            success = result.is_success(),
            issues = result.issues().len(),
            "parse"
        );
        result
    }

    /// Parse, converting any panic raised inside the schema into a failure.
    fn safe_parse(&self, input: impl Into<Value>) -> ValidationResult<Self::Output> {
        self.safe_parse_with(input, ParseContext::default())
    }

    /// [`SchemaExt::safe_parse`] with an explicit context.
    fn safe_parse_with(
        &self,
        input: impl Into<Value>,
        ctx: ParseContext<'_>,
    ) -> ValidationResult<Self::Output> {
        let input = input.into();
        match catch_unwind(AssertUnwindSafe(|| self.parse_with(&input, ctx))) {
            Ok(result) => result,
            Err(payload) => {
                tracing::warn!(
                    schema = self.kind(),
                    panic = %panic_message(payload.as_ref()),
                    "trapped panic during parse"
                );
                ValidationResult::fail(Issue::new(
                    IssueKind::InternalFault,
                    ctx.config().fault_message.clone(),
                ))
            }
        }
    }

    /// Parse and return the value, or the aggregate error on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] carrying every issue, in order.
    fn try_parse(&self, input: impl Into<Value>) -> Result<Self::Output, ParseError> {
        self.parse(input).into_result()
    }

    /// Admit null and missing fields, producing `None`.
    fn optional(self) -> Optional<Self> {
        Optional::new(self)
    }

    /// Admit null, producing `None`. A missing object field is still an error.
    fn nullable(self) -> Nullable<Self> {
        Nullable::new(self)
    }

    /// Substitute `value` for null or a missing object field.
    fn default(self, value: Self::Output) -> WithDefault<Self>
    where
        Self::Output: Clone + Send + Sync,
    {
        WithDefault::new(self, value)
    }

    /// Rewrite the raw input before this schema sees it.
    fn preprocess<F>(self, f: F) -> Preprocess<Self, F>
    where
        F: Fn(&Value) -> Value + Send + Sync,
    {
        Preprocess::new(self, f)
    }

    /// Add a custom predicate checked after every built-in constraint.
    fn refine<F>(self, predicate: F, message: impl Into<String>) -> Refine<Self, F>
    where
        F: Fn(&Self::Output) -> bool + Send + Sync,
    {
        Refine::new(self, predicate, message)
    }

    /// Map the output through a fallible function; an `Err` becomes a
    /// `TransformFault` issue.
    fn transform<U, E, F>(self, f: F) -> Transform<Self, F, U, E>
    where
        F: Fn(Self::Output) -> Result<U, E> + Send + Sync,
        E: Display,
    {
        Transform::new(self, f)
    }

    /// Map the output through an infallible function.
    fn map<U, F>(self, f: F) -> MapOutput<Self, F, U>
    where
        F: Fn(Self::Output) -> U + Send + Sync,
    {
        MapOutput::new(self, f)
    }

    /// Replace any failure with `fallback`.
    fn catch(self, fallback: Self::Output) -> Catch<Self>
    where
        Self::Output: Clone + Send + Sync,
    {
        Catch::new(self, fallback)
    }

    /// Attach a nominal tag without changing the output.
    fn brand(self, tag: impl Into<String>) -> Branded<Self> {
        Branded::new(self, tag)
    }

    /// Erase the concrete type.
    fn boxed(self) -> BoxedSchema<Self::Output>
    where
        Self: 'static,
    {
        BoxedSchema::new(self)
    }

    /// First-match union with `other`.
    fn or<S>(self, other: S) -> UnionSchema<Self::Output>
    where
        Self: 'static,
        S: Schema<Output = Self::Output> + 'static,
    {
        UnionSchema::new(vec![self.boxed(), other.boxed()])
    }

    /// Sequential intersection: `other` validates this schema's output.
    fn and<S>(self, other: S) -> IntersectionSchema<Self::Output>
    where
        Self: 'static,
        Self::Output: Serialize,
        S: Schema<Output = Self::Output> + 'static,
    {
        IntersectionSchema::new(vec![self.boxed(), other.boxed()])
    }

    /// Pipeline: feed this schema's output into `next`, stopping at the
    /// first failure.
    fn pipe<S>(self, next: S) -> PipelineSchema<Self::Output>
    where
        Self: 'static,
        Self::Output: Serialize,
        S: Schema<Output = Self::Output> + 'static,
    {
        PipelineSchema::new(vec![self.boxed(), next.boxed()])
    }
}

impl<S: Schema> SchemaExt for S {}

/// A type-erased, cheaply clonable schema.
pub struct BoxedSchema<T> {
    inner: Arc<dyn Schema<Output = T>>,
}

impl<T> Clone for BoxedSchema<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for BoxedSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedSchema")
            .field("kind", &self.inner.kind())
            .finish_non_exhaustive()
    }
}

impl<T> BoxedSchema<T> {
    /// Erase a concrete schema.
    pub fn new<S>(schema: S) -> Self
    where
        S: Schema<Output = T> + 'static,
    {
        Self {
            inner: Arc::new(schema),
        }
    }
}

impl<T> Schema for BoxedSchema<T> {
    type Output = T;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        self.inner.parse_in(input, ctx)
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }

    fn default_output(&self) -> Option<T> {
        self.inner.default_output()
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(&self, prepared: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        self.inner.parse_prepared(prepared, ctx)
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{int, string};

    #[test]
    fn test_try_parse_returns_value() {
        assert_eq!(int().try_parse("42").unwrap(), 42);
    }

    #[test]
    fn test_try_parse_aggregates_issues() {
        let err = string().min(5).try_parse("abc").unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert!(err.to_string().starts_with("validation failed: "));
    }

    #[test]
    fn test_safe_parse_traps_panics() {
        let schema = int().map(|v: i64| -> i64 {
            if v == 13 {
                panic!("unlucky");
            }
            v
        });
        assert_eq!(schema.safe_parse(1).into_value(), Some(1));
        let r = schema.safe_parse(13);
        assert_eq!(r.issues()[0].kind(), IssueKind::InternalFault);
        assert_eq!(r.issues()[0].message(), "internal error during validation");
    }

    #[test]
    fn test_safe_parse_uses_configured_message() {
        let config = sieve_core::ParseConfig {
            fault_message: "boom".into(),
            ..Default::default()
        };
        let schema = string().map(|_: String| -> String { panic!("x") });
        let r = schema.safe_parse_with("a", ParseContext::new(&config));
        assert_eq!(r.issues()[0].message(), "boom");
    }

    #[test]
    fn test_boxed_forwards_metadata() {
        let boxed = string().brand("Email").boxed();
        assert_eq!(boxed.brand_tag(), Some("Email"));
        assert_eq!(boxed.kind(), "brand");
        let cloned = boxed.clone();
        assert!(cloned.parse("a").is_success());
    }

    #[test]
    fn test_boxed_debug_names_kind() {
        let rendered = format!("{:?}", int().boxed());
        assert!(rendered.starts_with("BoxedSchema"));
        assert!(rendered.contains("\"int\""));
    }

    #[test]
    fn test_boxed_keeps_preprocess_before_null_check() {
        let schema = int()
            .preprocess(|v: &Value| match v.as_str() {
                Some("") => Value::Null,
                _ => v.clone(),
            })
            .boxed()
            .optional();
        assert_eq!(schema.parse("").into_value(), Some(None));
        assert_eq!(schema.parse(4).into_value(), Some(Some(4)));
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload = catch_unwind(|| {
            panic!("plain");
        })
        .unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "plain");
    }
}
