//! # Modifiers
//!
//! Cross-cutting wrappers that attach to any schema: null and absence
//! handling (`Optional`, `Nullable`, `WithDefault`), input rewriting
//! (`Preprocess`), extra predicates (`Refine`) and output mapping
//! (`Transform`, `MapOutput`).
//!
//! Preprocessing runs first. The null-admitting wrappers look at the value
//! returned by [`Schema::prepare`], so a `preprocess` step beneath them that
//! rewrites its input to null is admitted like a literal null. A primitive
//! only ever rejects null when no wrapper above it admitted it.

use std::borrow::Cow;
use std::fmt::Display;
use std::marker::PhantomData;

use sieve_core::{Issue, IssueKind, ValidationResult, Value};

use crate::context::ParseContext;
use crate::schema::Schema;

/// Null or a missing field parse to `None`.
#[derive(Debug, Clone)]
pub struct Optional<S> {
    inner: S,
}

impl<S> Optional<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Schema> Schema for Optional<S> {
    type Output = Option<S::Output>;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<Self::Output> {
        self.parse_prepared(&self.inner.prepare(input), ctx)
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(
        &self,
        prepared: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<Self::Output> {
        if prepared.is_null() {
            return ValidationResult::Success(None);
        }
        self.inner.parse_prepared(prepared, ctx).map(Some)
    }

    fn kind(&self) -> &'static str {
        "optional"
    }

    fn accepts_missing(&self) -> bool {
        true
    }

    fn default_output(&self) -> Option<Self::Output> {
        self.inner.default_output().map(Some)
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}

/// Null parses to `None`; a missing field is still required.
#[derive(Debug, Clone)]
pub struct Nullable<S> {
    inner: S,
}

impl<S> Nullable<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Schema> Schema for Nullable<S> {
    type Output = Option<S::Output>;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<Self::Output> {
        self.parse_prepared(&self.inner.prepare(input), ctx)
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(
        &self,
        prepared: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<Self::Output> {
        if prepared.is_null() {
            return ValidationResult::Success(None);
        }
        self.inner.parse_prepared(prepared, ctx).map(Some)
    }

    fn kind(&self) -> &'static str {
        "nullable"
    }

    fn default_output(&self) -> Option<Self::Output> {
        self.inner.default_output().map(Some)
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}

/// Null or a missing field produce a fixed value.
#[derive(Debug, Clone)]
pub struct WithDefault<S: Schema> {
    inner: S,
    value: S::Output,
}

impl<S: Schema> WithDefault<S> {
    pub(crate) fn new(inner: S, value: S::Output) -> Self {
        Self { inner, value }
    }
}

impl<S> Schema for WithDefault<S>
where
    S: Schema,
    S::Output: Clone + Send + Sync,
{
    type Output = S::Output;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<S::Output> {
        self.parse_prepared(&self.inner.prepare(input), ctx)
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(
        &self,
        prepared: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<S::Output> {
        if prepared.is_null() {
            return ValidationResult::Success(self.value.clone());
        }
        self.inner.parse_prepared(prepared, ctx)
    }

    fn kind(&self) -> &'static str {
        "default"
    }

    fn accepts_missing(&self) -> bool {
        true
    }

    fn default_output(&self) -> Option<S::Output> {
        Some(self.value.clone())
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}

/// Rewrites the raw input before the wrapped schema sees it.
#[derive(Clone)]
pub struct Preprocess<S, F> {
    inner: S,
    f: F,
}

impl<S, F> Preprocess<S, F> {
    pub(crate) fn new(inner: S, f: F) -> Self {
        Self { inner, f }
    }
}

impl<S, F> Schema for Preprocess<S, F>
where
    S: Schema,
    F: Fn(&Value) -> Value + Send + Sync,
{
    type Output = S::Output;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<S::Output> {
        self.inner.parse_prepared(&self.prepare(input), ctx)
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        let rewritten = (self.f)(input);
        let nested = match self.inner.prepare(&rewritten) {
            Cow::Owned(v) => Some(v),
            Cow::Borrowed(_) => None,
        };
        Cow::Owned(nested.unwrap_or(rewritten))
    }

    fn parse_prepared(
        &self,
        prepared: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<S::Output> {
        self.inner.parse_prepared(prepared, ctx)
    }

    fn kind(&self) -> &'static str {
        "preprocess"
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }

    fn default_output(&self) -> Option<S::Output> {
        self.inner.default_output()
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}

/// A custom predicate checked after the wrapped schema succeeds.
#[derive(Clone)]
pub struct Refine<S, F> {
    inner: S,
    predicate: F,
    message: String,
}

impl<S, F> Refine<S, F> {
    pub(crate) fn new(inner: S, predicate: F, message: impl Into<String>) -> Self {
        Self {
            inner,
            predicate,
            message: message.into(),
        }
    }
}

impl<S, F> Refine<S, F>
where
    S: Schema,
    F: Fn(&S::Output) -> bool + Send + Sync,
{
    fn check(&self, result: ValidationResult<S::Output>) -> ValidationResult<S::Output> {
        result.and_then(|value| {
            if (self.predicate)(&value) {
                ValidationResult::Success(value)
            } else {
                ValidationResult::fail(Issue::constraint(self.message.clone()))
            }
        })
    }
}

impl<S, F> Schema for Refine<S, F>
where
    S: Schema,
    F: Fn(&S::Output) -> bool + Send + Sync,
{
    type Output = S::Output;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<S::Output> {
        self.check(self.inner.parse_in(input, ctx))
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(
        &self,
        prepared: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<S::Output> {
        self.check(self.inner.parse_prepared(prepared, ctx))
    }

    fn kind(&self) -> &'static str {
        "refine"
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }

    fn default_output(&self) -> Option<S::Output> {
        self.inner.default_output()
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}

/// Fallible output mapping. An `Err` from the function becomes a
/// `TransformFault` issue.
pub struct Transform<S, F, U, E> {
    inner: S,
    f: F,
    _marker: PhantomData<fn() -> (U, E)>,
}

impl<S, F, U, E> Transform<S, F, U, E> {
    pub(crate) fn new(inner: S, f: F) -> Self {
        Self {
            inner,
            f,
            _marker: PhantomData,
        }
    }
}

impl<S, F, U, E> Transform<S, F, U, E>
where
    S: Schema,
    F: Fn(S::Output) -> Result<U, E> + Send + Sync,
    E: Display,
{
    fn apply(&self, result: ValidationResult<S::Output>) -> ValidationResult<U> {
        result.and_then(|value| match (self.f)(value) {
            Ok(mapped) => ValidationResult::Success(mapped),
            Err(e) => ValidationResult::fail(Issue::new(
                IssueKind::TransformFault,
                format!("transform failed: {e}"),
            )),
        })
    }
}

impl<S, F, U, E> Schema for Transform<S, F, U, E>
where
    S: Schema,
    F: Fn(S::Output) -> Result<U, E> + Send + Sync,
    E: Display,
{
    type Output = U;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<U> {
        self.apply(self.inner.parse_in(input, ctx))
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(&self, prepared: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<U> {
        self.apply(self.inner.parse_prepared(prepared, ctx))
    }

    fn kind(&self) -> &'static str {
        "transform"
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }

    fn default_output(&self) -> Option<U> {
        self.inner.default_output().and_then(|v| (self.f)(v).ok())
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}

/// Infallible output mapping.
pub struct MapOutput<S, F, U> {
    inner: S,
    f: F,
    _marker: PhantomData<fn() -> U>,
}

impl<S, F, U> MapOutput<S, F, U> {
    pub(crate) fn new(inner: S, f: F) -> Self {
        Self {
            inner,
            f,
            _marker: PhantomData,
        }
    }
}

impl<S, F, U> Schema for MapOutput<S, F, U>
where
    S: Schema,
    F: Fn(S::Output) -> U + Send + Sync,
{
    type Output = U;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<U> {
        self.inner.parse_in(input, ctx).map(&self.f)
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(&self, prepared: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<U> {
        self.inner.parse_prepared(prepared, ctx).map(&self.f)
    }

    fn kind(&self) -> &'static str {
        "map"
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }

    fn default_output(&self) -> Option<U> {
        self.inner.default_output().map(&self.f)
    }

    fn brand_tag(&self) -> Option<&str> {
        self.inner.brand_tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{int, string};
    use crate::schema::SchemaExt;

    #[test]
    fn test_optional_admits_null() {
        let schema = string().optional();
        assert_eq!(schema.parse(Value::Null).into_value(), Some(None));
        assert_eq!(schema.parse("a").into_value(), Some(Some("a".to_string())));
        assert!(schema.accepts_missing());
    }

    #[test]
    fn test_nullable_admits_null_but_not_missing() {
        let schema = int().nullable();
        assert_eq!(schema.parse(Value::Null).into_value(), Some(None));
        assert!(!schema.accepts_missing());
    }

    #[test]
    fn test_primitive_rejects_null() {
        let r = int().parse(Value::Null);
        assert_eq!(r.issues()[0].kind(), IssueKind::NullNotAllowed);
    }

    #[test]
    fn test_default_replaces_null() {
        let schema = int().default(7);
        assert_eq!(schema.parse(Value::Null).into_value(), Some(7));
        assert_eq!(schema.parse(3).into_value(), Some(3));
        assert_eq!(schema.default_output(), Some(7));
    }

    #[test]
    fn test_optional_default_propagates() {
        let schema = int().default(7).optional();
        assert_eq!(schema.default_output(), Some(Some(7)));
    }

    fn none_to_null(v: &Value) -> Value {
        match v.as_str() {
            Some("none") => Value::Null,
            _ => v.clone(),
        }
    }

    #[test]
    fn test_preprocess_runs_first() {
        let schema = int().preprocess(none_to_null).optional();
        assert_eq!(schema.parse("none").into_value(), Some(None));
        assert_eq!(schema.parse(5).into_value(), Some(Some(5)));
    }

    #[test]
    fn test_preprocess_to_null_admitted_by_nullable() {
        let schema = int().preprocess(none_to_null).nullable();
        assert_eq!(schema.parse("none").into_value(), Some(None));
        assert!(!schema.accepts_missing());
    }

    #[test]
    fn test_preprocess_to_null_takes_default() {
        let schema = int().preprocess(none_to_null).default(9);
        assert_eq!(schema.parse("none").into_value(), Some(9));
        assert_eq!(schema.parse(2).into_value(), Some(2));
    }

    #[test]
    fn test_preprocess_seen_through_refine_and_map() {
        let schema = int()
            .preprocess(none_to_null)
            .refine(|v| *v > 0, "must be above zero")
            .map(|v| v * 2)
            .optional();
        assert_eq!(schema.parse("none").into_value(), Some(None));
        assert_eq!(schema.parse(3).into_value(), Some(Some(6)));
        assert_eq!(schema.parse(-1).error_messages(), vec!["must be above zero"]);
    }

    #[test]
    fn test_stacked_preprocess_applies_in_order() {
        let schema = int()
            .preprocess(none_to_null)
            .preprocess(|v: &Value| match v.as_str() {
                Some("nil") => Value::string("none"),
                _ => v.clone(),
            })
            .optional();
        assert_eq!(schema.parse("nil").into_value(), Some(None));
    }

    #[test]
    fn test_preprocess_runs_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = AtomicUsize::new(0);
        let schema = int()
            .preprocess(|v: &Value| {
                calls.fetch_add(1, Ordering::SeqCst);
                v.clone()
            })
            .optional();
        assert!(schema.parse(1).is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_object_field_preprocessed_to_null() {
        #[derive(Debug, Default, PartialEq)]
        struct Row {
            count: Option<i64>,
            limit: i64,
        }
        let schema = crate::factory::object::<Row>()
            .field("count", int().preprocess(none_to_null).optional(), |r: &mut Row, v| {
                r.count = v
            })
            .field("limit", int().preprocess(none_to_null).default(10), |r: &mut Row, v| {
                r.limit = v
            });
        let input = Value::from_pairs([("count", "none"), ("limit", "none")]);
        assert_eq!(
            schema.parse(input).into_value(),
            Some(Row {
                count: None,
                limit: 10
            })
        );
    }

    #[test]
    fn test_refine_runs_after_builtin_constraints() {
        let schema = int().min(10).refine(|v| v % 2 == 0, "must be even");
        let r = schema.parse(3);
        assert_eq!(r.issues().len(), 1);
        assert!(r.issues()[0].message().contains("at least 10"));
        let r = schema.parse(11);
        assert_eq!(r.error_messages(), vec!["must be even"]);
        assert!(schema.parse(12).is_success());
    }

    #[test]
    fn test_transform_error_becomes_issue() {
        let schema = string().transform(|s: String| s.parse::<u8>());
        assert_eq!(schema.parse("12").into_value(), Some(12u8));
        let r = schema.parse("999");
        assert_eq!(r.issues()[0].kind(), IssueKind::TransformFault);
        assert!(r.issues()[0].message().starts_with("transform failed: "));
    }

    #[test]
    fn test_map_output() {
        let schema = string().map(|s: String| s.len());
        assert_eq!(schema.parse("abcd").into_value(), Some(4));
    }
}
