//! # Factory Functions
//!
//! One constructor per schema kind, re-exported at the crate root:
//!
//! ```ignore
//! use sieve_schema::{array, int, object, string, SchemaExt};
//!
//! #[derive(Default)]
//! struct Team { name: String, sizes: Vec<i64> }
//!
//! let team = object::<Team>()
//!     .field("name", string().min(1), |t: &mut Team, v| t.name = v)
//!     .field("sizes", array(int().positive()), |t: &mut Team, v| t.sizes = v);
//! ```
//!
//! Lenient primitives live in [`crate::coerce`].

use std::hash::Hash;

use serde::Serialize;
use sieve_core::Value;

use crate::combinators::{
    DiscriminatedUnion, IntersectionSchema, LazySchema, PipelineSchema, UnionSchema,
};
use crate::composite::{ArraySchema, ObjectSchema, RecordSchema, SetSchema, TupleSchema};
use crate::primitives::{
    AnySchema, BooleanSchema, DateSchema, DateTimeSchema, DecimalSchema, FloatSchema, IntSchema,
    LiteralSchema, StringSchema,
};
use crate::registry::ReferenceSchema;
use crate::schema::{BoxedSchema, Schema};

/// Strict string.
pub fn string() -> StringSchema {
    StringSchema::new()
}

/// Strict 64-bit integer.
pub fn int() -> IntSchema {
    IntSchema::new()
}

/// Strict 64-bit float.
pub fn float() -> FloatSchema {
    FloatSchema::new()
}

/// Alias of [`float`].
pub fn number() -> FloatSchema {
    FloatSchema::new()
}

/// Strict arbitrary-precision decimal.
pub fn decimal() -> DecimalSchema {
    DecimalSchema::new()
}

/// Strict boolean.
pub fn boolean() -> BooleanSchema {
    BooleanSchema::new()
}

/// Calendar date.
pub fn date() -> DateSchema {
    DateSchema::new()
}

/// UTC instant.
pub fn datetime() -> DateTimeSchema {
    DateTimeSchema::new()
}

/// Any value, returned as is.
pub fn any() -> AnySchema {
    AnySchema
}

/// Exactly `value`.
pub fn literal(value: impl Into<Value>) -> LiteralSchema {
    LiteralSchema::new(value)
}

/// Ordered list of `element`.
pub fn array<S: Schema>(element: S) -> ArraySchema<S> {
    ArraySchema::new(element)
}

/// Duplicate-free set of `element`.
pub fn set<S>(element: S) -> SetSchema<S>
where
    S: Schema,
    S::Output: Eq + Hash,
{
    SetSchema::new(element)
}

/// Fixed-arity tuple, e.g. `tuple((string(), int()))`.
pub fn tuple<T>(items: T) -> TupleSchema<T> {
    TupleSchema::new(items)
}

/// Object producing `T`, starting from `T::default()`.
pub fn object<T: Default + 'static>() -> ObjectSchema<T> {
    ObjectSchema::new(T::default)
}

/// Object producing `T`, starting from `construct()`.
pub fn object_with<T, C>(construct: C) -> ObjectSchema<T>
where
    T: 'static,
    C: Fn() -> T + Send + Sync + 'static,
{
    ObjectSchema::new(construct)
}

/// String-keyed record of `value`.
pub fn record<V: Schema>(value: V) -> RecordSchema<StringSchema, V> {
    RecordSchema::new(StringSchema::new(), value)
}

/// Record whose keys are validated by `key`.
pub fn record_with_keys<K, V>(key: K, value: V) -> RecordSchema<K, V>
where
    K: Schema,
    K::Output: Ord,
    V: Schema,
{
    RecordSchema::new(key, value)
}

/// First-match union over `members`.
pub fn union<T, I>(members: I) -> UnionSchema<T>
where
    T: 'static,
    I: IntoIterator<Item = BoxedSchema<T>>,
{
    UnionSchema::new(members.into_iter().collect())
}

/// Union selected by the value under `key`.
pub fn discriminated_union<T: 'static>(key: impl Into<String>) -> DiscriminatedUnion<T> {
    DiscriminatedUnion::new(key)
}

/// Sequential intersection of `stages`.
pub fn intersection<T, I>(stages: I) -> IntersectionSchema<T>
where
    T: Serialize + 'static,
    I: IntoIterator<Item = BoxedSchema<T>>,
{
    IntersectionSchema::new(stages.into_iter().collect())
}

/// Short-circuiting pipeline of `stages`.
pub fn pipeline<T, I>(stages: I) -> PipelineSchema<T>
where
    T: Serialize + 'static,
    I: IntoIterator<Item = BoxedSchema<T>>,
{
    PipelineSchema::new(stages.into_iter().collect())
}

/// Schema built by `factory` on first use.
pub fn lazy<S, F>(factory: F) -> LazySchema<S, F>
where
    S: Schema,
    F: Fn() -> S + Send + Sync,
{
    LazySchema::new(factory)
}

/// Reference to the schema registered as `id`.
pub fn reference<T>(id: impl Into<String>) -> ReferenceSchema<T> {
    ReferenceSchema::new(id)
}
