//! # Composite Schemas
//!
//! Containers validated by delegating to child schemas: [`ArraySchema`],
//! [`SetSchema`], [`TupleSchema`], [`ObjectSchema`] and [`RecordSchema`].
//!
//! ## Aggregation
//!
//! A wrong outer shape (a scalar where a sequence belongs) fails at once and
//! no child is consulted. Once the shape is right, every child runs and all
//! child issues are collected, each tagged with the child's position, before
//! the container decides. Container-level constraints (length bounds, strict
//! unknown-key checks) run after the children.

pub mod array;
pub mod object;
pub mod record;
pub mod tuple;

pub use array::{ArraySchema, SetSchema};
pub use object::{FieldDescriptor, ObjectSchema, UnknownKeys};
pub use record::RecordSchema;
pub use tuple::TupleSchema;

use sieve_core::{Issue, Map, Value};

/// The items of a sequence, or the terminal issue for anything else.
pub(crate) fn expect_sequence(input: &Value) -> Result<&[Value], Issue> {
    match input {
        Value::Sequence(items) => Ok(items),
        Value::Null => Err(Issue::null_not_allowed()),
        other => Err(Issue::type_mismatch("sequence", other)),
    }
}

/// The entries of a map, or the terminal issue for anything else.
pub(crate) fn expect_map(input: &Value) -> Result<&Map, Issue> {
    match input {
        Value::Map(map) => Ok(map),
        Value::Null => Err(Issue::null_not_allowed()),
        other => Err(Issue::type_mismatch("map", other)),
    }
}
