//! # sieve-schema — Composable Runtime Schemas
//!
//! Schemas turn a canonical [`sieve_core::Value`] into a typed value or an
//! ordered list of issues. They are built once through factory functions
//! and chained configuration, then parsed any number of times.
//!
//! ## Layers
//!
//! - [`schema`]: the object-safe [`Schema`] trait and the [`SchemaExt`]
//!   entry points (`parse`, `safe_parse`, `try_parse`) and chaining.
//! - [`primitives`]: string, int, float, decimal, boolean, date,
//!   datetime, any, literal.
//! - [`modifiers`]: optional, nullable, default, preprocess, refine,
//!   transform, map.
//! - [`composite`]: array, set, tuple, object, record.
//! - [`combinators`]: union, discriminated union, intersection, pipeline,
//!   lazy, catch, brand.
//! - [`registry`]: named schemas and by-id references for recursion.
//! - [`coerce`]: lenient primitives.
//! - [`factory`]: one constructor per kind, re-exported here.
//!
//! ## Crate Policy
//!
//! - Depends only on `sieve-core` internally.
//! - Every builder method consumes `self` and returns a new schema; nothing
//!   is mutated once parsing starts. Parsing a shared schema from several
//!   threads is safe.
//! - User closures (`refine`, `transform`, setters) run inside the parse.
//!   `safe_parse` and `catch` trap their panics; plain `parse` does not.
//! - No `unwrap()` outside tests.

mod bounds;
pub mod coerce;
pub mod combinators;
pub mod composite;
pub mod context;
pub mod factory;
pub mod modifiers;
pub mod primitives;
pub mod registry;
pub mod schema;

pub use context::ParseContext;
pub use factory::*;
pub use registry::{ReferenceSchema, RegistryError, SchemaRegistry};
pub use schema::{BoxedSchema, Schema, SchemaExt};

pub use sieve_core::{
    Issue, IssueKind, Map, ParseConfig, ParseError, PathSegment, Scalar, ValidationResult, Value,
};
