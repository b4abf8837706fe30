//! # Primitive Schemas
//!
//! Leaf validators. Each primitive runs the same fixed sequence:
//!
//! 1. **Coercion**: only for schemas built by [`crate::coerce`], a lenient
//!    rewrite of the raw input.
//! 2. **Null**: rejected with `NullNotAllowed`. Admitting null is the job of
//!    the `optional`, `nullable` and `default` wrappers.
//! 3. **Type check**: native values of the target type, plus strings that
//!    parse cleanly for the numeric and temporal kinds.
//! 4. **Constraints**: in a fixed order per kind, stopping at the first
//!    failure. Containers aggregate sibling failures; a single typed value
//!    reports only its first broken constraint.

use std::borrow::Cow;

use sieve_core::Value;

pub mod any;
pub mod boolean;
pub mod decimal;
pub mod number;
pub mod string;
pub mod temporal;

pub use any::{AnySchema, LiteralSchema};
pub use boolean::BooleanSchema;
pub use decimal::DecimalSchema;
pub use number::{FloatSchema, IntSchema};
pub use string::StringSchema;
pub use temporal::{DateSchema, DateTimeSchema};

/// Lenient input rewrite installed by the coercion factory.
pub(crate) type Coercion = fn(&Value) -> Value;

/// Apply the coercion step, if any, without cloning when there is none.
pub(crate) fn coerce_input(input: &Value, coercion: Option<Coercion>) -> Cow<'_, Value> {
    match coercion {
        Some(f) => Cow::Owned(f(input)),
        None => Cow::Borrowed(input),
    }
}
