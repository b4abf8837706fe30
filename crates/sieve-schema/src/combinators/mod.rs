//! # Combinators
//!
//! Schemas built from whole schemas:
//!
//! - [`UnionSchema`]: first member to succeed wins; declaration order is
//!   the tie-break for ambiguous input.
//! - [`DiscriminatedUnion`]: one map key selects the variant in O(1).
//! - [`IntersectionSchema`]: stages run in sequence, each validating the
//!   previous stage's output; all stage issues are collected.
//! - [`PipelineSchema`]: stages run in sequence and stop at the first
//!   failure.
//! - [`LazySchema`]: a memoized factory, for self-referential shapes.
//! - [`Catch`]: never fails; any failure or trapped panic becomes the
//!   fallback.
//! - [`Branded`]: attaches a nominal tag; the output is unchanged.
//!
//! Intersection and pipeline stages share one output type `T` and pass it
//! on by serializing it straight back into a [`sieve_core::Value`], so each
//! stage sees what the previous one produced. Non-finite floats stay floats;
//! dates and decimals travel as their canonical text, which the matching
//! schemas read back without loss.

pub mod brand;
pub mod catch;
pub mod discriminated;
pub mod intersection;
pub mod lazy;
pub mod pipeline;
pub mod union;

pub use brand::Branded;
pub use catch::Catch;
pub use discriminated::DiscriminatedUnion;
pub use intersection::IntersectionSchema;
pub use lazy::LazySchema;
pub use pipeline::PipelineSchema;
pub use union::UnionSchema;

use serde::Serialize;
use sieve_core::{Issue, IssueKind, Value};

/// Re-normalize a stage output as the next stage's input.
pub(crate) fn rethread<T: Serialize>(output: &T) -> Result<Value, Issue> {
    Value::from_serialize(output).map_err(|e| {
        Issue::new(
            IssueKind::TransformFault,
            format!("stage output could not be passed on: {e}"),
        )
    })
}

/// The issue for a sequential combinator built with no stages.
pub(crate) fn no_stages(kind: &str) -> Issue {
    Issue::new(IssueKind::InternalFault, format!("{kind} has no stages"))
}
