//! # sieve-core — Foundational Types for the Sieve Engine
//!
//! This crate is the leaf of the Sieve workspace. It defines the shapes every
//! schema agrees on, and nothing that knows how to validate anything.
//!
//! ## Key Design Principles
//!
//! 1. **One canonical input shape.** [`Value`] is a tagged variant of
//!    `Map`, `Sequence`, `Scalar` and `Null`. JSON documents, YAML documents,
//!    association lists, native scalars and any `serde::Serialize` record are
//!    normalized into it at the boundary, so validators reason over one shape.
//!
//! 2. **Failures are values.** [`ValidationResult`] is either `Success(T)` or
//!    `Failure(Vec<Issue>)`. Parsing never returns `Err`; the aggregate
//!    [`ParseError`] only exists for callers that want `?` propagation.
//!
//! 3. **Structured issues.** Every [`Issue`] carries an [`IssueKind`], a
//!    message, and an ordered path. `Display` renders the path-tagged text
//!    (`"[0]: …"`, `"Field 'name': …"`).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sieve-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod issue;
pub mod result;
mod ser;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use config::ParseConfig;
pub use error::{ConfigError, NormalizeError, ParseError};
pub use issue::{Issue, IssueKind, PathSegment};
pub use result::ValidationResult;
pub use value::{Map, Scalar, Value};
