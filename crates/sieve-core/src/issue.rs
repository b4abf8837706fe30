//! # Issues — Structured Validation Failures
//!
//! An [`Issue`] is one failed check: what went wrong ([`IssueKind`]), a
//! human-readable message, and where in the input it happened (a path of
//! [`PathSegment`]s, outermost first).
//!
//! Containers tag child issues by prepending a segment as the issue bubbles
//! up, so an issue deep inside a tree renders as
//! `Field 'children': [0]: Field 'name': expected string, received integer`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The condition that produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Wrong shape or primitive type.
    TypeMismatch,
    /// Null where the schema does not admit it.
    NullNotAllowed,
    /// A required object field was absent.
    MissingRequiredField,
    /// Undeclared keys in a strict object.
    UnexpectedKey,
    /// A length, range, sign, pattern or custom predicate failed.
    ConstraintViolation,
    /// Tuple arity or exact size mismatch.
    LengthMismatch,
    /// The discriminator key is absent.
    DiscriminatorMissing,
    /// The discriminator value selects no registered branch.
    DiscriminatorUnrecognized,
    /// Every union candidate failed.
    UnionExhausted,
    /// An output transform returned an error.
    TransformFault,
    /// A reference named a schema that is not registered.
    UnresolvedReference,
    /// Recursive schemas nested deeper than the configured limit.
    DepthExceeded,
    /// A panic was trapped while validating.
    InternalFault,
}

impl IssueKind {
    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::TypeMismatch => "type_mismatch",
            IssueKind::NullNotAllowed => "null_not_allowed",
            IssueKind::MissingRequiredField => "missing_required_field",
            IssueKind::UnexpectedKey => "unexpected_key",
            IssueKind::ConstraintViolation => "constraint_violation",
            IssueKind::LengthMismatch => "length_mismatch",
            IssueKind::DiscriminatorMissing => "discriminator_missing",
            IssueKind::DiscriminatorUnrecognized => "discriminator_unrecognized",
            IssueKind::UnionExhausted => "union_exhausted",
            IssueKind::TransformFault => "transform_fault",
            IssueKind::UnresolvedReference => "unresolved_reference",
            IssueKind::DepthExceeded => "depth_exceeded",
            IssueKind::InternalFault => "internal_fault",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of an issue's location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Zero-based array or set element.
    Index(usize),
    /// One-based tuple item.
    Item(usize),
    /// Declared object field.
    Field(String),
    /// Record key (the key itself failed).
    Key(String),
    /// Record value under a key.
    Entry(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Item(i) => write!(f, "Item {i}"),
            PathSegment::Field(name) => write!(f, "Field '{name}'"),
            PathSegment::Key(key) => write!(f, "Key '{key}'"),
            PathSegment::Entry(key) => write!(f, "['{key}']"),
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    kind: IssueKind,
    message: String,
    path: Vec<PathSegment>,
}

impl Issue {
    /// Create an issue at the root of the input.
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: Vec::new(),
        }
    }

    /// `expected <expected>, received <kind of input>`.
    pub fn type_mismatch(expected: &str, received: &Value) -> Self {
        Self::new(
            IssueKind::TypeMismatch,
            format!("expected {expected}, received {}", received.kind_name()),
        )
    }

    /// Null where the schema does not admit it.
    pub fn null_not_allowed() -> Self {
        Self::new(IssueKind::NullNotAllowed, "null is not allowed")
    }

    /// A required field was absent.
    pub fn missing_field() -> Self {
        Self::new(IssueKind::MissingRequiredField, "missing required field")
    }

    /// A constraint on an already-typed value failed.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(IssueKind::ConstraintViolation, message)
    }

    /// Prefix the path with an enclosing segment.
    pub fn at(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// The condition that failed.
    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    /// The message without any path prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Location, outermost segment first.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.path {
            write!(f, "{segment}: ")?;
        }
        f.write_str(&self.message)
    }
}
