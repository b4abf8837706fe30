//! First-match union.

use sieve_core::{Issue, IssueKind, ValidationResult, Value};

use crate::context::ParseContext;
use crate::schema::{BoxedSchema, Schema};

/// Tries each member in declaration order and returns the first success.
///
/// When every member fails, the result is a single `UnionExhausted` issue
/// whose message lists each member's issues (joined with `"; "`), members
/// separated by the configured `union_separator`.
pub struct UnionSchema<T> {
    members: Vec<BoxedSchema<T>>,
}

impl<T> Clone for UnionSchema<T> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
        }
    }
}

impl<T: 'static> UnionSchema<T> {
    /// A union over `members`, tried in order.
    pub fn new(members: Vec<BoxedSchema<T>>) -> Self {
        Self { members }
    }

    /// Append another member. Chained `or` calls build one flat union.
    pub fn or<S>(mut self, other: S) -> Self
    where
        S: Schema<Output = T> + 'static,
    {
        self.members.push(BoxedSchema::new(other));
        self
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the union has no members (and so rejects everything).
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> Schema for UnionSchema<T> {
    type Output = T;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        if self.members.is_empty() {
            return ValidationResult::fail(Issue::new(
                IssueKind::UnionExhausted,
                "union has no members",
            ));
        }
        let mut candidates = Vec::with_capacity(self.members.len());
        for member in &self.members {
            match member.parse_in(input, ctx) {
                ValidationResult::Success(v) => return ValidationResult::Success(v),
                ValidationResult::Failure(issues) => candidates.push(
                    issues
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
            }
        }
        tracing::debug!(members = candidates.len(), "union exhausted");
        ValidationResult::fail(Issue::new(
            IssueKind::UnionExhausted,
            format!(
                "no union member matched: {}",
                candidates.join(&ctx.config().union_separator)
            ),
        ))
    }

    fn kind(&self) -> &'static str {
        "union"
    }

    fn accepts_missing(&self) -> bool {
        self.members.iter().any(|m| m.accepts_missing())
    }

    fn default_output(&self) -> Option<T> {
        self.members.iter().find_map(|m| m.default_output())
    }
}
