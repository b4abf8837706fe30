//! Discriminated union: one map key selects the variant schema.

use std::collections::HashMap;

use sieve_core::{Issue, IssueKind, ValidationResult, Value};

use crate::composite::expect_map;
use crate::context::ParseContext;
use crate::schema::{BoxedSchema, Schema};

/// Reads the discriminator key from a map input and delegates the whole
/// input to the variant registered for its value.
///
/// Non-string scalar tags are matched on their plain rendering, so a tag
/// of `1` selects the variant registered as `"1"`.
pub struct DiscriminatedUnion<T> {
    key: String,
    variants: Vec<(String, BoxedSchema<T>)>,
    index: HashMap<String, usize>,
}

impl<T> Clone for DiscriminatedUnion<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            variants: self.variants.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T: 'static> DiscriminatedUnion<T> {
    /// A discriminated union on `key` with no variants yet.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            variants: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register the schema for one tag value. Re-registering a tag
    /// replaces its schema and keeps its position.
    pub fn variant<S>(mut self, tag: impl Into<String>, schema: S) -> Self
    where
        S: Schema<Output = T> + 'static,
    {
        let tag = tag.into();
        let schema = BoxedSchema::new(schema);
        let existing = self.index.get(&tag).copied();
        match existing {
            Some(i) => self.variants[i].1 = schema,
            None => {
                self.index.insert(tag.clone(), self.variants.len());
                self.variants.push((tag, schema));
            }
        }
        self
    }

    /// The discriminator key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> Vec<&str> {
        self.variants.iter().map(|(tag, _)| tag.as_str()).collect()
    }
}

impl<T> Schema for DiscriminatedUnion<T> {
    type Output = T;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        let map = match expect_map(input) {
            Ok(map) => map,
            Err(issue) => return ValidationResult::fail(issue),
        };
        let tag = match map.get(&self.key) {
            Some(Value::Scalar(scalar)) => scalar.render(),
            Some(other) => {
                tracing::debug!(
                    key = %self.key,
                    received = other.kind_name(),
                    "discriminator not a scalar"
                );
                return ValidationResult::fail(Issue::new(
                    IssueKind::TypeMismatch,
                    format!(
                        "discriminator '{}' must be a scalar, received {}",
                        self.key,
                        other.kind_name()
                    ),
                ));
            }
            None => {
                tracing::debug!(key = %self.key, "discriminator missing");
                return ValidationResult::fail(Issue::new(
                    IssueKind::DiscriminatorMissing,
                    format!("missing discriminator '{}'", self.key),
                ));
            }
        };
        match self.index.get(&tag) {
            Some(&i) => self.variants[i].1.parse_in(input, ctx),
            None => {
                tracing::debug!(key = %self.key, tag = %tag, "discriminator unrecognized");
                let expected: Vec<&str> = self.variants.iter().map(|(t, _)| t.as_str()).collect();
                ValidationResult::fail(Issue::new(
                    IssueKind::DiscriminatorUnrecognized,
                    format!(
                        "unrecognized discriminator value '{tag}' for '{}'; expected one of: {}",
                        self.key,
                        expected.join(", ")
                    ),
                ))
            }
        }
    }

    fn kind(&self) -> &'static str {
        "discriminated_union"
    }
}
