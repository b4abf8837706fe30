//! # Object Schema
//!
//! Validates a map into a typed record `T` through an explicit list of
//! [`FieldDescriptor`]s. Each descriptor pairs a field name with a child
//! schema and a setter that writes the child's output into a freshly
//! constructed `T`. No reflection is involved: the caller supplies the
//! constructor and the setters.
//!
//! ## Field resolution
//!
//! For each descriptor, in declaration order:
//!
//! - absent, and the child schema has a default: the default is written;
//! - absent and required: `MissingRequiredField` tagged `Field 'name'`;
//! - absent and optional: skipped, the constructed value is left as is;
//! - present: the child schema runs and its issues are tagged `Field 'name'`.
//!
//! A field is required unless its schema accepts a missing value
//! (`optional()` or `default(..)`); `partial` and `required` override that.
//!
//! ## Unknown keys
//!
//! [`UnknownKeys::Strip`] (the default) discards them. [`UnknownKeys::Strict`]
//! appends one `UnexpectedKey` issue naming them all, after the field issues.
//! [`UnknownKeys::Passthrough`] hands them, in input order, to a sink that
//! stores them on the record; a closed record type has nowhere else to keep
//! them.
//!
//! Shaping methods (`partial`, `pick`, `omit`, `strict`, …) consume the
//! schema and return a new one. Descriptors are shared by `Arc`, so a base
//! schema can be cloned and shaped in several directions independently.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use sieve_core::{Issue, IssueKind, Map, PathSegment, ValidationResult, Value};

use super::expect_map;
use crate::context::ParseContext;
use crate::schema::Schema;

type Apply<T> = Arc<dyn Fn(&mut T, &Value, &mut ParseContext<'_>) -> Vec<Issue> + Send + Sync>;
type ApplyDefault<T> = Arc<dyn Fn(&mut T) -> bool + Send + Sync>;
type Sink<T> = Arc<dyn Fn(&mut T, Map) + Send + Sync>;

fn applier<T, F>(f: F) -> Apply<T>
where
    F: Fn(&mut T, &Value, &mut ParseContext<'_>) -> Vec<Issue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One declared field: name, required flag and the typed write into `T`.
pub struct FieldDescriptor<T> {
    name: String,
    required: bool,
    apply: Apply<T>,
    apply_default: ApplyDefault<T>,
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            required: self.required,
            apply: Arc::clone(&self.apply),
            apply_default: Arc::clone(&self.apply_default),
        }
    }
}

impl<T> FieldDescriptor<T> {
    /// The input key this field reads.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an absent key is an error.
    pub fn is_required(&self) -> bool {
        self.required
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Policy for input keys that match no declared field.
pub enum UnknownKeys<T> {
    /// Discard them.
    Strip,
    /// Fail with one `UnexpectedKey` issue.
    Strict,
    /// Hand them to a sink on the output record.
    Passthrough(Sink<T>),
}

impl<T> Clone for UnknownKeys<T> {
    fn clone(&self) -> Self {
        match self {
            UnknownKeys::Strip => UnknownKeys::Strip,
            UnknownKeys::Strict => UnknownKeys::Strict,
            UnknownKeys::Passthrough(sink) => UnknownKeys::Passthrough(Arc::clone(sink)),
        }
    }
}

impl<T> fmt::Debug for UnknownKeys<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnknownKeys::Strip => "Strip",
            UnknownKeys::Strict => "Strict",
            UnknownKeys::Passthrough(_) => "Passthrough",
        })
    }
}

/// A map validated into a record `T`.
pub struct ObjectSchema<T> {
    construct: Arc<dyn Fn() -> T + Send + Sync>,
    fields: Vec<FieldDescriptor<T>>,
    unknown: UnknownKeys<T>,
}

impl<T> Clone for ObjectSchema<T> {
    fn clone(&self) -> Self {
        Self {
            construct: Arc::clone(&self.construct),
            fields: self.fields.clone(),
            unknown: self.unknown.clone(),
        }
    }
}

impl<T> fmt::Debug for ObjectSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("fields", &self.fields)
            .field("unknown", &self.unknown)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> ObjectSchema<T> {
    /// An object with no fields, building each output with `construct`.
    pub fn new<C>(construct: C) -> Self
    where
        C: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            construct: Arc::new(construct),
            fields: Vec::new(),
            unknown: UnknownKeys::Strip,
        }
    }

    /// Declare a field. Redeclaring a name replaces the earlier descriptor
    /// in place, so names stay unique and declaration order is stable.
    pub fn field<S, F>(self, name: impl Into<String>, schema: S, setter: F) -> Self
    where
        S: Schema + 'static,
        F: Fn(&mut T, S::Output) + Send + Sync + 'static,
    {
        let schema = Arc::new(schema);
        let setter = Arc::new(setter);
        let required = !schema.accepts_missing();

        let apply = {
            let schema = Arc::clone(&schema);
            let setter = Arc::clone(&setter);
            applier::<T, _>(move |target, value, ctx| match schema.parse_in(value, ctx) {
                ValidationResult::Success(v) => {
                    setter(target, v);
                    Vec::new()
                }
                ValidationResult::Failure(issues) => issues,
            })
        };
        let apply_default: ApplyDefault<T> = Arc::new(move |target: &mut T| {
            match schema.default_output() {
                Some(v) => {
                    setter(target, v);
                    true
                }
                None => false,
            }
        });

        self.with_descriptor(FieldDescriptor {
            name: name.into(),
            required,
            apply,
            apply_default,
        })
    }

    fn with_descriptor(mut self, descriptor: FieldDescriptor<T>) -> Self {
        match self.fields.iter().position(|f| f.name == descriptor.name) {
            Some(i) => self.fields[i] = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    /// The declared fields, in order.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// The declared field names, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Make every field optional. Absent fields keep their constructed value.
    pub fn partial(mut self) -> Self {
        for f in &mut self.fields {
            f.required = false;
        }
        self
    }

    /// Make every field required.
    pub fn required(mut self) -> Self {
        for f in &mut self.fields {
            f.required = true;
        }
        self
    }

    /// Keep only the named fields. Unknown names are ignored.
    pub fn pick<I, K>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keep: HashSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self.fields.retain(|f| keep.contains(&f.name));
        self
    }

    /// Drop the named fields. Unknown names are ignored.
    pub fn omit<I, K>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let drop: HashSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self.fields.retain(|f| !drop.contains(&f.name));
        self
    }

    /// Fields of `other` are added after this schema's own; a shared name
    /// takes `other`'s descriptor. Constructor and unknown-key policy stay.
    pub fn extend(self, other: ObjectSchema<T>) -> Self {
        other
            .fields
            .into_iter()
            .fold(self, |acc, descriptor| acc.with_descriptor(descriptor))
    }

    /// Reject undeclared keys.
    pub fn strict(mut self) -> Self {
        self.unknown = UnknownKeys::Strict;
        self
    }

    /// Discard undeclared keys.
    pub fn strip(mut self) -> Self {
        self.unknown = UnknownKeys::Strip;
        self
    }

    /// Keep undeclared keys by handing them to `sink` after a successful
    /// parse.
    pub fn passthrough<F>(mut self, sink: F) -> Self
    where
        F: Fn(&mut T, Map) + Send + Sync + 'static,
    {
        self.unknown = UnknownKeys::Passthrough(Arc::new(sink));
        self
    }

    /// The active unknown-key policy.
    pub fn unknown_keys(&self) -> &UnknownKeys<T> {
        &self.unknown
    }
}

impl<T> ObjectSchema<T> {
    fn is_declared(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.name == key)
    }
}

impl<T: 'static> Schema for ObjectSchema<T> {
    type Output = T;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        let map = match expect_map(input) {
            Ok(map) => map,
            Err(issue) => return ValidationResult::fail(issue),
        };

        let mut target = (self.construct)();
        let mut issues = Vec::new();
        for field in &self.fields {
            let tag = || PathSegment::Field(field.name.clone());
            match map.get(&field.name) {
                Some(value) => issues.extend(
                    (field.apply)(&mut target, value, ctx)
                        .into_iter()
                        .map(|issue| issue.at(tag())),
                ),
                None => {
                    if !(field.apply_default)(&mut target) && field.required {
                        issues.push(Issue::missing_field().at(tag()));
                    }
                }
            }
        }

        match &self.unknown {
            UnknownKeys::Strip => {}
            UnknownKeys::Strict => {
                let extra: Vec<&str> = map.keys().filter(|k| !self.is_declared(k)).collect();
                if !extra.is_empty() {
                    issues.push(Issue::new(
                        IssueKind::UnexpectedKey,
                        format!("unexpected keys: {}", extra.join(", ")),
                    ));
                }
            }
            UnknownKeys::Passthrough(sink) => {
                if issues.is_empty() {
                    let extra: Map = map
                        .iter()
                        .filter(|(k, _)| !self.is_declared(k))
                        .map(|(k, v)| (k, v.clone()))
                        .collect();
                    if !extra.is_empty() {
                        sink(&mut target, extra);
                    }
                }
            }
        }

        ValidationResult::from_issues(issues, || target)
    }

    fn kind(&self) -> &'static str {
        "object"
    }
}
