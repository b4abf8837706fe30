//! # Schema Registry
//!
//! Named schemas for recursion by identifier. A [`ReferenceSchema`] stores
//! only an id and its expected output type; it resolves against the
//! registry attached to the [`ParseContext`] each time it parses. A schema
//! can therefore refer to itself, or two schemas to each other, without
//! either being constructed eagerly.
//!
//! Registration happens during configuration. Once a parse starts the
//! registry is only read.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use sieve_core::{Issue, IssueKind, ValidationResult, Value};
use thiserror::Error;

use crate::context::ParseContext;
use crate::schema::{BoxedSchema, Schema};

/// Errors raised while registering or resolving named schemas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The id is already taken.
    #[error("schema '{0}' is already registered")]
    Duplicate(String),

    /// Nothing is registered under the id.
    #[error("schema '{0}' is not registered")]
    Missing(String),

    /// The registered schema produces a different output type.
    #[error("schema '{id}' produces {registered}, not {requested}")]
    OutputMismatch {
        /// The id looked up.
        id: String,
        /// Output type of the registered schema.
        registered: &'static str,
        /// Output type the caller asked for.
        requested: &'static str,
    },
}

struct Entry {
    schema: Arc<dyn Any + Send + Sync>,
    output: &'static str,
}

/// Schemas keyed by identifier, each stored type-erased with its output
/// type name.
#[derive(Default)]
pub struct SchemaRegistry {
    entries: HashMap<String, Entry>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.ids().collect();
        ids.sort_unstable();
        f.debug_struct("SchemaRegistry").field("ids", &ids).finish()
    }
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if `id` is taken.
    pub fn register<S>(&mut self, id: impl Into<String>, schema: S) -> Result<(), RegistryError>
    where
        S: Schema + 'static,
        S::Output: 'static,
    {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }
        let boxed: BoxedSchema<S::Output> = BoxedSchema::new(schema);
        self.entries.insert(
            id,
            Entry {
                schema: Arc::new(boxed),
                output: type_name::<S::Output>(),
            },
        );
        Ok(())
    }

    /// Look up the schema registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Missing`] for an unknown id and
    /// [`RegistryError::OutputMismatch`] when the registered schema has a
    /// different output type.
    pub fn get<T: 'static>(&self, id: &str) -> Result<BoxedSchema<T>, RegistryError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| RegistryError::Missing(id.to_string()))?;
        entry
            .schema
            .downcast_ref::<BoxedSchema<T>>()
            .cloned()
            .ok_or_else(|| RegistryError::OutputMismatch {
                id: id.to_string(),
                registered: entry.output,
                requested: type_name::<T>(),
            })
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A by-name reference to a registered schema, resolved at parse time.
pub struct ReferenceSchema<T> {
    id: String,
    _output: PhantomData<fn() -> T>,
}

impl<T> Clone for ReferenceSchema<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ReferenceSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceSchema").field("id", &self.id).finish()
    }
}

impl<T> ReferenceSchema<T> {
    /// Refer to the schema registered as `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            _output: PhantomData,
        }
    }

    /// The referenced id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<T: 'static> Schema for ReferenceSchema<T> {
    type Output = T;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<T> {
        let Some(registry) = ctx.registry() else {
            tracing::debug!(id = %self.id, "reference parsed without a registry");
            return ValidationResult::fail(Issue::new(
                IssueKind::UnresolvedReference,
                format!("no registry attached to resolve '{}'", self.id),
            ));
        };
        match registry.get::<T>(&self.id) {
            Ok(schema) => ctx.descend(|ctx| schema.parse_in(input, ctx)),
            Err(e) => {
                tracing::debug!(id = %self.id, error = %e, "reference unresolved");
                ValidationResult::fail(Issue::new(IssueKind::UnresolvedReference, e.to_string()))
            }
        }
    }

    fn kind(&self) -> &'static str {
        "reference"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{array, int, object, reference, string};
    use crate::schema::SchemaExt;
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Category {
        label: String,
        subcategories: Vec<Category>,
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                "category",
                object::<Category>()
                    .field("label", string().non_empty(), |c: &mut Category, v| c.label = v)
                    .field(
                        "subcategories",
                        array(reference::<Category>("category")).default(Vec::new()),
                        |c: &mut Category, v| c.subcategories = v,
                    ),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_self_reference_resolves() {
        let registry = registry();
        let schema = reference::<Category>("category");
        let input = json!({"label": "root", "subcategories": [
            {"label": "a", "subcategories": [{"label": "a.1"}]}
        ]});
        let ctx = ParseContext::default().with_registry(&registry);
        let out = schema.parse_with(&input, ctx).into_value().unwrap();
        assert_eq!(out.subcategories[0].subcategories[0].label, "a.1");
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry();
        let err = registry.register("category", int()).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("category".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_checks_output_type() {
        let registry = registry();
        assert!(registry.get::<Category>("category").is_ok());
        let err = registry.get::<i64>("category").unwrap_err();
        assert!(matches!(err, RegistryError::OutputMismatch { .. }));
        assert_eq!(
            registry.get::<i64>("nope").unwrap_err(),
            RegistryError::Missing("nope".into())
        );
    }

    #[test]
    fn test_unresolved_reference_is_an_issue() {
        let r = reference::<i64>("count").parse(1);
        assert_eq!(r.issues()[0].kind(), IssueKind::UnresolvedReference);

        let registry = SchemaRegistry::new();
        let ctx = ParseContext::default().with_registry(&registry);
        let r = reference::<i64>("count").parse_with(1, ctx);
        assert_eq!(r.error_messages(), vec!["schema 'count' is not registered"]);
    }
}
