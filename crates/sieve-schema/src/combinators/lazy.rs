//! Memoized deferred schema, for recursive shapes.

use std::fmt;

use once_cell::sync::OnceCell;
use sieve_core::{ValidationResult, Value};

use crate::context::ParseContext;
use crate::schema::Schema;

/// Builds the real schema on first parse and reuses it afterwards.
///
/// Construction never runs the factory, so a factory that builds a schema
/// containing another `lazy` of itself terminates. Every parse through a
/// lazy node counts one level against `max_depth`.
pub struct LazySchema<S, F> {
    factory: F,
    cell: OnceCell<S>,
}

impl<S, F> LazySchema<S, F>
where
    S: Schema,
    F: Fn() -> S + Send + Sync,
{
    /// Defer construction to `factory`.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            cell: OnceCell::new(),
        }
    }

    /// Whether the factory has run.
    pub fn is_materialized(&self) -> bool {
        self.cell.get().is_some()
    }

    fn schema(&self) -> &S {
        self.cell.get_or_init(|| {
            tracing::debug!("materializing lazy schema");
            (self.factory)()
        })
    }
}

impl<S, F> fmt::Debug for LazySchema<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySchema")
            .field("materialized", &self.cell.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<S, F> Schema for LazySchema<S, F>
where
    S: Schema,
    F: Fn() -> S + Send + Sync,
{
    type Output = S::Output;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<S::Output> {
        let schema = self.schema();
        ctx.descend(|ctx| schema.parse_in(input, ctx))
    }

    fn kind(&self) -> &'static str {
        "lazy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{array, int, lazy, object, string};
    use crate::schema::{BoxedSchema, SchemaExt};
    use serde_json::json;
    use sieve_core::{IssueKind, ParseConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Node {
        name: String,
        children: Vec<Node>,
    }

    fn node() -> BoxedSchema<Node> {
        lazy(|| {
            object::<Node>()
                .field("name", string(), |n: &mut Node, v| n.name = v)
                .field("children", array(node()).optional(), |n: &mut Node, v| {
                    n.children = v.unwrap_or_default()
                })
        })
        .boxed()
    }

    #[test]
    fn test_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            int()
        });
        assert!(!schema.is_materialized());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(schema.parse(1).is_success());
        assert!(schema.parse(2).is_success());
        assert!(schema.is_materialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recursive_tree() {
        let input = json!({
            "name": "root",
            "children": [
                {"name": "a", "children": [{"name": "a1"}]},
                {"name": "b"}
            ]
        });
        let tree = node().parse(&input).into_value().unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children[0].name, "a1");
    }

    #[test]
    fn test_recursive_issue_paths() {
        let input = json!({"name": "root", "children": [{"name": 1}]});
        let r = node().parse(&input);
        assert_eq!(
            r.error_messages(),
            vec!["Field 'children': [0]: Field 'name': expected string, received integer"]
        );
    }

    #[test]
    fn test_depth_limit_fails_gracefully() {
        let config = ParseConfig {
            max_depth: 3,
            ..ParseConfig::default()
        };
        let input = json!({"name": "1", "children": [{"name": "2", "children": [
            {"name": "3", "children": [{"name": "4"}]}
        ]}]});
        let r = node().parse_with(&input, ParseContext::new(&config));
        assert_eq!(r.issues().len(), 1);
        assert_eq!(r.issues()[0].kind(), IssueKind::DepthExceeded);
        assert_eq!(r.issues()[0].path().len(), 6);
    }
}
