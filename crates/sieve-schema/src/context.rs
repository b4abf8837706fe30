//! # Parse Context
//!
//! Per-invocation state threaded through a parse: the active configuration,
//! the optional schema registry used by reference nodes, and the current
//! recursion depth. A context is created fresh for each top-level call, so
//! schemas themselves stay read-only while parsing.

use once_cell::sync::Lazy;
use sieve_core::{Issue, IssueKind, ParseConfig, ValidationResult};

use crate::registry::SchemaRegistry;

static DEFAULT_CONFIG: Lazy<ParseConfig> = Lazy::new(ParseConfig::default);

/// State carried through one top-level parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    config: &'a ParseConfig,
    registry: Option<&'a SchemaRegistry>,
    depth: usize,
}

impl Default for ParseContext<'_> {
    fn default() -> Self {
        Self::new(&DEFAULT_CONFIG)
    }
}

impl<'a> ParseContext<'a> {
    /// Start a parse with the given configuration and no registry.
    pub fn new(config: &'a ParseConfig) -> Self {
        Self {
            config,
            registry: None,
            depth: 0,
        }
    }

    /// Attach a registry for `reference` nodes to resolve against.
    pub fn with_registry(mut self, registry: &'a SchemaRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &'a ParseConfig {
        self.config
    }

    /// The attached registry, if any.
    pub fn registry(&self) -> Option<&'a SchemaRegistry> {
        self.registry
    }

    /// Current recursion depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `f` one recursion level deeper, failing instead of recursing past
    /// `max_depth`.
    pub(crate) fn descend<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ValidationResult<T>,
    ) -> ValidationResult<T> {
        if self.depth >= self.config.max_depth {
            tracing::debug!(depth = self.depth, "recursion depth limit reached");
            return ValidationResult::fail(Issue::new(
                IssueKind::DepthExceeded,
                format!("maximum nesting depth of {} exceeded", self.config.max_depth),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Reset the depth after an unwind skipped the matching `descend` exits.
    pub(crate) fn restore_depth(&mut self, depth: usize) {
        self.depth = depth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descend_restores_depth() {
        let mut ctx = ParseContext::default();
        let r = ctx.descend(|inner| {
            assert_eq!(inner.depth(), 1);
            ValidationResult::Success(())
        });
        assert!(r.is_success());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_descend_stops_at_limit() {
        let config = ParseConfig {
            max_depth: 1,
            ..ParseConfig::default()
        };
        let mut ctx = ParseContext::new(&config);
        let r = ctx.descend(|inner| inner.descend(|_| ValidationResult::Success(())));
        assert_eq!(r.issues()[0].kind(), IssueKind::DepthExceeded);
    }
}
