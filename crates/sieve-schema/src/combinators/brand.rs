//! Nominal tagging.

use std::borrow::Cow;

use sieve_core::{ValidationResult, Value};

use crate::context::ParseContext;
use crate::schema::Schema;

/// Attaches a tag to a schema's identity. Parsing is delegated unchanged.
#[derive(Debug, Clone)]
pub struct Branded<S> {
    inner: S,
    tag: String,
}

impl<S> Branded<S> {
    pub(crate) fn new(inner: S, tag: impl Into<String>) -> Self {
        Self {
            inner,
            tag: tag.into(),
        }
    }

    /// The brand tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl<S: Schema> Schema for Branded<S> {
    type Output = S::Output;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<S::Output> {
        self.inner.parse_in(input, ctx)
    }

    fn kind(&self) -> &'static str {
        "brand"
    }

    fn accepts_missing(&self) -> bool {
        self.inner.accepts_missing()
    }

    fn default_output(&self) -> Option<S::Output> {
        self.inner.default_output()
    }

    fn brand_tag(&self) -> Option<&str> {
        Some(&self.tag)
    }

    fn prepare<'v>(&self, input: &'v Value) -> Cow<'v, Value> {
        self.inner.prepare(input)
    }

    fn parse_prepared(
        &self,
        prepared: &Value,
        ctx: &mut ParseContext<'_>,
    ) -> ValidationResult<S::Output> {
        self.inner.parse_prepared(prepared, ctx)
    }
}

#[cfg(test)]
mod tests {
    use sieve_core::Value;

    use crate::factory::string;
    use crate::schema::{Schema, SchemaExt};

    #[test]
    fn test_brand_leaves_output_unchanged() {
        let plain = string().email();
        let branded = string().email().brand("Email");
        assert_eq!(branded.tag(), "Email");
        assert_eq!(branded.brand_tag(), Some("Email"));
        assert_eq!(branded.parse("a@b.io"), plain.parse("a@b.io"));
        assert_eq!(branded.parse("nope"), plain.parse("nope"));
    }

    #[test]
    fn test_brand_forwards_preprocessing() {
        let schema = string()
            .preprocess(|v: &Value| match v.as_str() {
                Some("-") => Value::Null,
                _ => v.clone(),
            })
            .brand("Code")
            .optional();
        assert_eq!(schema.parse("-").into_value(), Some(None));
        assert_eq!(schema.parse("x").into_value(), Some(Some("x".to_string())));
    }

    #[test]
    fn test_wrappers_keep_the_tag() {
        let schema = string().brand("UserId").optional();
        assert_eq!(schema.brand_tag(), Some("UserId"));
    }
}
