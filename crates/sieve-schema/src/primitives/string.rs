//! String schema.
//!
//! Constraint order: exact length, minimum, maximum, non-empty, then format
//! checks in the order they were declared. Lengths count Unicode scalar
//! values, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use sieve_core::{Issue, Scalar, ValidationResult, Value};

use super::{coerce_input, Coercion};
use crate::bounds::LengthBounds;
use crate::context::ParseContext;
use crate::schema::Schema;

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

#[derive(Debug, Clone)]
enum StringFormat {
    Pattern(Regex),
    Email,
    Url,
    Uuid,
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    OneOf(Vec<String>),
}

impl StringFormat {
    fn check(&self, s: &str) -> Option<Issue> {
        let failure = match self {
            StringFormat::Pattern(re) => {
                (!re.is_match(s)).then(|| format!("must match pattern {}", re.as_str()))
            }
            StringFormat::Email => {
                let ok = match &*EMAIL_PATTERN {
                    Some(re) => re.is_match(s),
                    None => false,
                };
                (!ok).then(|| "must be a valid email address".to_string())
            }
            StringFormat::Url => url::Url::parse(s)
                .is_err()
                .then(|| "must be a valid URL".to_string()),
            StringFormat::Uuid => uuid::Uuid::parse_str(s)
                .is_err()
                .then(|| "must be a valid UUID".to_string()),
            StringFormat::StartsWith(prefix) => {
                (!s.starts_with(prefix.as_str())).then(|| format!("must start with {prefix:?}"))
            }
            StringFormat::EndsWith(suffix) => {
                (!s.ends_with(suffix.as_str())).then(|| format!("must end with {suffix:?}"))
            }
            StringFormat::Contains(needle) => {
                (!s.contains(needle.as_str())).then(|| format!("must contain {needle:?}"))
            }
            StringFormat::OneOf(options) => (!options.iter().any(|o| o == s))
                .then(|| format!("must be one of: {}", options.join(", "))),
        };
        failure.map(Issue::constraint)
    }
}

/// Validates UTF-8 strings.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    coercion: Option<Coercion>,
    trim: bool,
    bounds: LengthBounds,
    formats: Vec<StringFormat>,
}

impl StringSchema {
    /// A string schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Trim surrounding whitespace before checking and in the output.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Require exactly `n` characters.
    pub fn length(mut self, n: usize) -> Self {
        self.bounds.exact = Some(n);
        self
    }

    /// Require at least `n` characters.
    pub fn min(mut self, n: usize) -> Self {
        self.bounds.min = Some(n);
        self
    }

    /// Allow at most `n` characters.
    pub fn max(mut self, n: usize) -> Self {
        self.bounds.max = Some(n);
        self
    }

    /// Reject the empty string.
    pub fn non_empty(mut self) -> Self {
        self.bounds.non_empty = true;
        self
    }

    /// Require a regular-expression match.
    pub fn pattern(mut self, re: Regex) -> Self {
        self.formats.push(StringFormat::Pattern(re));
        self
    }

    /// Require an email-shaped string.
    pub fn email(mut self) -> Self {
        self.formats.push(StringFormat::Email);
        self
    }

    /// Require an absolute URL.
    pub fn url(mut self) -> Self {
        self.formats.push(StringFormat::Url);
        self
    }

    /// Require a UUID in any of its textual forms.
    pub fn uuid(mut self) -> Self {
        self.formats.push(StringFormat::Uuid);
        self
    }

    /// Require a prefix.
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.formats.push(StringFormat::StartsWith(prefix.into()));
        self
    }

    /// Require a suffix.
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.formats.push(StringFormat::EndsWith(suffix.into()));
        self
    }

    /// Require a substring.
    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.formats.push(StringFormat::Contains(needle.into()));
        self
    }

    /// Require one of a fixed set of values.
    pub fn one_of<I, T>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.formats
            .push(StringFormat::OneOf(options.into_iter().map(Into::into).collect()));
        self
    }

    fn check(&self, s: &str) -> Option<Issue> {
        if let Some(issue) = self.bounds.check(s.chars().count(), "character(s)") {
            return Some(issue);
        }
        self.formats.iter().find_map(|format| format.check(s))
    }
}

impl Schema for StringSchema {
    type Output = String;

    fn parse_in(&self, input: &Value, _ctx: &mut ParseContext<'_>) -> ValidationResult<String> {
        let input = coerce_input(input, self.coercion);
        let raw = match input.as_ref() {
            Value::Null => return ValidationResult::fail(Issue::null_not_allowed()),
            Value::Scalar(Scalar::String(s)) => s,
            other => return ValidationResult::fail(Issue::type_mismatch("string", other)),
        };
        let s = if self.trim {
            raw.trim().to_string()
        } else {
            raw.clone()
        };
        match self.check(&s) {
            Some(issue) => ValidationResult::fail(issue),
            None => ValidationResult::Success(s),
        }
    }

    fn kind(&self) -> &'static str {
        "string"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaExt;
    use sieve_core::IssueKind;

    #[test]
    fn test_accepts_string() {
        assert_eq!(StringSchema::new().parse("hi").into_value(), Some("hi".into()));
    }

    #[test]
    fn test_rejects_number_without_coercion() {
        let r = StringSchema::new().parse(5);
        assert_eq!(r.issues()[0].kind(), IssueKind::TypeMismatch);
        assert_eq!(r.error_messages(), vec!["expected string, received integer"]);
    }

    #[test]
    fn test_length_counts_characters() {
        let schema = StringSchema::new().max(3);
        assert!(schema.parse("äöü").is_success());
        assert!(schema.parse("äöüx").is_failure());
    }

    #[test]
    fn test_first_failing_constraint_only() {
        let schema = StringSchema::new().min(5).email().starts_with("x");
        let r = schema.parse("ab");
        assert_eq!(r.issues().len(), 1);
        assert!(r.issues()[0].message().contains("at least 5"));
    }

    #[test]
    fn test_formats_in_declaration_order() {
        let schema = StringSchema::new().starts_with("id-").uuid();
        let r = schema.parse("nope");
        assert_eq!(r.error_messages(), vec![r#"must start with "id-""#]);
    }

    #[test]
    fn test_email_url_uuid() {
        assert!(StringSchema::new().email().parse("a@b.co").is_success());
        assert!(StringSchema::new().email().parse("a@b").is_failure());
        assert!(StringSchema::new().url().parse("https://example.com/x").is_success());
        assert!(StringSchema::new().url().parse("not a url").is_failure());
        assert!(StringSchema::new()
            .uuid()
            .parse("67e55044-10b1-426f-9247-bb680e5fe0c8")
            .is_success());
    }

    #[test]
    fn test_pattern_and_one_of() {
        let schema = StringSchema::new().pattern(Regex::new(r"^[a-z]+$").unwrap());
        assert!(schema.parse("abc").is_success());
        assert!(schema.parse("ABC").is_failure());
        let colors = StringSchema::new().one_of(["red", "green"]);
        assert!(colors.parse("red").is_success());
        assert_eq!(
            colors.parse("blue").error_messages(),
            vec!["must be one of: red, green"]
        );
    }

    #[test]
    fn test_trim_applies_before_checks() {
        let schema = StringSchema::new().trim().length(2);
        assert_eq!(schema.parse("  ab ").into_value(), Some("ab".into()));
    }

    #[test]
    fn test_exact_length_mismatch_kind() {
        let r = StringSchema::new().length(4).parse("abc");
        assert_eq!(r.issues()[0].kind(), IssueKind::LengthMismatch);
    }
}
