//! # Error Types
//!
//! Validation failures are values ([`crate::ValidationResult`]); the types
//! here cover the places where a Rust `Err` is the right shape:
//!
//! - [`ParseError`]: the aggregate returned by `try_parse`, carrying the
//!   full ordered issue list.
//! - [`NormalizeError`]: an input could not be brought into canonical form.
//! - [`ConfigError`]: engine configuration could not be loaded.

use thiserror::Error;

use crate::issue::Issue;

/// Aggregate validation failure carrying every issue, in order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed: {}", join_issues(.issues))]
pub struct ParseError {
    issues: Vec<Issue>,
}

impl ParseError {
    /// Wrap an issue list.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// The issues, in the order they were found.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consume into the issue list.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error while converting host input into a canonical value.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The record's `Serialize` impl reported an error.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A map key was neither a string, number nor boolean.
    #[error("unsupported map key: {0}")]
    UnsupportedKey(String),

    /// A number has no canonical scalar form.
    #[error("unsupported number: {0}")]
    UnsupportedNumber(String),
}

/// Error while loading engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML could not be parsed into the configuration shape.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON could not be parsed into the configuration shape.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
