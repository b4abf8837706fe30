//! # Engine Configuration
//!
//! [`ParseConfig`] holds the few knobs the engine exposes. Every field has a
//! default, so an empty document is a valid configuration.
//!
//! ```yaml
//! max_depth: 64
//! union_separator: " or "
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings that shape how schemas report and bound their work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Maximum nesting of recursive (lazy or referenced) schemas before the
    /// parse fails with `DepthExceeded`.
    pub max_depth: usize,
    /// Separator between candidate messages when a union is exhausted.
    pub union_separator: String,
    /// Message reported when a panic is trapped during `safe_parse`.
    pub fault_message: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            union_separator: " | ".to_string(),
            fault_message: "internal error during validation".to_string(),
        }
    }
}

impl ParseConfig {
    /// Load from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] for malformed YAML or unknown keys, and
    /// [`ConfigError::Invalid`] if `max_depth` is zero.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON or unknown keys, and
    /// [`ConfigError::Invalid`] if `max_depth` is zero.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.max_depth, 256);
        assert_eq!(config.union_separator, " | ");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ParseConfig::from_yaml_str("max_depth: 8\n").unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.fault_message, ParseConfig::default().fault_message);
    }

    #[test]
    fn test_json_config() {
        let config = ParseConfig::from_json_str(r#"{"union_separator": " or "}"#).unwrap();
        assert_eq!(config.union_separator, " or ");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            ParseConfig::from_yaml_str("max_dpeth: 3\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(matches!(
            ParseConfig::from_json_str(r#"{"max_depth": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }
}
