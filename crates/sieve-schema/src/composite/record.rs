//! Record (string-keyed map) schema.
//!
//! Every key is validated as a string scalar against the key schema and
//! every value against the value schema. Key issues are tagged `Key 'k'`,
//! value issues `['k']`, and both are collected across the whole map.

use std::collections::BTreeMap;

use sieve_core::{PathSegment, ValidationResult, Value};

use super::expect_map;
use crate::context::ParseContext;
use crate::schema::Schema;

/// A map with uniformly typed keys and values.
#[derive(Debug, Clone)]
pub struct RecordSchema<K, V> {
    key: K,
    value: V,
}

impl<K, V> RecordSchema<K, V>
where
    K: Schema,
    K::Output: Ord,
    V: Schema,
{
    /// Keys validated by `key`, values by `value`.
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K, V> Schema for RecordSchema<K, V>
where
    K: Schema,
    K::Output: Ord,
    V: Schema,
{
    type Output = BTreeMap<K::Output, V::Output>;

    fn parse_in(&self, input: &Value, ctx: &mut ParseContext<'_>) -> ValidationResult<Self::Output> {
        let map = match expect_map(input) {
            Ok(map) => map,
            Err(issue) => return ValidationResult::fail(issue),
        };

        let mut out = BTreeMap::new();
        let mut issues = Vec::new();
        for (raw_key, raw_value) in map.iter() {
            let key = self
                .key
                .parse_in(&Value::string(raw_key), ctx)
                .at(PathSegment::Key(raw_key.to_string()));
            let value = self
                .value
                .parse_in(raw_value, ctx)
                .at(PathSegment::Entry(raw_key.to_string()));
            match (key, value) {
                (ValidationResult::Success(k), ValidationResult::Success(v)) => {
                    out.insert(k, v);
                }
                (k, v) => {
                    issues.extend_from_slice(k.issues());
                    issues.extend_from_slice(v.issues());
                }
            }
        }
        ValidationResult::from_issues(issues, || out)
    }

    fn kind(&self) -> &'static str {
        "record"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{int, string};
    use crate::schema::SchemaExt;
    use serde_json::json;

    #[test]
    fn test_record_parses_all_entries() {
        let schema = RecordSchema::new(string(), int());
        let out = schema.parse(&json!({"a": 1, "b": "2"})).into_value().unwrap();
        assert_eq!(out.get("a"), Some(&1));
        assert_eq!(out.get("b"), Some(&2));
    }

    #[test]
    fn test_record_accumulates_key_and_value_issues() {
        let schema = RecordSchema::new(string().min(2), int());
        let r = schema.parse(&json!({"a": 1, "bb": "x", "cc": 3}));
        assert_eq!(
            r.error_messages(),
            vec![
                "Key 'a': expected at least 2 character(s), received 1",
                "['bb']: expected integer, received string \"x\"",
            ]
        );
    }

    #[test]
    fn test_record_requires_map() {
        let r = RecordSchema::new(string(), int()).parse(vec![1]);
        assert_eq!(r.error_messages(), vec!["expected map, received sequence"]);
    }

    #[test]
    fn test_record_with_typed_keys() {
        let schema = RecordSchema::new(crate::coerce::int(), string());
        let out = schema.parse(&json!({"10": "ten", "2": "two"})).into_value().unwrap();
        assert_eq!(out.keys().copied().collect::<Vec<_>>(), vec![2, 10]);
    }
}
