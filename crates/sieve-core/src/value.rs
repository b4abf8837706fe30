//! # Canonical Input Value
//!
//! Defines [`Value`], the single shape every schema validates. Inputs arrive
//! as JSON documents, YAML documents, association lists, typed records or
//! plain Rust scalars; all of them are normalized here before any schema sees
//! them.
//!
//! ## Normalization Rules
//!
//! 1. **Integers** that fit in `i64` become [`Scalar::Int`]. Unsigned values
//!    above `i64::MAX` become [`Scalar::Decimal`] so no precision is lost.
//! 2. **Floats** become [`Scalar::Float`].
//! 3. **Maps** keep insertion order. Duplicate keys keep the first position
//!    and the last value.
//! 4. **YAML** map keys must be strings, numbers or booleans; numbers and
//!    booleans are stringified. Tags are ignored.
//! 5. **Typed records** are serialized straight into a [`Value`], so whatever
//!    the record's `Serialize` impl emits is what the schema sees. Non-finite
//!    floats survive; dates and decimals arrive as their canonical text,
//!    which the date and decimal schemas read back exactly.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::NormalizeError;
use crate::ser::ValueSerializer;

/// A primitive leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE 754 double.
    Float(f64),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
    /// UTF-8 string.
    String(String),
    /// Calendar date without a time zone.
    Date(NaiveDate),
    /// UTC instant.
    DateTime(DateTime<Utc>),
}

impl Scalar {
    /// Short type name used in mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Decimal(_) => "decimal",
            Scalar::String(_) => "string",
            Scalar::Date(_) => "date",
            Scalar::DateTime(_) => "datetime",
        }
    }

    /// Render the scalar as plain text, without quoting strings.
    pub fn render(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Decimal(d) => d.to_string(),
            Scalar::String(s) => s.clone(),
            Scalar::Date(d) => d.format("%Y-%m-%d").to_string(),
            Scalar::DateTime(dt) => dt.to_rfc3339(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{s:?}"),
            other => f.write_str(&other.render()),
        }
    }
}

/// An insertion-ordered string-keyed map.
///
/// Equality ignores order, as for JSON objects; iteration follows insertion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map {
    entries: IndexMap<String, Value>,
}

impl Map {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert or replace a key. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key, returning its value. Later keys move up one place.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Map::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The canonical input value every schema operates over.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent or explicit null.
    #[default]
    Null,
    /// A primitive leaf.
    Scalar(Scalar),
    /// An ordered list.
    Sequence(Vec<Value>),
    /// An insertion-ordered string-keyed map.
    Map(Map),
}

impl Value {
    /// Shorthand for a string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    /// Build a map from an association list.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(pairs.into_iter().collect())
    }

    /// Short type name used in mismatch messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(s) => s.kind_name(),
            Value::Sequence(_) => "sequence",
            Value::Map(_) => "map",
        }
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The scalar, if this is one.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The string contents, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// The map, if this is one.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The items, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Normalize a JSON document.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Scalar(Scalar::Decimal(Decimal::from(u)))
                } else {
                    // Every remaining serde_json number is representable as f64.
                    Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_json::Value::String(s) => Value::string(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Normalize a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnsupportedKey`] for map keys that are not
    /// strings, numbers or booleans.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Self, NormalizeError> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Scalar(Scalar::Bool(*b))),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Scalar(Scalar::Int(i)))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::Scalar(Scalar::Decimal(Decimal::from(u))))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Scalar(Scalar::Float(f)))
                } else {
                    Err(NormalizeError::UnsupportedNumber(n.to_string()))
                }
            }
            serde_yaml::Value::String(s) => Ok(Value::string(s.clone())),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Value>, NormalizeError> =
                    seq.iter().map(Value::from_yaml).collect();
                Ok(Value::Sequence(items?))
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = Map::new();
                for (k, v) in mapping {
                    let key = match k {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => return Err(NormalizeError::UnsupportedKey(format!("{other:?}"))),
                    };
                    map.insert(key, Value::from_yaml(v)?);
                }
                Ok(Value::Map(map))
            }
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }

    /// Normalize any serializable record by reflecting it through serde.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::UnsupportedKey`] for a map key that is not a
    /// scalar, and [`NormalizeError::Serialization`] when the record's own
    /// `Serialize` impl fails.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, NormalizeError> {
        value.serialize(ValueSerializer)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Scalar(s) => write!(f, "{s}"),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ─── Native conversions ─────────────────────────────────────────────

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Scalar(Scalar::Int(i64::from(u)))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Value::Scalar(Scalar::Int(i)),
            Err(_) => Value::Scalar(Scalar::Decimal(Decimal::from(u))),
        }
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::from(u as u64)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Scalar(Scalar::Float(f64::from(f)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Scalar(Scalar::Decimal(d))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Scalar(Scalar::Date(d))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Scalar(Scalar::DateTime(dt))
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(map: BTreeMap<String, V>) -> Self {
        Value::Map(map.into_iter().collect())
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Value {
    /// Hash maps have no order of their own; keys are sorted for determinism.
    fn from(map: HashMap<String, V>) -> Self {
        let mut entries: Vec<(String, V)> = map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries.into_iter().collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(&json)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_numbers_normalize() {
        assert_eq!(Value::from(json!(42)), Value::Scalar(Scalar::Int(42)));
        assert_eq!(Value::from(json!(1.5)), Value::Scalar(Scalar::Float(1.5)));
        assert_eq!(
            Value::from(json!(u64::MAX)),
            Value::Scalar(Scalar::Decimal(Decimal::from(u64::MAX)))
        );
    }

    #[test]
    fn test_json_object_keeps_order() {
        let v = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let map = v.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha"), Some(&Value::from(2)));
    }

    #[test]
    fn test_yaml_mapping_keeps_order() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("zeta: 1\nalpha: 2\n").unwrap();
        let value = Value::from_yaml(&yaml).unwrap();
        let keys: Vec<&str> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_large_object_normalizes() {
        let object: serde_json::Map<String, serde_json::Value> =
            (0..50_000).map(|i| (format!("k{i}"), json!(i))).collect();
        let value = Value::from(serde_json::Value::Object(object));
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 50_000);
        assert_eq!(map.keys().next(), Some("k0"));
        assert_eq!(map.get("k49999"), Some(&Value::from(49_999)));
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a: Map = vec![("a", 1), ("b", 2)].into_iter().collect();
        let b: Map = vec![("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_remove_keeps_order() {
        let mut map: Map = vec![("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        map.remove("a");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_association_list_matches_map() {
        let from_pairs = Value::from_pairs(vec![("name", Value::from("x")), ("age", Value::from(3))]);
        let mut map = Map::new();
        map.insert("name", "x");
        map.insert("age", 3);
        assert_eq!(from_pairs, Value::Map(map));
    }

    #[test]
    fn test_map_insert_replaces_in_place() {
        let mut map = Map::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(Value::from(1)));
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_map_remove() {
        let mut map: Map = vec![("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(map.remove("a"), Some(Value::from(1)));
        assert!(!map.contains_key("a"));
        assert_eq!(map.remove("zzz"), None);
    }

    #[test]
    fn test_yaml_to_value_conversion() {
        let yaml_str = r#"
name: widget
count: 42
enabled: true
ratio: 0.5
items:
  - one
  - two
1: numeric-key
"#;
        let yaml: serde_yaml::Value = serde_yaml::from_str(yaml_str).unwrap();
        let value = Value::from_yaml(&yaml).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("widget")));
        assert_eq!(map.get("count"), Some(&Value::from(42)));
        assert_eq!(map.get("enabled"), Some(&Value::from(true)));
        assert_eq!(map.get("ratio"), Some(&Value::from(0.5)));
        assert_eq!(map.get("1"), Some(&Value::from("numeric-key")));
        assert_eq!(
            map.get("items"),
            Some(&Value::from(vec!["one", "two"]))
        );
    }

    #[test]
    fn test_yaml_rejects_sequence_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: 1\n").unwrap();
        assert!(matches!(
            Value::from_yaml(&yaml),
            Err(NormalizeError::UnsupportedKey(_))
        ));
    }

    #[test]
    fn test_typed_record_reflects_to_map() {
        #[derive(Serialize)]
        struct Point {
            x: i64,
            y: i64,
        }
        let v = Value::from_serialize(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(v, Value::from_pairs(vec![("x", 1), ("y", 2)]));
    }

    #[test]
    fn test_option_and_u64_conversions() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
        assert_eq!(Value::from(7u64), Value::Scalar(Scalar::Int(7)));
    }

    #[test]
    fn test_display_rendering() {
        let v = Value::from(json!({"a": [1, "x", null]}));
        assert_eq!(v.to_string(), r#"{"a": [1, "x", null]}"#);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::from(true).kind_name(), "boolean");
        assert_eq!(Value::from(vec![1]).kind_name(), "sequence");
        assert_eq!(Value::Map(Map::new()).kind_name(), "map");
    }
}
