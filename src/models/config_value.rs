//! Loosely-typed configuration tree
//!
//! Persisted settings are JSON documents whose shape drifts between releases.
//! `ConfigValue` models them as an explicit sum type so the reconciler can
//! match on shape instead of sniffing for "plain objects".

use std::collections::BTreeMap;
use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Number, Value};

/// A recursively typed JSON-like value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    /// Exact JSON number, so integers survive a round trip untouched
    Number(Number),
    String(String),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Build an empty mapping
    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Build a number from an f64; non-finite input becomes `Null`
    pub fn from_f64(n: f64) -> Self {
        Number::from_f64(n).map(Self::Number).unwrap_or(Self::Null)
    }

    /// Convert any serializable value into a tree
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::from)
    }

    /// Deserialize the tree into a typed value
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::from(self.clone()))
    }

    /// Parse JSON text into a tree
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Value>(text).map(Self::from)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "mapping",
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(obj) => {
                Self::Map(obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Null => Value::Null,
            ConfigValue::Bool(b) => Value::Bool(b),
            ConfigValue::Number(n) => Value::Number(n),
            ConfigValue::String(s) => Value::String(s),
            ConfigValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            ConfigValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::from(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_value() {
        let value = ConfigValue::from(json!({"a": 1, "b": [true, null, "x"]}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get("a"), Some(&ConfigValue::from(1i64)));
        assert_eq!(
            map.get("b").and_then(|b| b.as_list()).map(|l| l.len()),
            Some(3)
        );
    }

    #[test]
    fn test_integers_stay_integers() {
        let value = ConfigValue::parse(r#"{"days": 5, "budget": 1200.5}"#).unwrap();
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"budget":1200.5,"days":5}"#);
    }

    #[test]
    fn test_typed_conversion() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let tree = ConfigValue::from_serializable(&Point { x: 1, y: 2 }).unwrap();
        assert!(tree.is_map());
        assert_eq!(tree.get("x"), Some(&ConfigValue::from(1i64)));

        let back: Point = tree.to_typed().unwrap();
        assert_eq!(back, Point { x: 1, y: 2 });
    }

    #[test]
    fn test_non_finite_number_is_null() {
        assert!(ConfigValue::from_f64(f64::NAN).is_null());
        assert_eq!(ConfigValue::from_f64(2.5).as_f64(), Some(2.5));
    }

    #[test]
    fn test_kind() {
        assert_eq!(ConfigValue::Null.kind(), "null");
        assert_eq!(ConfigValue::from("x").kind(), "string");
        assert_eq!(ConfigValue::map().kind(), "mapping");
        assert_eq!(ConfigValue::List(vec![]).kind(), "list");
    }
}
