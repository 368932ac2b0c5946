//! Configuration value types
//!
//! A configuration tree is a [`Value`]: scalars (string, int, float, bool,
//! null), sequences, or mappings. Mappings keep insertion order, so "first
//! key holding X" always means the same key for the same tree.

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;
use std::fmt;

/// A node of a configuration tree
///
/// Deserializes from any self-describing serde format. Mapping keys that are
/// scalars (`0:`, `true:`, `1.5:`) are kept under their textual form, so a
/// YAML key `0` and a JSON key `"0"` address the same entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
#[derive(Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Sequence of values (a list of records when the items are mappings)
    Sequence(Vec<Value>),
    /// Mapping of string keys to values
    Mapping(IndexMap<String, Value>),
}

/// The address of an entry inside a mapping or a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    /// A mapping key
    Name(&'a str),
    /// A sequence position
    Index(usize),
}

impl Key<'_> {
    /// Convert the key into an owned value (`String` or `Integer`)
    pub fn to_value(&self) -> Value {
        match self {
            Key::Name(name) => Value::String((*name).to_string()),
            Key::Index(idx) => Value::Integer(*idx as i64),
        }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl Value {
    /// Check if this value is a non-empty sequence, i.e. a list of records
    pub fn is_record_list(&self) -> bool {
        self.as_sequence().is_some_and(|seq| !seq.is_empty())
    }

    /// Get as i64 if this is an Integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is a Sequence
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get a direct child by key.
    ///
    /// Mappings are looked up by key. Sequences accept a canonical decimal
    /// index (`"0"`, `"12"`, but not `"01"` or `"+1"`). Scalars have no
    /// children. Existence is all that matters: a child holding `null`,
    /// `false`, `0` or an empty collection is returned like any other.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(map) => map.get(key),
            Value::Sequence(seq) => parse_index(key).and_then(|idx| seq.get(idx)),
            _ => None,
        }
    }

    /// List the keys of this value's direct children, in order
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Mapping(map) => map.keys().cloned().collect(),
            Value::Sequence(seq) => (0..seq.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Find the first child strictly equal to `needle` and return its key
    pub fn find_key(&self, needle: &Value) -> Option<Key<'_>> {
        match self {
            Value::Mapping(map) => map
                .iter()
                .find(|(_, v)| *v == needle)
                .map(|(k, _)| Key::Name(k.as_str())),
            Value::Sequence(seq) => seq.iter().position(|v| v == needle).map(Key::Index),
            _ => None,
        }
    }

    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(seq) => {
                write!(f, "[")?;
                for (i, v) in seq.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Integer(i))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Value, E> {
        // Beyond i64::MAX the value can only be kept approximately
        Ok(i64::try_from(u).map_or(Value::Float(u as f64), Value::Integer))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Float(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((MapKey(key), value)) = map.next_entry::<MapKey, Value>()? {
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }
}

/// A mapping key in textual form
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<MapKey, E> {
        Ok(MapKey(b.to_string()))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<MapKey, E> {
        Ok(MapKey(i.to_string()))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> Result<MapKey, E> {
        Ok(MapKey(u.to_string()))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<MapKey, E> {
        Ok(MapKey(f.to_string()))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<MapKey, E> {
        Ok(MapKey(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<MapKey, E> {
        Ok(MapKey(s))
    }

    fn visit_unit<E: de::Error>(self) -> Result<MapKey, E> {
        Ok(MapKey("null".to_string()))
    }
}

/// Parse a sequence index, rejecting signs and leading zeros
fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key.len() == 1 || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("12"), Some(12));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("x"), None);
    }

    #[test]
    fn test_get_mapping_child() {
        let value = yaml("host: localhost\nport: 5432\n");

        assert_eq!(value.get("host").unwrap().as_str(), Some("localhost"));
        assert_eq!(value.get("port").unwrap().as_i64(), Some(5432));
        assert!(value.get("user").is_none());
    }

    #[test]
    fn test_get_falsy_children_exist() {
        let value = yaml(
            r#"
zero: 0
disabled: false
empty: ""
none: ~
list: []
"#,
        );

        assert_eq!(value.get("zero"), Some(&Value::Integer(0)));
        assert_eq!(value.get("disabled"), Some(&Value::Bool(false)));
        assert_eq!(value.get("empty"), Some(&Value::String(String::new())));
        assert_eq!(value.get("none"), Some(&Value::Null));
        assert_eq!(value.get("list"), Some(&Value::Sequence(vec![])));
    }

    #[test]
    fn test_get_sequence_index() {
        let value = yaml("[a, b]");

        assert_eq!(value.get("1").unwrap().as_str(), Some("b"));
        assert!(value.get("2").is_none());
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_get_on_scalar() {
        assert!(Value::Integer(3).get("0").is_none());
        assert!(Value::String("abc".into()).keys().is_empty());
    }

    #[test]
    fn test_keys_in_order() {
        let value = yaml("b: 1\na: 2\nc: 3\n");
        assert_eq!(value.keys(), vec!["b", "a", "c"]);

        let seq = yaml("[x, y]");
        assert_eq!(seq.keys(), vec!["0", "1"]);
    }

    #[test]
    fn test_find_key_first_match() {
        let value = yaml("primary: eu\nbackup: eu\nlocal: us\n");

        assert_eq!(value.find_key(&"eu".into()), Some(Key::Name("primary")));
        assert_eq!(value.find_key(&"us".into()), Some(Key::Name("local")));
        assert_eq!(value.find_key(&"ap".into()), None);
    }

    #[test]
    fn test_find_key_is_strict() {
        let value = yaml("a: 1\nb: \"1\"\nc: 1.0\n");

        assert_eq!(value.find_key(&Value::String("1".into())), Some(Key::Name("b")));
        assert_eq!(value.find_key(&Value::Float(1.0)), Some(Key::Name("c")));
        assert_eq!(value.find_key(&Value::Bool(true)), None);
    }

    #[test]
    fn test_find_key_in_sequence() {
        let value = yaml("[red, green]");
        assert_eq!(value.find_key(&"red".into()), Some(Key::Index(0)));
    }

    #[test]
    fn test_record_list() {
        assert!(yaml("[{id: 1}]").is_record_list());
        assert!(!Value::Sequence(vec![]).is_record_list());
        assert!(!yaml("id: 1").is_record_list());
    }

    #[test]
    fn test_key_to_value() {
        assert_eq!(Key::Name("0").to_value(), Value::String("0".into()));
        assert_eq!(Key::Index(0).to_value(), Value::Integer(0));
        assert_eq!(Key::Index(3).to_string(), "3");
    }

    #[test]
    fn test_deserialize_scalar_keys() {
        let value = yaml("0: none\n404: missing\ntrue: yes\n1.5: half\n~: nothing\n");

        assert_eq!(value.keys(), vec!["0", "404", "true", "1.5", "null"]);
        assert_eq!(value.get("404").and_then(Value::as_str), Some("missing"));
        assert_eq!(value.find_key(&"none".into()), Some(Key::Name("0")));
    }

    #[test]
    fn test_deserialize_nested_integer_keys() {
        let value = yaml("codes:\n  0: none\n  1: basic\n");
        let codes = value.get("codes").unwrap();

        assert_eq!(codes.get("1").and_then(Value::as_str), Some("basic"));
    }

    #[test]
    fn test_deserialize_rejects_collection_keys() {
        assert!(serde_yaml::from_str::<Value>("? [a, b]\n: pair\n").is_err());
    }

    #[test]
    fn test_deserialize_large_unsigned() {
        let value: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(value.type_name(), "float");

        let value: Value = serde_json::from_str("42").unwrap();
        assert_eq!(value, Value::Integer(42));
    }

    #[test]
    fn test_display() {
        let value = yaml("name: api\nports: [80, 443]\n");
        assert_eq!(value.to_string(), "{name: api, ports: [80, 443]}");
    }

    #[test]
    fn test_deserialize_from_json() {
        let value: Value = serde_json::from_str(r#"{"a": [1, 2.5, null, true]}"#).unwrap();
        let items = value.get("a").unwrap().as_sequence().unwrap();

        assert_eq!(
            items,
            &[
                Value::Integer(1),
                Value::Float(2.5),
                Value::Null,
                Value::Bool(true)
            ]
        );
    }
}
