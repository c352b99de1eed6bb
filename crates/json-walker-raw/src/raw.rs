//! The raw value wrapped by json-walker nodes.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::key::Key;

/// Slots of a keyed array, in insertion order.
pub type Slots = IndexMap<Key, Raw>;

/// Properties of an object, in insertion order.
pub type Map = IndexMap<String, Raw>;

/// Dynamically-shaped data: scalars, keyed arrays and objects.
///
/// Unlike [`serde_json::Value`], arrays carry explicit slot keys so that an
/// associative array stays an array (and not an object) across edits.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Raw {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Keyed array. A *numeric* array has keys `0..len` in order.
    Array(Slots),
    /// Key to value mapping with unique string keys.
    Object(Map),
}

impl Raw {
    /// Build a numeric array from values.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker_raw::{Key, Raw};
    ///
    /// let arr = Raw::array([Raw::from(1), Raw::from(2)]);
    /// assert!(arr.is_numeric_array());
    /// assert_eq!(arr.as_slots().unwrap().get(&Key::Index(1)), Some(&Raw::from(2)));
    /// ```
    pub fn array<I: IntoIterator<Item = Raw>>(items: I) -> Self {
        Raw::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::from(i), v))
                .collect(),
        )
    }

    /// Build an object from key/value pairs.
    pub fn object<K: Into<String>, I: IntoIterator<Item = (K, Raw)>>(entries: I) -> Self {
        Raw::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Raw::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Raw::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Raw::Object(_))
    }

    /// Arrays and objects are containers, everything else is a leaf.
    pub fn is_container(&self) -> bool {
        self.is_array() || self.is_object()
    }

    /// `true` for arrays whose keys are exactly `0..len` in order.
    ///
    /// This is the structural equivalent of "the canonical encoding starts
    /// with `[`".
    pub fn is_numeric_array(&self) -> bool {
        match self {
            Raw::Array(slots) => is_sequence(slots.keys()),
            _ => false,
        }
    }

    pub fn as_slots(&self) -> Option<&Slots> {
        match self {
            Raw::Array(slots) => Some(slots),
            _ => None,
        }
    }

    pub fn as_slots_mut(&mut self) -> Option<&mut Slots> {
        match self {
            Raw::Array(slots) => Some(slots),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Raw::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Raw::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Raw::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the value's type.
    ///
    /// One of `null`, `boolean`, `integer`, `float`, `string`, `array`,
    /// `object`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Raw::Null => "null",
            Raw::Bool(_) => "boolean",
            Raw::Number(n) if n.is_f64() => "float",
            Raw::Number(_) => "integer",
            Raw::String(_) => "string",
            Raw::Array(_) => "array",
            Raw::Object(_) => "object",
        }
    }

    /// Look up a direct child by path segment.
    ///
    /// Array segments are parsed with [`Key::parse`]; object segments are
    /// used verbatim.
    pub fn child(&self, segment: &str) -> Option<&Raw> {
        match self {
            Raw::Array(slots) => slots.get(&Key::parse(segment)),
            Raw::Object(map) => map.get(segment),
            _ => None,
        }
    }

    /// Write `value` at the nested location named by `segments`.
    ///
    /// The terminal segment is inserted (or overwritten) in its container.
    /// Intermediate segments must already exist and be containers; when one
    /// is missing nothing is written. Returns whether a write happened.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker_raw::Raw;
    /// use serde_json::json;
    ///
    /// let mut raw = Raw::from(json!({"a": {"b": 1}}));
    /// assert!(raw.write_path(&["a", "c"], Raw::from(2)));
    /// assert!(!raw.write_path(&["x", "y"], Raw::from(3)));
    /// assert_eq!(raw, Raw::from(json!({"a": {"b": 1, "c": 2}})));
    /// ```
    pub fn write_path(&mut self, segments: &[&str], value: Raw) -> bool {
        let Some((head, rest)) = segments.split_first() else {
            *self = value;
            return true;
        };
        match self {
            Raw::Array(slots) => {
                let key = Key::parse(head);
                if rest.is_empty() {
                    slots.insert(key, value);
                    return true;
                }
                match slots.get_mut(&key) {
                    Some(next) => next.write_path(rest, value),
                    None => false,
                }
            }
            Raw::Object(map) => {
                if rest.is_empty() {
                    map.insert((*head).to_string(), value);
                    return true;
                }
                match map.get_mut(*head) {
                    Some(next) => next.write_path(rest, value),
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Convert into a [`serde_json::Value`].
    ///
    /// Associative arrays become JSON objects.
    pub fn to_json(&self) -> Value {
        match self {
            Raw::Null => Value::Null,
            Raw::Bool(b) => Value::Bool(*b),
            Raw::Number(n) => Value::Number(n.clone()),
            Raw::String(s) => Value::String(s.clone()),
            Raw::Array(slots) if is_sequence(slots.keys()) => {
                Value::Array(slots.values().map(Raw::to_json).collect())
            }
            Raw::Array(slots) => Value::Object(
                slots
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
            Raw::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// `true` when `keys` are exactly the indices `0..len` in order.
///
/// # Example
///
/// ```
/// use json_walker_raw::{is_sequence, Key};
///
/// assert!(is_sequence(&[Key::Index(0), Key::Index(1)]));
/// assert!(!is_sequence(&[Key::Index(1)]));
/// assert!(is_sequence(&[] as &[Key]));
/// ```
pub fn is_sequence<'a, I>(keys: I) -> bool
where
    I: IntoIterator<Item = &'a Key>,
{
    keys.into_iter()
        .enumerate()
        .all(|(i, key)| key.as_index() == Some(i as i64))
}

/// Renumber the integer keys of `slots` contiguously from zero.
///
/// Name keys keep their name and position.
///
/// # Example
///
/// ```
/// use json_walker_raw::{reindex, Key, Raw, Slots};
///
/// let mut slots = Slots::new();
/// slots.insert(Key::Index(4), Raw::from("a"));
/// slots.insert(Key::Name("x".into()), Raw::from("b"));
/// slots.insert(Key::Index(9), Raw::from("c"));
///
/// let keys: Vec<Key> = reindex(slots).into_keys().collect();
/// assert_eq!(keys, vec![Key::Index(0), Key::Name("x".into()), Key::Index(1)]);
/// ```
pub fn reindex(slots: Slots) -> Slots {
    let mut next = 0i64;
    slots
        .into_iter()
        .map(|(key, value)| match key {
            Key::Index(_) => {
                let key = Key::Index(next);
                next += 1;
                (key, value)
            }
            name => (name, value),
        })
        .collect()
}

/// Index that an appended slot receives: one past the largest integer key,
/// or zero.
pub fn next_index(slots: &Slots) -> i64 {
    slots
        .keys()
        .filter_map(Key::as_index)
        .max()
        .map_or(0, |max| max.saturating_add(1).max(0))
}

// ── Conversions ──────────────────────────────────────────────────────────

impl From<Value> for Raw {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Raw::Null,
            Value::Bool(b) => Raw::Bool(b),
            Value::Number(n) => Raw::Number(n),
            Value::String(s) => Raw::String(s),
            Value::Array(arr) => Raw::array(arr.into_iter().map(Raw::from)),
            Value::Object(obj) => Raw::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, Raw::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Raw {
    fn from(v: &Value) -> Self {
        Raw::from(v.clone())
    }
}

impl From<Raw> for Value {
    fn from(raw: Raw) -> Self {
        raw.to_json()
    }
}

impl From<&Raw> for Value {
    fn from(raw: &Raw) -> Self {
        raw.to_json()
    }
}

impl From<bool> for Raw {
    fn from(b: bool) -> Self {
        Raw::Bool(b)
    }
}

impl From<i32> for Raw {
    fn from(i: i32) -> Self {
        Raw::Number(Number::from(i))
    }
}

impl From<i64> for Raw {
    fn from(i: i64) -> Self {
        Raw::Number(Number::from(i))
    }
}

impl From<u64> for Raw {
    fn from(u: u64) -> Self {
        Raw::Number(Number::from(u))
    }
}

impl From<f64> for Raw {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Raw::Null, Raw::Number)
    }
}

impl From<&str> for Raw {
    fn from(s: &str) -> Self {
        Raw::String(s.to_string())
    }
}

impl From<String> for Raw {
    fn from(s: String) -> Self {
        Raw::String(s)
    }
}

impl From<Vec<Raw>> for Raw {
    fn from(items: Vec<Raw>) -> Self {
        Raw::array(items)
    }
}

impl From<Slots> for Raw {
    fn from(slots: Slots) -> Self {
        Raw::Array(slots)
    }
}

impl From<Map> for Raw {
    fn from(map: Map) -> Self {
        Raw::Object(map)
    }
}

impl Serialize for Raw {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Raw::Null => serializer.serialize_unit(),
            Raw::Bool(b) => serializer.serialize_bool(*b),
            Raw::Number(n) => n.serialize(serializer),
            Raw::String(s) => serializer.serialize_str(s),
            Raw::Array(slots) if is_sequence(slots.keys()) => {
                serializer.collect_seq(slots.values())
            }
            Raw::Array(slots) => {
                serializer.collect_map(slots.iter().map(|(k, v)| (k.to_string(), v)))
            }
            Raw::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Raw {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Raw::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn assoc() -> Raw {
        let mut slots = Slots::new();
        slots.insert(Key::Name("a".into()), Raw::from(1));
        slots.insert(Key::Name("b".into()), Raw::from(2));
        Raw::Array(slots)
    }

    #[test]
    fn test_from_json_roundtrip() {
        let doc = json!({"a": [1, 2, {"b": null}], "c": "x", "d": 1.5, "e": true});
        let raw = Raw::from(doc.clone());
        assert_eq!(raw.to_json(), doc);
    }

    #[test]
    fn test_numeric_array_detection() {
        assert!(Raw::from(json!([])).is_numeric_array());
        assert!(Raw::from(json!([1, 2, 3])).is_numeric_array());
        assert!(!assoc().is_numeric_array());
        assert!(!Raw::from(json!({"0": 1})).is_numeric_array());
        assert!(!Raw::from(1).is_numeric_array());
    }

    #[test]
    fn test_is_sequence() {
        assert!(is_sequence(&[Key::Index(0), Key::Index(1)]));
        assert!(!is_sequence(&[Key::Index(0), Key::Index(2)]));
        assert!(!is_sequence(&[Key::Name("0".into())]));
        assert!(is_sequence(assoc().as_slots().unwrap().keys().take(0)));
    }

    #[test]
    fn test_holed_array_is_not_numeric() {
        let mut slots = Slots::new();
        slots.insert(Key::Index(0), Raw::from(1));
        slots.insert(Key::Index(2), Raw::from(3));
        let raw = Raw::Array(slots);
        assert!(!raw.is_numeric_array());
        assert_eq!(raw.to_json(), json!({"0": 1, "2": 3}));
    }

    #[test]
    fn test_assoc_array_encodes_as_object() {
        assert_eq!(assoc().to_json(), json!({"a": 1, "b": 2}));
        assert_eq!(serde_json::to_string(&assoc()).unwrap(), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Raw::Null.type_name(), "null");
        assert_eq!(Raw::from(true).type_name(), "boolean");
        assert_eq!(Raw::from(3).type_name(), "integer");
        assert_eq!(Raw::from(3.5).type_name(), "float");
        assert_eq!(Raw::from("s").type_name(), "string");
        assert_eq!(assoc().type_name(), "array");
        assert_eq!(Raw::from(json!({})).type_name(), "object");
    }

    #[test]
    fn test_child_lookup() {
        let raw = Raw::from(json!({"a": [10, 20]}));
        let arr = raw.child("a").unwrap();
        assert_eq!(arr.child("1"), Some(&Raw::from(20)));
        assert_eq!(arr.child("01"), None);
        assert_eq!(raw.child("missing"), None);
    }

    #[test]
    fn test_write_path_appends_new_array_key() {
        let mut raw = Raw::from(json!([1, 2]));
        assert!(raw.write_path(&["5"], Raw::from(6)));
        let keys: Vec<Key> = raw.as_slots().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec![Key::Index(0), Key::Index(1), Key::Index(5)]);
        assert!(!raw.is_numeric_array());
    }

    #[test]
    fn test_write_path_through_scalar_is_noop() {
        let mut raw = Raw::from(json!({"a": 1}));
        assert!(!raw.write_path(&["a", "b"], Raw::from(2)));
        assert_eq!(raw, Raw::from(json!({"a": 1})));
    }

    #[test]
    fn test_next_index() {
        assert_eq!(next_index(&Slots::new()), 0);
        assert_eq!(next_index(Raw::from(json!([1, 2])).as_slots().unwrap()), 2);
        assert_eq!(next_index(assoc().as_slots().unwrap()), 0);
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(Raw::from(f64::NAN), Raw::Null);
    }

    #[test]
    fn test_deserialize() {
        let raw: Raw = serde_json::from_str(r#"{"a":[1,"x"]}"#).unwrap();
        assert_eq!(raw, Raw::from(json!({"a": [1, "x"]})));
    }
}
