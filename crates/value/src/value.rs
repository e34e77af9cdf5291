//! The [`Value`] document type every keydelta crate operates on.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Number;

/// Ordered mapping used for document objects.
pub type Map = IndexMap<String, Value>;

/// A document node.
///
/// Covers the JSON data model plus dates, which are leaves with their own
/// equality semantics. Object keys keep insertion order so that keypath
/// enumeration is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// A point in time, compared by instant.
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    Object(Map),
}

/// Classification tag for a possibly-absent value, with "no value here" as
/// an explicit case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// An array. Never traversed, compared as a whole.
    Sequence,
    /// A date.
    Temporal,
    /// Any number.
    Numeric,
    /// An object.
    Mapping,
    /// `null`, a boolean or a string.
    Scalar,
    /// No value at all.
    Absent,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Sequence => "sequence",
            ValueKind::Temporal => "temporal",
            ValueKind::Numeric => "numeric",
            ValueKind::Mapping => "mapping",
            ValueKind::Scalar => "scalar",
            ValueKind::Absent => "absent",
        }
    }
}

/// Returns the [`ValueKind`] of an optional value.
pub fn kind_of(value: Option<&Value>) -> ValueKind {
    value.map_or(ValueKind::Absent, Value::kind)
}

impl Value {
    /// Creates an empty object.
    pub fn object() -> Value {
        Value::Object(Map::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Array(_) => ValueKind::Sequence,
            Value::Date(_) => ValueKind::Temporal,
            Value::Number(_) => ValueKind::Numeric,
            Value::Object(_) => ValueKind::Mapping,
            Value::Null | Value::Bool(_) | Value::String(_) => ValueKind::Scalar,
        }
    }

    /// Truthiness as used by the change rules.
    ///
    /// `null`, `false`, zero and the empty string are falsy. Dates, arrays
    /// and objects are truthy even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Value::String(s) => !s.is_empty(),
            Value::Date(_) | Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    /// True for objects and arrays, the nodes a keypath can walk through.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Looks up a direct child of an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i.into())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(i.into())
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Number(u.into())
    }
}

/// Non-finite floats have no JSON representation and become `null`.
impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}
