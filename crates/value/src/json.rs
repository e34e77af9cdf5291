//! Conversion between [`Value`] and JSON.
//!
//! Dates travel as extended-JSON wrappers: `{"$date": "2023-01-01T00:00:00.000Z"}`.
//! A wrapper is only recognised when `$date` is the sole key and its payload
//! is an RFC 3339 string or an integer of milliseconds since the epoch;
//! anything else stays an ordinary object.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::{Map, Value};

/// Key of the extended-JSON date wrapper.
pub const DATE_KEY: &str = "$date";

/// Formats a date the way it is written inside a `$date` wrapper.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses the payload of a `$date` wrapper.
pub fn parse_date(payload: &serde_json::Value) -> Option<DateTime<Utc>> {
    match payload {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| d.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn decode_date_wrapper(obj: &serde_json::Map<String, serde_json::Value>) -> Option<DateTime<Utc>> {
    if obj.len() != 1 {
        return None;
    }
    obj.get(DATE_KEY).and_then(parse_date)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => match decode_date_wrapper(&obj) {
                Some(date) => Value::Date(date),
                None => Value::Object(
                    obj.into_iter()
                        .map(|(k, v)| (k, Value::from(v)))
                        .collect::<Map>(),
                ),
            },
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from(v.clone())
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Date(d) => {
                let mut obj = serde_json::Map::new();
                obj.insert(DATE_KEY.to_string(), serde_json::Value::String(format_date(&d)));
                serde_json::Value::Object(obj)
            }
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Value {
    /// Parses a JSON document.
    pub fn from_json_str(s: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(s).map(Value::from)
    }

    /// Converts to a JSON value, wrapping dates.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.clone())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(DATE_KEY, &format_date(d))?;
                map.end()
            }
            Value::Array(arr) => serializer.collect_seq(arr),
            Value::Object(obj) => serializer.collect_map(obj),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn date_wrapper_decodes() {
        let v = Value::from(json!({"at": {"$date": "2023-01-01T00:00:00.000Z"}}));
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(v.get("at"), Some(&Value::Date(expected)));
    }

    #[test]
    fn date_wrapper_from_millis() {
        let v = Value::from(json!({"$date": 1672531200000_i64}));
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(v, Value::Date(expected));
    }

    #[test]
    fn date_wrapper_with_extra_keys_stays_object() {
        let v = Value::from(json!({"$date": "2023-01-01T00:00:00.000Z", "x": 1}));
        assert!(v.is_object());
    }

    #[test]
    fn unparseable_date_stays_object() {
        let v = Value::from(json!({"$date": "yesterday"}));
        assert!(v.is_object());
    }

    #[test]
    fn date_encodes_with_millis() {
        let d = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            Value::Date(d).to_json(),
            json!({"$date": "2023-01-01T00:00:00.000Z"})
        );
        assert_eq!(
            Value::Date(d).to_string(),
            r#"{"$date":"2023-01-01T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn serde_matches_conversion() {
        let src = json!({"b": [1, "two", null], "a": {"c": true}});
        let v: Value = serde_json::from_value(src.clone()).unwrap();
        assert_eq!(serde_json::to_value(&v).unwrap(), src);
        assert_eq!(v.to_string(), r#"{"b":[1,"two",null],"a":{"c":true}}"#);
    }
}
