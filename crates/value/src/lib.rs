//! Document value type for keydelta.
//!
//! [`Value`] extends the JSON data model with dates so that documents
//! coming from date-aware stores can be diffed without losing the
//! distinction between a timestamp and a string.
//!
//! # Example
//!
//! ```
//! use keydelta_value::{Value, ValueKind};
//! use serde_json::json;
//!
//! let doc = Value::from(json!({"at": {"$date": "2024-05-01T12:00:00.000Z"}, "n": 1}));
//! assert_eq!(doc.get("at").map(Value::kind), Some(ValueKind::Temporal));
//! assert_eq!(doc.get("n").map(Value::kind), Some(ValueKind::Numeric));
//! ```

pub mod json;
pub mod value;

pub use json::{format_date, parse_date, DATE_KEY};
pub use value::{kind_of, Map, Value, ValueKind};
