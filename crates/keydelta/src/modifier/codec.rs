//! Wire codecs for modifiers.
//!
//! The canonical shape is `{"set": {<keypath>: <value>}, "unset":
//! {<keypath>: true}}`, with empty halves omitted. Stores that speak
//! MongoDB-style operators get the same content under `$set` and `$unset`.
//! Decoding is lenient: unknown keys are ignored and any value is accepted
//! for an unset entry, but every keypath must be well formed.

use keydelta_keypath::validate_keypath;
use keydelta_util::has_own_property;
use keydelta_value::{Map, Value};

use crate::modifier::types::{Modifier, ModifierError};

pub const SET_KEY: &str = "set";
pub const UNSET_KEY: &str = "unset";
pub const SET_OPERATOR: &str = "$set";
pub const UNSET_OPERATOR: &str = "$unset";

// ── Helpers ───────────────────────────────────────────────────────────────

fn encode(modifier: &Modifier, set_key: &str, unset_key: &str) -> Value {
    let mut out = Map::new();
    if !modifier.set.is_empty() {
        let set: Map = modifier
            .set
            .iter()
            .map(|(path, value)| (path.clone(), value.clone()))
            .collect();
        out.insert(set_key.to_string(), Value::Object(set));
    }
    if !modifier.unset.is_empty() {
        let unset: Map = modifier
            .unset
            .iter()
            .map(|path| (path.clone(), Value::Bool(true)))
            .collect();
        out.insert(unset_key.to_string(), Value::Object(unset));
    }
    Value::Object(out)
}

fn checked(path: &str) -> Result<String, ModifierError> {
    validate_keypath(path).map_err(|e| ModifierError::InvalidModifier(format!("{path:?}: {e}")))?;
    Ok(path.to_string())
}

fn decode(value: &Value, set_key: &str, unset_key: &str) -> Result<Modifier, ModifierError> {
    let map = value
        .as_object()
        .ok_or_else(|| ModifierError::InvalidModifier("modifier must be an object".into()))?;
    let mut modifier = Modifier::new();

    match map.get(set_key) {
        None | Some(Value::Null) => {}
        Some(Value::Object(set)) => {
            for (path, v) in set {
                modifier.set.insert(checked(path)?, v.clone());
            }
        }
        Some(_) => {
            return Err(ModifierError::InvalidModifier(format!(
                "{set_key} must be an object"
            )))
        }
    }

    match map.get(unset_key) {
        None | Some(Value::Null) => {}
        Some(Value::Object(unset)) => {
            for path in unset.keys() {
                modifier.unset.insert(checked(path)?);
            }
        }
        Some(Value::Array(unset)) => {
            for path in unset {
                let path = path.as_str().ok_or_else(|| {
                    ModifierError::InvalidModifier(format!("{unset_key} entries must be strings"))
                })?;
                modifier.unset.insert(checked(path)?);
            }
        }
        Some(_) => {
            return Err(ModifierError::InvalidModifier(format!(
                "{unset_key} must be an object"
            )))
        }
    }

    Ok(modifier)
}

// ── Shape detection ───────────────────────────────────────────────────────

/// A mapping with a `set` or `unset` key is read as a modifier rather than
/// as a plain document.
pub fn is_modifier_shaped(value: &Value) -> bool {
    has_own_property(value, SET_KEY) || has_own_property(value, UNSET_KEY)
}

// ── Canonical shape ───────────────────────────────────────────────────────

pub fn to_value(modifier: &Modifier) -> Value {
    encode(modifier, SET_KEY, UNSET_KEY)
}

pub fn from_value(value: &Value) -> Result<Modifier, ModifierError> {
    decode(value, SET_KEY, UNSET_KEY)
}

/// Serialize a modifier to `serde_json::Value`. Dates use the `{"$date": ..}`
/// wrapper.
pub fn to_json(modifier: &Modifier) -> serde_json::Value {
    serde_json::Value::from(to_value(modifier))
}

pub fn from_json(json: &serde_json::Value) -> Result<Modifier, ModifierError> {
    from_value(&Value::from(json))
}

// ── Operator shape ────────────────────────────────────────────────────────

/// Build the `{"$set": .., "$unset": ..}` update document a store expects.
pub fn to_update_document(modifier: &Modifier) -> Value {
    encode(modifier, SET_OPERATOR, UNSET_OPERATOR)
}

pub fn from_update_document(value: &Value) -> Result<Modifier, ModifierError> {
    decode(value, SET_OPERATOR, UNSET_OPERATOR)
}
