//! Applying modifiers to documents.
//!
//! All functions mutate the caller's document in place. Sources are either
//! modifier-shaped (`{"set": .., "unset": ..}`) or flat keypath mappings.

use keydelta_keypath::{
    set_value_for_key_path, unset_key_path, validate_keypath, value_for_key_path, SEPARATOR,
};
use keydelta_util::deep_equal;
use keydelta_value::{Map, Value};

use crate::modifier::codec::{from_value, is_modifier_shaped};
use crate::modifier::diff::{diff_to_modifier, DiffOptions};
use crate::modifier::types::{Modifier, ModifierError};

// ── Helpers ───────────────────────────────────────────────────────────────

fn flat_source<'a>(source: &'a Value, op: &str) -> Result<&'a Map, ModifierError> {
    source
        .as_object()
        .ok_or_else(|| ModifierError::InvalidArgument(format!("{op} source must be an object")))
}

/// Falsy values other than numbers are never written.
fn writable(value: &Value) -> bool {
    value.is_truthy() || value.is_number()
}

fn set_entries<'a, I>(dest: &mut Value, entries: I) -> Result<(), ModifierError>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    for (path, value) in entries {
        if writable(value) {
            set_value_for_key_path(dest, path, Some(value.clone()))?;
        }
    }
    Ok(())
}

fn unset_entries<'a, I>(dest: &mut Value, paths: I) -> Result<(), ModifierError>
where
    I: IntoIterator<Item = &'a String>,
{
    for path in paths {
        set_value_for_key_path(dest, path, None)?;
        prune_emptied_ancestors(dest, path);
    }
    Ok(())
}

/// Remove the objects above `keypath` that its removal left empty. Stops at
/// the root and at array elements.
fn prune_emptied_ancestors(dest: &mut Value, keypath: &str) {
    let mut path = keypath;
    while let Some((parent, _)) = path.rsplit_once(SEPARATOR) {
        let emptied = matches!(
            value_for_key_path(dest, parent),
            Some(Value::Object(map)) if map.is_empty()
        );
        let holder = parent.rsplit_once(SEPARATOR).map_or("", |(holder, _)| holder);
        let in_object = matches!(value_for_key_path(dest, holder), Some(Value::Object(_)));
        if !emptied || !in_object {
            break;
        }
        unset_key_path(dest, parent);
        path = parent;
    }
}

// ── $set / $unset ─────────────────────────────────────────────────────────

/// Write the `set` half of a modifier-shaped source, or every entry of a
/// flat keypath mapping, into `dest`.
///
/// Entries whose value is falsy and not a number are skipped.
///
/// # Errors
///
/// - `ModifierError::InvalidArgument` - `source` is not an object
/// - `ModifierError::Keypath` - a keypath is malformed or `dest` cannot hold it
pub fn apply_set(dest: &mut Value, source: &Value) -> Result<(), ModifierError> {
    if is_modifier_shaped(source) {
        let modifier = from_value(source)?;
        return set_entries(dest, &modifier.set);
    }
    set_entries(dest, flat_source(source, "$set")?)
}

/// Remove the `unset` half of a modifier-shaped source, or every keypath
/// named by a flat mapping, from `dest`.
pub fn apply_unset(dest: &mut Value, source: &Value) -> Result<(), ModifierError> {
    if is_modifier_shaped(source) {
        let modifier = from_value(source)?;
        return unset_entries(dest, &modifier.unset);
    }
    unset_entries(dest, flat_source(source, "$unset")?.keys())
}

// ── apply ─────────────────────────────────────────────────────────────────

/// Apply a typed modifier: `set` first, then `unset`. Objects left empty by
/// an unset are removed up to, but never including, the root.
///
/// Applying the same modifier twice gives the same document as applying it
/// once.
///
/// # Example
///
/// ```
/// use keydelta::{apply_modifier, Modifier};
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let mut doc = Value::from(json!({"a": {"b": 1}, "c": 1}));
/// let modifier = Modifier::new().with_set("c", 2).with_unset("a.b");
/// apply_modifier(&mut doc, &modifier).unwrap();
/// assert_eq!(doc, Value::from(json!({"c": 2})));
/// ```
pub fn apply_modifier<'a>(
    dest: &'a mut Value,
    modifier: &Modifier,
) -> Result<&'a mut Value, ModifierError> {
    set_entries(dest, &modifier.set)?;
    unset_entries(dest, &modifier.unset)?;
    Ok(dest)
}

/// Apply a modifier-shaped source, or a plain object read as a pure
/// insertion, to `dest`. Returns `dest`.
///
/// # Example
///
/// ```
/// use keydelta::apply;
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let mut doc = Value::from(json!({"a": 1}));
/// apply(&mut doc, &Value::from(json!({"b": {"c": true}}))).unwrap();
/// apply(&mut doc, &Value::from(json!({"unset": {"a": true}}))).unwrap();
/// assert_eq!(doc, Value::from(json!({"b": {"c": true}})));
/// ```
pub fn apply<'a>(dest: &'a mut Value, source: &Value) -> Result<&'a mut Value, ModifierError> {
    let modifier = if is_modifier_shaped(source) {
        from_value(source)?
    } else {
        flat_source(source, "apply")?;
        obj_to_modifier(source).unwrap_or_default()
    };
    apply_modifier(dest, &modifier)
}

/// Recursively remove empty objects below the root. Array elements are
/// left untouched.
pub fn prune_empty_objects(doc: &mut Value) {
    if let Value::Object(map) = doc {
        prune_map(map);
    }
}

fn prune_map(map: &mut Map) {
    map.retain(|_, child| match child {
        Value::Object(inner) => {
            prune_map(inner);
            !inner.is_empty()
        }
        _ => true,
    });
}

// ── $addToSet ─────────────────────────────────────────────────────────────

/// Append `item` to the array `dest` unless a deep-equal element is already
/// there. Returns whether the array grew.
///
/// # Errors
///
/// `ModifierError::InvalidArgument` if `dest` is not an array.
pub fn add_to_set(dest: &mut Value, item: Value) -> Result<bool, ModifierError> {
    let arr = dest
        .as_array_mut()
        .ok_or_else(|| ModifierError::InvalidArgument("$addToSet target must be an array".into()))?;
    if arr.iter().any(|existing| deep_equal(existing, &item)) {
        return Ok(false);
    }
    arr.push(item);
    Ok(true)
}

// ── Conversions ───────────────────────────────────────────────────────────

/// Materialise a modifier as a standalone document: every `set` entry is
/// written into a fresh object and every `unset` entry removed from it.
pub fn modifier_to_obj(modifier: &Modifier) -> Result<Value, ModifierError> {
    let mut obj = Value::object();
    for (path, value) in &modifier.set {
        set_value_for_key_path(&mut obj, path, Some(value.clone()))?;
    }
    for path in &modifier.unset {
        set_value_for_key_path(&mut obj, path, None)?;
    }
    Ok(obj)
}

/// Every leaf of `obj` as a `set` entry. `None` when `obj` has no leaves.
///
/// # Example
///
/// ```
/// use keydelta::{obj_to_modifier, Modifier};
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// assert_eq!(
///     obj_to_modifier(&Value::from(json!({"x": {"y": 1}}))),
///     Some(Modifier::new().with_set("x.y", 1))
/// );
/// ```
pub fn obj_to_modifier(obj: &Value) -> Option<Modifier> {
    diff_to_modifier(None, Some(obj), &DiffOptions::default())
}

/// Re-root a modifier under `key`, so that the delta of a sub-document can
/// be folded into the delta of its parent.
///
/// # Errors
///
/// `ModifierError::InvalidArgument` if the modifier is missing or `key` is
/// not a well-formed keypath.
pub fn map_modifier_to_key(modifier: Option<&Modifier>, key: &str) -> Result<Modifier, ModifierError> {
    let modifier =
        modifier.ok_or_else(|| ModifierError::InvalidArgument("modifier is required".into()))?;
    validate_keypath(key).map_err(|e| ModifierError::InvalidArgument(format!("{key:?}: {e}")))?;
    Ok(modifier.prefixed(key))
}
