//! Reading and writing document values by keypath.

use keydelta_value::Value;

use crate::{is_valid_index, KeypathError, SEPARATOR};

fn parse_index(segment: &str) -> Option<usize> {
    if !is_valid_index(segment) {
        return None;
    }
    segment.parse().ok()
}

/// Get a value from a document by keypath.
///
/// Returns `None` if any segment is missing, walks through a leaf, or is
/// not a valid index into an array. The empty keypath returns the root.
///
/// # Example
///
/// ```
/// use keydelta_keypath::value_for_key_path;
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let doc = Value::from(json!({"foo": {"bar": [10, 20]}}));
/// assert_eq!(value_for_key_path(&doc, "foo.bar.1"), Some(&Value::from(20)));
/// assert_eq!(value_for_key_path(&doc, "foo.missing.deeper"), None);
/// ```
pub fn value_for_key_path<'a>(doc: &'a Value, keypath: &str) -> Option<&'a Value> {
    if keypath.is_empty() {
        return Some(doc);
    }

    let mut current = doc;
    for segment in keypath.split(SEPARATOR) {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(arr) => arr.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Get a mutable reference to a value in a document by keypath.
///
/// Returns `None` if the keypath doesn't exist.
pub fn value_for_key_path_mut<'a>(doc: &'a mut Value, keypath: &str) -> Option<&'a mut Value> {
    if keypath.is_empty() {
        return Some(doc);
    }

    let mut current = doc;
    for segment in keypath.split(SEPARATOR) {
        current = match current {
            Value::Object(map) => map.get_mut(segment)?,
            Value::Array(arr) => arr.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Parses `segment` as an index into `arr`, growing the array with `null`
/// up to that index. `None` when the segment is not an index.
fn index_slot<'a>(arr: &'a mut Vec<Value>, segment: &str) -> Option<&'a mut Value> {
    let idx = parse_index(segment)?;
    if idx >= arr.len() {
        arr.resize(idx + 1, Value::Null);
    }
    arr.get_mut(idx)
}

/// Turns an array that is addressed by a key into an object, the only
/// node type that can hold that key.
fn ensure_keyed(node: &mut Value, segment: &str) {
    if matches!(node, Value::Array(_)) && !is_valid_index(segment) {
        *node = Value::object();
    }
}

/// Step into the container under `segment`, creating an object when the
/// slot is missing or holds a leaf.
fn child_container_mut<'a>(node: &'a mut Value, segment: &str) -> Result<&'a mut Value, KeypathError> {
    ensure_keyed(node, segment);
    let slot = match node {
        Value::Object(map) => map.entry(segment.to_string()).or_insert_with(Value::object),
        Value::Array(arr) => index_slot(arr, segment).ok_or(KeypathError::InvalidTarget)?,
        _ => return Err(KeypathError::InvalidTarget),
    };
    if !slot.is_container() {
        *slot = Value::object();
    }
    Ok(slot)
}

fn assign(node: &mut Value, segment: &str, value: Value) -> Result<(), KeypathError> {
    ensure_keyed(node, segment);
    match node {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            Ok(())
        }
        Value::Array(arr) => {
            let slot = index_slot(arr, segment).ok_or(KeypathError::InvalidTarget)?;
            *slot = value;
            Ok(())
        }
        _ => Err(KeypathError::InvalidTarget),
    }
}

/// Write a value at a keypath.
///
/// Missing intermediate nodes are created as objects, and intermediate
/// leaves are replaced by objects; arrays are never created implicitly. An
/// index segment on an existing array writes that element, padding with
/// `null` past the end, while a key segment on an array replaces it with an
/// object. Writing `None` removes the path instead.
///
/// # Errors
///
/// - `KeypathError::EmptyKeypath` - the keypath is the root
/// - `KeypathError::EmptySegment` - the keypath has an empty segment
/// - `KeypathError::InvalidTarget` - the document root is not a container
///
/// # Example
///
/// ```
/// use keydelta_keypath::set_value_for_key_path;
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let mut doc = Value::from(json!({"a": 1}));
/// set_value_for_key_path(&mut doc, "a.b.c", Some(Value::from(true))).unwrap();
/// assert_eq!(doc, Value::from(json!({"a": {"b": {"c": true}}})));
///
/// set_value_for_key_path(&mut doc, "a.b.c", None).unwrap();
/// assert_eq!(doc, Value::from(json!({"a": {"b": {}}})));
/// ```
pub fn set_value_for_key_path(
    doc: &mut Value,
    keypath: &str,
    value: Option<Value>,
) -> Result<(), KeypathError> {
    if keypath.is_empty() {
        return Err(KeypathError::EmptyKeypath);
    }
    let segments: Vec<&str> = keypath.split(SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(KeypathError::EmptySegment);
    }
    let Some(value) = value else {
        unset_key_path(doc, keypath);
        return Ok(());
    };
    if !doc.is_container() {
        return Err(KeypathError::InvalidTarget);
    }

    let Some((last, parents)) = segments.split_last() else {
        return Err(KeypathError::EmptyKeypath);
    };
    let mut current = doc;
    for segment in parents {
        current = child_container_mut(current, segment)?;
    }
    assign(current, last, value)
}

/// Remove the value at a keypath.
///
/// Object entries are removed keeping sibling order. Array elements are
/// replaced by `null` so later indices do not shift. Returns whether the
/// document changed.
///
/// # Example
///
/// ```
/// use keydelta_keypath::unset_key_path;
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let mut doc = Value::from(json!({"a": {"b": 1, "c": 2}}));
/// assert!(unset_key_path(&mut doc, "a.b"));
/// assert!(!unset_key_path(&mut doc, "a.b"));
/// assert_eq!(doc, Value::from(json!({"a": {"c": 2}})));
/// ```
pub fn unset_key_path(doc: &mut Value, keypath: &str) -> bool {
    if keypath.is_empty() {
        return false;
    }
    let (parent_path, key) = keypath.rsplit_once(SEPARATOR).unwrap_or(("", keypath));
    let Some(parent) = value_for_key_path_mut(doc, parent_path) else {
        return false;
    };
    match parent {
        Value::Object(map) => map.shift_remove(key).is_some(),
        Value::Array(arr) => match parse_index(key).and_then(|idx| arr.get_mut(idx)) {
            Some(slot) if !slot.is_null() => {
                *slot = Value::Null;
                true
            }
            _ => false,
        },
        _ => false,
    }
}
