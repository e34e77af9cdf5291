//! Dot-delimited keypath utilities.
//!
//! A keypath addresses a node by walking child keys from the document root:
//! `a.b.2.c` reads key `a`, then key `b`, then index `2` of an array, then
//! key `c`. Segments are non-empty and cannot contain `.`; there is no
//! escape syntax, so keys containing a dot are not addressable.
//!
//! # Example
//!
//! ```
//! use keydelta_keypath::{keypaths, set_value_for_key_path, value_for_key_path, KeypathsOptions};
//! use keydelta_value::Value;
//! use serde_json::json;
//!
//! let mut doc = Value::from(json!({"user": {"name": "Ada", "tags": ["x"]}}));
//! assert_eq!(
//!     keypaths(&doc, KeypathsOptions::leaves()),
//!     vec!["user.name", "user.tags"]
//! );
//!
//! set_value_for_key_path(&mut doc, "user.address.city", Some(Value::from("London"))).unwrap();
//! assert_eq!(
//!     value_for_key_path(&doc, "user.address.city"),
//!     Some(&Value::from("London"))
//! );
//! ```

use thiserror::Error;

pub mod access;
pub mod types;
pub mod validate;
pub mod walk;

pub use access::{
    set_value_for_key_path, unset_key_path, value_for_key_path, value_for_key_path_mut,
};
pub use types::{Keypath, KeypathsOptions};
pub use validate::{validate_keypath, ValidationError};
pub use walk::{filtered_key_paths, keypaths};

/// Separator between keypath segments.
pub const SEPARATOR: char = '.';

/// Append one segment to a keypath. Appending to the root yields the
/// segment itself.
pub fn join_keypath(prefix: &str, segment: &str) -> Keypath {
    if prefix.is_empty() {
        return segment.to_string();
    }
    let mut out = String::with_capacity(prefix.len() + 1 + segment.len());
    out.push_str(prefix);
    out.push(SEPARATOR);
    out.push_str(segment);
    out
}

/// Check whether `b` is `a` or lies below `a`.
///
/// Comparison is per segment: `a.b` contains `a.b.c` but not `a.bc`. The
/// root keypath contains everything.
///
/// # Example
///
/// ```
/// use keydelta_keypath::key_path_contains_path;
///
/// assert!(key_path_contains_path("a", "a"));
/// assert!(key_path_contains_path("a", "a.b.c"));
/// assert!(!key_path_contains_path("a", "ab"));
/// assert!(!key_path_contains_path("a.b", "a"));
/// ```
pub fn key_path_contains_path(a: &str, b: &str) -> bool {
    if a.is_empty() {
        return true;
    }
    match b.strip_prefix(a) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Check whether `child` lies strictly below `parent`.
pub fn is_child(parent: &str, child: &str) -> bool {
    parent != child && key_path_contains_path(parent, child)
}

/// Check if a string represents a valid non-negative integer array index.
///
/// # Example
///
/// ```
/// use keydelta_keypath::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("123"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index("1.5"));
/// assert!(!is_valid_index("abc"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    // First char can't be leading zero unless it's just "0"
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|&b| b.is_ascii_digit())
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeypathError {
    #[error("EMPTY_KEYPATH")]
    EmptyKeypath,
    #[error("EMPTY_SEGMENT")]
    EmptySegment,
    #[error("INVALID_TARGET")]
    InvalidTarget,
}
