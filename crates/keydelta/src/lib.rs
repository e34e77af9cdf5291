//! keydelta - keypath-addressed document diff and patch.
//!
//! Documents are trees of objects, arrays and leaves ([`Value`]). A
//! [`Modifier`] describes the change between two documents as a flat set of
//! keypath writes (`set`) and removals (`unset`):
//!
//! - [`diff_to_modifier`] computes the modifier from a previous and a new
//!   document, driven by the rules in [`classify`]
//! - [`apply_modifier`] and [`apply()`] replay a modifier onto a document
//! - [`sync::update`] diffs a desired document against its stored state and
//!   persists the difference
//!
//! Arrays are never diffed element by element; a changed array is written
//! whole.
//!
//! # Example
//!
//! ```
//! use keydelta::{apply_modifier, diff_to_modifier, DiffOptions};
//! use keydelta_value::Value;
//! use serde_json::json;
//!
//! let prev = Value::from(json!({"title": "Draft", "tags": ["a"], "meta": {"rev": 1}}));
//! let next = Value::from(json!({"title": "Final", "tags": ["a", "b"]}));
//!
//! let modifier = diff_to_modifier(Some(&prev), Some(&next), &DiffOptions::default()).unwrap();
//! assert_eq!(
//!     keydelta::modifier::to_json(&modifier),
//!     json!({"set": {"title": "Final", "tags": ["a", "b"]}, "unset": {"meta": true}})
//! );
//!
//! let mut doc = prev.clone();
//! apply_modifier(&mut doc, &modifier).unwrap();
//! assert_eq!(doc, next);
//! ```

pub mod apply;
pub mod classify;
pub mod cli;
pub mod modifier;
pub mod sync;

pub use apply::{
    add_to_set, apply, apply_modifier, apply_set, apply_unset, map_modifier_to_key,
    modifier_to_obj, obj_to_modifier, prune_empty_objects,
};
pub use classify::{should_set, should_unset};
pub use modifier::{diff_to_modifier, forward_diff_to_modifier, DiffOptions, Modifier, ModifierError};
pub use sync::{update, Collection, MemoryCollection, SyncError, UpdateOptions};

pub use keydelta_keypath::Keypath;
pub use keydelta_value::Value;
