//! Modifiers: `{set, unset}` deltas between documents.
//!
//! - [`types`]: the [`Modifier`] value and its error type
//! - [`diff`]: computing a modifier from a previous and a new document
//! - [`codec`]: the `{set, unset}` and `{$set, $unset}` wire shapes

pub mod codec;
pub mod diff;
pub mod types;

pub use codec::{from_json, is_modifier_shaped, to_json, to_update_document};
pub use diff::{diff_to_modifier, forward_diff_to_modifier, DiffOptions};
pub use types::{Modifier, ModifierError};
