//! Core types for the modifier module.

use indexmap::{IndexMap, IndexSet};
use keydelta_keypath::{join_keypath, Keypath, KeypathError};
use keydelta_value::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModifierError {
    #[error("INVALID_ARGUMENT: {0}")]
    InvalidArgument(String),
    #[error("INVALID_MODIFIER: {0}")]
    InvalidModifier(String),
    #[error(transparent)]
    Keypath(#[from] KeypathError),
}

// ── Modifier ──────────────────────────────────────────────────────────────

/// A `{set, unset}` delta between two documents.
///
/// `set` maps keypaths to the values to write there; `unset` lists keypaths
/// to remove. Both keep insertion order, which follows document order when
/// the modifier comes out of a diff.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modifier {
    pub set: IndexMap<Keypath, Value>,
    pub unset: IndexSet<Keypath>,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// `None` for an empty modifier.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn with_set(mut self, keypath: impl Into<Keypath>, value: impl Into<Value>) -> Self {
        self.set.insert(keypath.into(), value.into());
        self
    }

    pub fn with_unset(mut self, keypath: impl Into<Keypath>) -> Self {
        self.unset.insert(keypath.into());
        self
    }

    /// Number of keypaths touched by either half.
    pub fn len(&self) -> usize {
        self.set.len() + self.unset.len()
    }

    /// Re-root every keypath under `key`.
    pub fn prefixed(&self, key: &str) -> Self {
        Self {
            set: self
                .set
                .iter()
                .map(|(path, value)| (join_keypath(key, path), value.clone()))
                .collect(),
            unset: self.unset.iter().map(|path| join_keypath(key, path)).collect(),
        }
    }
}
