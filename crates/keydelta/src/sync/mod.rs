//! Reconciling a desired document against a source of truth.
//!
//! [`update`] looks up the current state of a document, diffs the desired
//! state against it, and persists the difference either through a setter
//! callback or through a [`Collection`].

pub mod collection;

use indexmap::IndexSet;
use keydelta_keypath::{keypaths, unset_key_path, value_for_key_path, Keypath, KeypathsOptions};
use keydelta_util::{deep_equal, deep_equal_opt};
use keydelta_value::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::apply::{apply_modifier, prune_empty_objects};
use crate::modifier::codec::to_update_document;
use crate::modifier::diff::{diff_to_modifier, DiffOptions};
use crate::modifier::types::{Modifier, ModifierError};

pub use collection::{Collection, MemoryCollection};

/// Default name of the identifier field.
pub const DEFAULT_ID_FIELD: &str = "_id";

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    #[error("MISSING_COMPARISON_TARGET")]
    MissingComparisonTarget,
    #[error("MISSING_SETTER")]
    MissingSetter,
    #[error("MISSING_IDENTIFIER")]
    MissingIdentifier,
    /// Applying the computed modifier did not reproduce the desired
    /// document at these keypaths.
    #[error("CONSISTENCY_VIOLATION: {}", keypaths.join(", "))]
    ConsistencyViolation { keypaths: Vec<Keypath> },
    #[error(transparent)]
    Modifier(#[from] ModifierError),
    #[error("COLLABORATOR: {0}")]
    Collaborator(String),
}

// ── Options ───────────────────────────────────────────────────────────────

type Getter<'a> = Box<dyn FnOnce() -> Option<Value> + 'a>;
type Setter<'a> = Box<dyn FnOnce(Value) -> Result<(), SyncError> + 'a>;

/// Collaborators and settings for [`update`].
///
/// `get` is preferred over `collection` for reading the current state, and
/// `set` over `collection` for writing it.
pub struct UpdateOptions<'a> {
    pub get: Option<Getter<'a>>,
    pub set: Option<Setter<'a>>,
    pub collection: Option<&'a dyn Collection>,
    /// Keypaths left out of both the diff and the consistency check.
    pub ignore: Vec<Keypath>,
    pub id_field: String,
}

impl Default for UpdateOptions<'_> {
    fn default() -> Self {
        Self {
            get: None,
            set: None,
            collection: None,
            ignore: Vec::new(),
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

impl<'a> UpdateOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get<F>(mut self, get: F) -> Self
    where
        F: FnOnce() -> Option<Value> + 'a,
    {
        self.get = Some(Box::new(get));
        self
    }

    pub fn with_set<F>(mut self, set: F) -> Self
    where
        F: FnOnce(Value) -> Result<(), SyncError> + 'a,
    {
        self.set = Some(Box::new(set));
        self
    }

    pub fn with_collection(mut self, collection: &'a dyn Collection) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn with_ignore<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Keypath>,
    {
        self.ignore.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }
}

// ── update ────────────────────────────────────────────────────────────────

fn id_query(id_field: &str, id: &Value) -> Value {
    let mut query = Map::new();
    query.insert(id_field.to_string(), id.clone());
    Value::Object(query)
}

/// `value` without the `ignore`d keypaths and the empty objects they leave.
fn comparable(value: &Value, ignore: &[Keypath]) -> Value {
    let mut value = value.clone();
    for path in ignore {
        unset_key_path(&mut value, path);
    }
    prune_empty_objects(&mut value);
    value
}

/// Keypaths where `actual` and `expected` differ outside `ignore`, or
/// `None` when the two are deep-equal. Differences no leaf keypath can name
/// are reported by their top-level key.
fn mismatched_keypaths(actual: &Value, expected: &Value, ignore: &[Keypath]) -> Option<Vec<Keypath>> {
    let actual = comparable(actual, ignore);
    let expected = comparable(expected, ignore);
    if deep_equal(&actual, &expected) {
        return None;
    }

    let mut leaves: IndexSet<Keypath> = keypaths(&actual, KeypathsOptions::leaves()).into_iter().collect();
    leaves.extend(keypaths(&expected, KeypathsOptions::leaves()));
    let mismatched: Vec<Keypath> = leaves
        .into_iter()
        .filter(|path| {
            !deep_equal_opt(value_for_key_path(&actual, path), value_for_key_path(&expected, path))
        })
        .collect();
    if !mismatched.is_empty() {
        return Some(mismatched);
    }

    let mut keys: IndexSet<&String> = IndexSet::new();
    keys.extend(actual.as_object().into_iter().flat_map(|map| map.keys()));
    keys.extend(expected.as_object().into_iter().flat_map(|map| map.keys()));
    Some(
        keys.into_iter()
            .filter(|key| !deep_equal_opt(actual.get(key.as_str()), expected.get(key.as_str())))
            .cloned()
            .collect(),
    )
}

/// Bring the stored state of `doc` in line with `doc`.
///
/// 1. The current state is read through `get`, or else looked up in
///    `collection` by the identifier field of `doc`.
/// 2. The modifier from the current state to `doc` is computed, skipping
///    `ignore`d keypaths. With no difference nothing is written.
/// 3. With a setter, the modifier is applied to a copy of the current state
///    and the copy is handed to the setter; the copy must then be
///    deep-equal to `doc` once ignored keypaths and empty objects are
///    stripped from both. Without a setter, the modifier is sent
///    to `collection` as a `$set`/`$unset` update keyed by the identifier of
///    the current state.
///
/// Returns the modifier that was persisted.
///
/// # Errors
///
/// - `SyncError::MissingComparisonTarget` - no current state could be found
/// - `SyncError::MissingIdentifier` - an identifier was needed but absent
/// - `SyncError::MissingSetter` - there is a difference but nowhere to write it
/// - `SyncError::ConsistencyViolation` - the patched copy differs from `doc`
///
/// # Example
///
/// ```
/// use keydelta::sync::{update, Collection, MemoryCollection, UpdateOptions};
/// use keydelta::Modifier;
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let users = MemoryCollection::with_documents(vec![
///     Value::from(json!({"_id": 1, "name": "Ada", "draft": true})),
/// ]);
/// let desired = Value::from(json!({"_id": 1, "name": "Ada Lovelace"}));
///
/// let diff = update(&desired, UpdateOptions::new().with_collection(&users)).unwrap();
/// assert_eq!(diff, Some(Modifier::new().with_set("name", "Ada Lovelace").with_unset("draft")));
/// assert_eq!(users.find_one(&Value::from(json!({"_id": 1}))).unwrap(), Some(desired));
/// ```
pub fn update(doc: &Value, options: UpdateOptions<'_>) -> Result<Option<Modifier>, SyncError> {
    let UpdateOptions {
        get,
        set,
        collection,
        ignore,
        id_field,
    } = options;

    let mut model = get.and_then(|get| get());
    if model.is_some() {
        debug!(source = "get", "resolved comparison target");
    } else if let Some(collection) = collection {
        let id = doc.get(&id_field).ok_or(SyncError::MissingIdentifier)?;
        model = collection.find_one(&id_query(&id_field, id))?;
        debug!(source = "collection", found = model.is_some(), "resolved comparison target");
    }
    let model = model.ok_or(SyncError::MissingComparisonTarget)?;

    let options = DiffOptions::default().with_ignore(ignore.iter().cloned());
    let Some(diff) = diff_to_modifier(Some(&model), Some(doc), &options) else {
        trace!("no difference");
        return Ok(None);
    };
    trace!(set = diff.set.len(), unset = diff.unset.len(), "computed difference");

    if let Some(set) = set {
        let mut next = model.clone();
        apply_modifier(&mut next, &diff)?;
        let mismatched = mismatched_keypaths(&next, doc, &ignore);
        debug!(keypaths = diff.len(), "persisting through setter");
        set(next)?;
        if let Some(mismatched) = mismatched {
            warn!(keypaths = ?mismatched, "patched document does not match the desired state");
            return Err(SyncError::ConsistencyViolation { keypaths: mismatched });
        }
        return Ok(Some(diff));
    }

    let Some(collection) = collection else {
        return Err(SyncError::MissingSetter);
    };
    let id = model.get(&id_field).ok_or(SyncError::MissingIdentifier)?;
    let updated = collection.update(&id_query(&id_field, id), &to_update_document(&diff))?;
    debug!(updated, keypaths = diff.len(), "persisted through collection");
    Ok(Some(diff))
}
