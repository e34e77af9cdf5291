//! Document stores that [`update`](crate::sync::update) can read from and
//! write to.

use keydelta_keypath::value_for_key_path;
use keydelta_util::deep_equal_opt;
use keydelta_value::Value;
use parking_lot::RwLock;

use crate::apply::apply_modifier;
use crate::modifier::codec::from_update_document;
use crate::sync::SyncError;

/// A queryable document store.
///
/// Queries are objects mapping keypaths to expected values, e.g.
/// `{"_id": 7}`. Update documents are either `{"$set": .., "$unset": ..}`
/// operator documents or a full replacement document.
pub trait Collection {
    /// First document matching `query`.
    fn find_one(&self, query: &Value) -> Result<Option<Value>, SyncError>;

    /// Every document matching `query`, in store order.
    fn find(&self, query: &Value) -> Result<Vec<Value>, SyncError>;

    /// Update the first document matching `query`. Returns the number of
    /// documents updated.
    fn update(&self, query: &Value, update: &Value) -> Result<usize, SyncError>;
}

/// An in-memory [`Collection`].
#[derive(Debug, Default)]
pub struct MemoryCollection {
    docs: RwLock<Vec<Value>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(docs: Vec<Value>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }

    pub fn insert(&self, doc: Value) {
        self.docs.write().push(doc);
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Snapshot of the stored documents.
    pub fn documents(&self) -> Vec<Value> {
        self.docs.read().clone()
    }
}

fn matches(doc: &Value, query: &Value) -> Result<bool, SyncError> {
    let conditions = query
        .as_object()
        .ok_or_else(|| SyncError::Collaborator("query must be an object".into()))?;
    Ok(conditions
        .iter()
        .all(|(path, expected)| deep_equal_opt(value_for_key_path(doc, path), Some(expected))))
}

fn is_operator_document(update: &Value) -> bool {
    update
        .as_object()
        .is_some_and(|map| map.keys().any(|key| key.starts_with('$')))
}

impl Collection for MemoryCollection {
    fn find_one(&self, query: &Value) -> Result<Option<Value>, SyncError> {
        for doc in self.docs.read().iter() {
            if matches(doc, query)? {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    fn find(&self, query: &Value) -> Result<Vec<Value>, SyncError> {
        let docs = self.docs.read();
        let mut out = Vec::new();
        for doc in docs.iter() {
            if matches(doc, query)? {
                out.push(doc.clone());
            }
        }
        Ok(out)
    }

    fn update(&self, query: &Value, update: &Value) -> Result<usize, SyncError> {
        let mut docs = self.docs.write();
        let mut target = None;
        for (idx, doc) in docs.iter().enumerate() {
            if matches(doc, query)? {
                target = Some(idx);
                break;
            }
        }
        let Some(doc) = target.and_then(|idx| docs.get_mut(idx)) else {
            return Ok(0);
        };

        if is_operator_document(update) {
            let modifier = from_update_document(update)?;
            apply_modifier(doc, &modifier)?;
        } else if update.is_object() {
            *doc = update.clone();
        } else {
            return Err(SyncError::Collaborator("update must be an object".into()));
        }
        Ok(1)
    }
}
