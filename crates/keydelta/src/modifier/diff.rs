//! Computing modifiers from pairs of documents.

use indexmap::{IndexMap, IndexSet};
use keydelta_keypath::{
    filtered_key_paths, is_child, keypaths, value_for_key_path, Keypath,
    KeypathsOptions,
};
use keydelta_value::Value;
use tracing::trace;

use crate::apply::apply_modifier;
use crate::classify::{should_set, should_unset};
use crate::modifier::types::Modifier;

/// Options for [`diff_to_modifier`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Keypaths excluded from comparison, together with everything below
    /// them.
    pub fields_to_ignore: Vec<Keypath>,
    /// Re-diff once against the patched previous document so that objects
    /// emptied by the modifier are removed rather than written as `{}`.
    pub prune_empty_objects: bool,
}

impl DiffOptions {
    pub fn with_ignore<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Keypath>,
    {
        self.fields_to_ignore.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_prune_empty_objects(mut self, prune: bool) -> Self {
        self.prune_empty_objects = prune;
        self
    }
}

/// Compute the modifier that turns `prev` into `doc`.
///
/// Leaves of `doc` that [`should_set`] selects become `set` entries; paths
/// of `prev`, branches included, that [`should_unset`] selects become
/// `unset` entries. An unset path below another unset path is dropped, and
/// so is a `set` entry whose path is also unset. Returns `None` when
/// nothing changed.
///
/// A missing `prev` yields a pure insertion diff, a missing `doc` a pure
/// removal diff.
///
/// # Example
///
/// ```
/// use keydelta::{diff_to_modifier, DiffOptions, Modifier};
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let prev = Value::from(json!({"name": "Ada", "address": {"city": "London", "zip": "N1"}}));
/// let doc = Value::from(json!({"name": "Ada Lovelace"}));
///
/// let diff = diff_to_modifier(Some(&prev), Some(&doc), &DiffOptions::default()).unwrap();
/// assert_eq!(diff, Modifier::new().with_set("name", "Ada Lovelace").with_unset("address"));
/// ```
pub fn diff_to_modifier(
    prev: Option<&Value>,
    doc: Option<&Value>,
    options: &DiffOptions,
) -> Option<Modifier> {
    let ignore = &options.fields_to_ignore;
    let mut set = IndexMap::new();
    let mut unset = IndexSet::new();

    if let Some(doc) = doc {
        for path in filtered_key_paths(keypaths(doc, KeypathsOptions::leaves()), ignore) {
            let Some(val) = value_for_key_path(doc, &path) else {
                continue;
            };
            let old = prev.and_then(|prev| value_for_key_path(prev, &path));
            if should_set(Some(val), old) {
                set.insert(path, val.clone());
            }
        }
    }

    if let Some(prev) = prev {
        for path in filtered_key_paths(keypaths(prev, KeypathsOptions::all_levels()), ignore) {
            let old = value_for_key_path(prev, &path);
            let val = doc.and_then(|doc| value_for_key_path(doc, &path));
            if should_unset(val, old) {
                unset.insert(path);
            }
        }
    }

    let unset = subsume(unset);
    set.retain(|path, _| !unset.contains(path));
    let modifier = Modifier { set, unset }.non_empty()?;
    trace!(
        set = modifier.set.len(),
        unset = modifier.unset.len(),
        "computed modifier"
    );

    if !options.prune_empty_objects {
        return Some(modifier);
    }

    let mut intermediate = prev.cloned().unwrap_or_else(Value::object);
    if apply_modifier(&mut intermediate, &modifier).is_err() {
        return Some(modifier);
    }
    let single_pass = DiffOptions {
        fields_to_ignore: ignore.clone(),
        prune_empty_objects: false,
    };
    diff_to_modifier(prev, Some(&intermediate), &single_pass)
}

/// Drop every path that lies below another path of the set.
fn subsume(unset: IndexSet<Keypath>) -> IndexSet<Keypath> {
    unset
        .iter()
        .filter(|path| !unset.iter().any(|other| is_child(other, path)))
        .cloned()
        .collect()
}

/// Like [`diff_to_modifier`], but only captures additions and changes.
///
/// Every keypath of `prev` that `doc` does not have is added to the ignore
/// list, so structural removals never show up in the result.
///
/// # Example
///
/// ```
/// use keydelta::{forward_diff_to_modifier, Modifier};
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let prev = Value::from(json!({"a": 1, "b": {"c": 2, "d": 3}}));
/// let doc = Value::from(json!({"a": 2, "b": {"c": 2}}));
/// assert_eq!(
///     forward_diff_to_modifier(Some(&prev), Some(&doc), &[]),
///     Some(Modifier::new().with_set("a", 2))
/// );
/// ```
pub fn forward_diff_to_modifier(
    prev: Option<&Value>,
    doc: Option<&Value>,
    ignore: &[Keypath],
) -> Option<Modifier> {
    let present: IndexSet<Keypath> = doc
        .map(|doc| keypaths(doc, KeypathsOptions::all_levels()))
        .unwrap_or_default()
        .into_iter()
        .collect();

    let mut fields_to_ignore = ignore.to_vec();
    if let Some(prev) = prev {
        fields_to_ignore.extend(
            keypaths(prev, KeypathsOptions::all_levels())
                .into_iter()
                .filter(|path| !present.contains(path)),
        );
    }

    let options = DiffOptions {
        fields_to_ignore,
        prune_empty_objects: false,
    };
    diff_to_modifier(prev, doc, &options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value {
        Value::from(j)
    }

    fn diff(prev: serde_json::Value, doc: serde_json::Value) -> Option<Modifier> {
        diff_to_modifier(Some(&v(prev)), Some(&v(doc)), &DiffOptions::default())
    }

    #[test]
    fn identical_documents() {
        let doc = json!({"a": 1, "b": {"c": [1, 2], "d": {}}, "e": false});
        assert_eq!(diff(doc.clone(), doc), None);
    }

    #[test]
    fn changed_leaf() {
        assert_eq!(
            diff(json!({"a": 1, "b": "x"}), json!({"a": 2, "b": "x"})),
            Some(Modifier::new().with_set("a", 2))
        );
    }

    #[test]
    fn nested_insertion() {
        assert_eq!(
            diff(json!({}), json!({"a": {"b": {"c": true}}})),
            Some(Modifier::new().with_set("a.b.c", true))
        );
    }

    #[test]
    fn subtree_removal_is_subsumed() {
        assert_eq!(
            diff(json!({"a": {"b": 1, "c": 2}, "z": 1}), json!({"z": 1})),
            Some(Modifier::new().with_unset("a"))
        );
    }

    #[test]
    fn falsy_value_becomes_unset() {
        assert_eq!(
            diff(json!({"a": "x"}), json!({"a": false})),
            Some(Modifier::new().with_unset("a"))
        );
        assert_eq!(diff(json!({"a": false}), json!({"a": null})), None);
    }

    #[test]
    fn numeric_zero_is_written() {
        assert_eq!(
            diff(json!({"a": 1}), json!({"a": 0})),
            Some(Modifier::new().with_set("a", 0))
        );
    }

    #[test]
    fn numeric_strictness() {
        assert_eq!(
            diff(json!({"a": "5"}), json!({"a": 5})),
            Some(Modifier::new().with_set("a", 5))
        );
    }

    #[test]
    fn emptied_object_is_unset() {
        assert_eq!(
            diff(json!({"a": {"b": 1}}), json!({"a": {}})),
            Some(Modifier::new().with_unset("a"))
        );
    }

    #[test]
    fn ignored_fields() {
        let options = DiffOptions::default().with_ignore(["b"]);
        assert_eq!(
            diff_to_modifier(
                Some(&v(json!({"a": 1, "b": 1}))),
                Some(&v(json!({"a": 2, "b": 2}))),
                &options
            ),
            Some(Modifier::new().with_set("a", 2))
        );
    }

    #[test]
    fn ignored_fields_cover_descendants() {
        let options = DiffOptions::default().with_ignore(["meta"]);
        assert_eq!(
            diff_to_modifier(
                Some(&v(json!({"meta": {"rev": 1}}))),
                Some(&v(json!({"meta": {"rev": 2, "new": true}}))),
                &options
            ),
            None
        );
    }

    #[test]
    fn absent_sides() {
        assert_eq!(
            diff_to_modifier(None, Some(&v(json!({"x": {"y": 1}}))), &DiffOptions::default()),
            Some(Modifier::new().with_set("x.y", 1))
        );
        assert_eq!(
            diff_to_modifier(Some(&v(json!({"x": {"y": 1}, "z": 0}))), None, &DiffOptions::default()),
            Some(Modifier::new().with_unset("x").with_unset("z"))
        );
        assert_eq!(diff_to_modifier(None, None, &DiffOptions::default()), None);
    }

    #[test]
    fn array_replaced_as_a_whole() {
        assert_eq!(
            diff(json!({"tags": ["a", "b"]}), json!({"tags": ["a", "c"]})),
            Some(Modifier::new().with_set("tags", v(json!(["a", "c"]))))
        );
    }

    #[test]
    fn prune_pass_unsets_emptied_parent() {
        let prev = v(json!({"a": {"b": "x"}, "c": 1}));
        let doc = v(json!({"a": {"b": ""}, "c": 1}));

        let plain = diff_to_modifier(Some(&prev), Some(&doc), &DiffOptions::default());
        assert_eq!(plain, Some(Modifier::new().with_unset("a.b")));

        let pruned = diff_to_modifier(
            Some(&prev),
            Some(&doc),
            &DiffOptions::default().with_prune_empty_objects(true),
        );
        assert_eq!(pruned, Some(Modifier::new().with_unset("a")));
    }

    #[test]
    fn forward_diff_skips_removals() {
        let prev = v(json!({"a": {"b": 1, "c": 2}, "d": 1}));
        let doc = v(json!({"a": {"b": 5}}));
        assert_eq!(
            forward_diff_to_modifier(Some(&prev), Some(&doc), &[]),
            Some(Modifier::new().with_set("a.b", 5))
        );
    }

    #[test]
    fn forward_diff_still_reports_falsy_changes() {
        let prev = v(json!({"a": "x", "b": 1}));
        let doc = v(json!({"a": false, "b": 2}));
        assert_eq!(
            forward_diff_to_modifier(Some(&prev), Some(&doc), &["b".to_string()]),
            Some(Modifier::new().with_unset("a"))
        );
    }
}
