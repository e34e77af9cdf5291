//! Flattening documents into keypaths.

use keydelta_value::{Map, Value};

use crate::types::{Keypath, KeypathsOptions};
use crate::{join_keypath, key_path_contains_path, SEPARATOR};

/// Enumerate the keypaths of a document, depth-first in key order.
///
/// Only objects are traversed. Arrays, dates, scalars and empty objects are
/// leaves. With [`KeypathsOptions::all_levels`] every non-empty object on
/// the way is emitted too, ahead of its descendants. A root that is not an
/// object has no keypaths.
///
/// Keys that no keypath can address, the empty key and keys containing
/// `.`, are skipped along with everything below them.
///
/// # Example
///
/// ```
/// use keydelta_keypath::{keypaths, KeypathsOptions};
/// use keydelta_value::Value;
/// use serde_json::json;
///
/// let doc = Value::from(json!({"a": {"b": 1, "c": [1, 2]}, "d": {}}));
/// assert_eq!(keypaths(&doc, KeypathsOptions::leaves()), vec!["a.b", "a.c", "d"]);
/// assert_eq!(
///     keypaths(&doc, KeypathsOptions::all_levels()),
///     vec!["a", "a.b", "a.c", "d"]
/// );
/// ```
pub fn keypaths(doc: &Value, options: KeypathsOptions) -> Vec<Keypath> {
    let mut out = Vec::new();
    if let Value::Object(map) = doc {
        collect(map, "", options, &mut out);
    }
    out
}

fn addressable(key: &str) -> bool {
    !key.is_empty() && !key.contains(SEPARATOR)
}

fn collect(map: &Map, prefix: &str, options: KeypathsOptions, out: &mut Vec<Keypath>) {
    for (key, value) in map.iter().filter(|(key, _)| addressable(key)) {
        let path = join_keypath(prefix, key);
        match value {
            Value::Object(child) if !child.is_empty() => {
                if options.all_levels {
                    out.push(path.clone());
                }
                collect(child, &path, options, out);
            }
            _ => out.push(path),
        }
    }
}

/// Drop every path that equals, or lies below, one of the `ignore` paths.
///
/// # Example
///
/// ```
/// use keydelta_keypath::filtered_key_paths;
///
/// let paths = vec!["a".to_string(), "b.c".to_string(), "bc".to_string()];
/// assert_eq!(filtered_key_paths(paths, &["b".to_string()]), vec!["a", "bc"]);
/// ```
pub fn filtered_key_paths<I>(paths: I, ignore: &[Keypath]) -> Vec<Keypath>
where
    I: IntoIterator<Item = Keypath>,
{
    paths
        .into_iter()
        .filter(|path| !ignore.iter().any(|ignored| key_path_contains_path(ignored, path)))
        .collect()
}
