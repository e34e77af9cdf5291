use std::cell::RefCell;

use keydelta::modifier::{from_json, to_json};
use keydelta::{
    apply, apply_modifier, diff_to_modifier, map_modifier_to_key, modifier_to_obj,
    obj_to_modifier, update, Collection, DiffOptions, MemoryCollection, Modifier, SyncError,
    UpdateOptions,
};
use keydelta_value::Value;
use serde_json::json;

fn v(j: serde_json::Value) -> Value {
    Value::from(j)
}

fn diff(prev: serde_json::Value, doc: serde_json::Value) -> Option<serde_json::Value> {
    diff_to_modifier(Some(&v(prev)), Some(&v(doc)), &DiffOptions::default()).map(|m| to_json(&m))
}

#[test]
fn profile_edit_round_trip() {
    let prev = v(json!({
        "_id": "u1",
        "name": "Ada",
        "address": {"city": "London", "zip": "N1", "geo": {"lat": 51.5, "lng": -0.1}},
        "roles": ["admin"],
        "joined": {"$date": "2020-02-03T04:05:06.000Z"},
        "visits": 3
    }));
    let next = v(json!({
        "_id": "u1",
        "name": "Ada Lovelace",
        "address": {"city": "London", "zip": "N7"},
        "roles": ["admin", "editor"],
        "joined": {"$date": "2020-02-03T04:05:06.000Z"},
        "visits": 0
    }));

    let modifier = diff_to_modifier(Some(&prev), Some(&next), &DiffOptions::default()).unwrap();
    assert_eq!(
        to_json(&modifier),
        json!({
            "set": {"name": "Ada Lovelace", "address.zip": "N7", "roles": ["admin", "editor"], "visits": 0},
            "unset": {"address.geo": true}
        })
    );

    let mut doc = prev.clone();
    apply_modifier(&mut doc, &modifier).unwrap();
    assert_eq!(doc, next);
}

#[test]
fn subtree_removal_is_a_single_unset() {
    assert_eq!(
        diff(json!({"a": {"b": 1, "c": 2}}), json!({})),
        Some(json!({"unset": {"a": true}}))
    );
}

#[test]
fn falsy_replacement_is_an_unset() {
    assert_eq!(
        diff(json!({"a": true}), json!({"a": false})),
        Some(json!({"unset": {"a": true}}))
    );
}

#[test]
fn number_replacing_string_is_a_set() {
    assert_eq!(diff(json!({"a": "5"}), json!({"a": 5})), Some(json!({"set": {"a": 5}})));
}

#[test]
fn ignored_fields_are_skipped() {
    let options = DiffOptions::default().with_ignore(["b"]);
    let modifier = diff_to_modifier(
        Some(&v(json!({"a": 1, "b": 1}))),
        Some(&v(json!({"a": 2, "b": 2}))),
        &options,
    );
    assert_eq!(modifier, Some(Modifier::new().with_set("a", 2)));
}

#[test]
fn date_changes() {
    let same = json!({"at": {"$date": "2024-01-01T00:00:00.000Z"}});
    assert_eq!(diff(same.clone(), same.clone()), None);

    let epoch_ms = json!({"at": {"$date": 1704067200000i64}});
    assert_eq!(diff(same.clone(), epoch_ms), None);

    assert_eq!(
        diff(same, json!({"at": {"$date": "2024-01-02T00:00:00.000Z"}})),
        Some(json!({"set": {"at": {"$date": "2024-01-02T00:00:00.000Z"}}}))
    );
}

#[test]
fn insertion_modifier_and_materialisation() {
    let obj = v(json!({"x": {"y": 1}}));
    let modifier = obj_to_modifier(&obj).unwrap();
    assert_eq!(to_json(&modifier), json!({"set": {"x.y": 1}}));
    assert_eq!(modifier_to_obj(&modifier).unwrap(), obj);
}

#[test]
fn nested_modifier_folds_into_parent() {
    let prev_item = v(json!({"qty": 1, "note": "gift"}));
    let next_item = v(json!({"qty": 2}));
    let item_diff = diff_to_modifier(Some(&prev_item), Some(&next_item), &DiffOptions::default());
    let order_diff = map_modifier_to_key(item_diff.as_ref(), "items.first").unwrap();

    let mut order = v(json!({"items": {"first": {"qty": 1, "note": "gift"}}, "total": 10}));
    apply_modifier(&mut order, &order_diff).unwrap();
    assert_eq!(order, v(json!({"items": {"first": {"qty": 2}}, "total": 10})));
}

#[test]
fn wire_modifier_applies_like_typed_one() {
    let wire = json!({"set": {"a.b": 1}, "unset": {"c": true}});
    let mut from_wire = v(json!({"c": 1}));
    apply(&mut from_wire, &v(wire.clone())).unwrap();

    let mut from_typed = v(json!({"c": 1}));
    apply_modifier(&mut from_typed, &from_json(&wire).unwrap()).unwrap();

    assert_eq!(from_wire, from_typed);
    assert_eq!(from_wire, v(json!({"a": {"b": 1}})));
}

#[test]
fn prune_option_collapses_emptied_objects() {
    let prev = v(json!({"settings": {"theme": "dark"}}));
    let next = v(json!({"settings": {"theme": null}}));
    let options = DiffOptions::default().with_prune_empty_objects(true);
    assert_eq!(
        diff_to_modifier(Some(&prev), Some(&next), &options),
        Some(Modifier::new().with_unset("settings"))
    );
}

#[test]
fn sync_through_setter() {
    let stored = RefCell::new(v(json!({"_id": 1, "title": "Draft", "tags": ["a"]})));
    let desired = v(json!({"_id": 1, "title": "Final", "tags": ["a"]}));

    let diff = update(
        &desired,
        UpdateOptions::new()
            .with_get(|| Some(stored.borrow().clone()))
            .with_set(|next| {
                *stored.borrow_mut() = next;
                Ok(())
            }),
    )
    .unwrap();

    assert_eq!(diff, Some(Modifier::new().with_set("title", "Final")));
    assert_eq!(stored.into_inner(), desired);
}

#[test]
fn sync_reports_classifier_gap() {
    let result = update(
        &v(json!({"_id": 1, "a": false})),
        UpdateOptions::new()
            .with_get(|| Some(v(json!({"_id": 1, "a": true}))))
            .with_set(|_| Ok(())),
    );
    assert_eq!(
        result,
        Err(SyncError::ConsistencyViolation {
            keypaths: vec!["a".to_string()]
        })
    );
}

#[test]
fn sync_detects_keys_outside_keypath_reach() {
    let stored = RefCell::new(v(json!({"_id": 1, "x": 1})));
    let desired = v(json!({"_id": 1, "x": 2, "a.b": 1}));

    let result = update(
        &desired,
        UpdateOptions::new()
            .with_get(|| Some(stored.borrow().clone()))
            .with_set(|next| {
                *stored.borrow_mut() = next;
                Ok(())
            }),
    );

    assert_eq!(
        result,
        Err(SyncError::ConsistencyViolation {
            keypaths: vec!["a.b".to_string()]
        })
    );
    assert_eq!(stored.into_inner(), v(json!({"_id": 1, "x": 2})));
}

#[test]
fn empty_keys_never_reach_a_modifier() {
    assert_eq!(diff(json!({"a": {}}), json!({"a": {"": 1}})), None);

    let prev = v(json!({"a": {"": 1, "b": 1}}));
    let desired = v(json!({"a": {"": 1, "b": 2}}));
    let modifier = diff_to_modifier(Some(&prev), Some(&desired), &DiffOptions::default()).unwrap();
    assert_eq!(modifier, Modifier::new().with_set("a.b", 2));
    let mut patched = prev.clone();
    apply_modifier(&mut patched, &modifier).unwrap();
    assert_eq!(patched, desired);
}

#[test]
fn sync_without_writer_fails() {
    let result = update(
        &v(json!({"_id": 1, "a": 2})),
        UpdateOptions::new().with_get(|| Some(v(json!({"_id": 1, "a": 1})))),
    );
    assert_eq!(result, Err(SyncError::MissingSetter));
}

#[test]
fn sync_without_target_fails() {
    let result = update(&v(json!({"_id": 1})), UpdateOptions::new());
    assert_eq!(result, Err(SyncError::MissingComparisonTarget));
}

#[test]
fn sync_through_collection_propagates_removals() {
    let posts = MemoryCollection::with_documents(vec![
        v(json!({"_id": "p1", "title": "Hello", "draft": {"by": "ada"}})),
        v(json!({"_id": "p2", "title": "Other"})),
    ]);
    let desired = v(json!({"_id": "p1", "title": "Hello, world"}));

    let diff = update(&desired, UpdateOptions::new().with_collection(&posts)).unwrap();

    assert_eq!(
        diff,
        Some(Modifier::new().with_set("title", "Hello, world").with_unset("draft"))
    );
    assert_eq!(
        posts.find_one(&v(json!({"_id": "p1"}))).unwrap(),
        Some(desired)
    );
    assert_eq!(
        posts.find_one(&v(json!({"_id": "p2"}))).unwrap(),
        Some(v(json!({"_id": "p2", "title": "Other"})))
    );
}
