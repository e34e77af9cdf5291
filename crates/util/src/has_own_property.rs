use keydelta_value::Value;

/// Whether `value` is an object with a direct child named `key`. The child
/// may be `null`.
pub fn has_own_property(value: &Value, key: &str) -> bool {
    value.as_object().is_some_and(|map| map.contains_key(key))
}
