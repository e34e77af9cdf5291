use keydelta_value::Value;

/// True only for an object without keys. Empty arrays, `null` and other
/// leaves are not empty objects.
///
/// # Examples
///
/// ```
/// use keydelta_util::is_empty_object;
/// use keydelta_value::Value;
///
/// assert!(is_empty_object(&Value::object()));
/// assert!(!is_empty_object(&Value::from(Vec::new())));
/// ```
pub fn is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}
