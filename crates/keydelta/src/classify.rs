//! Change classification: decides, per keypath, whether a modifier has to
//! write the new value, remove the old one, or leave the path alone.
//!
//! Both predicates take the value found at the same keypath in the new
//! document (`val`) and in the previous document (`prev`), either of which
//! may be absent. They are evaluated independently for every path.

use keydelta_util::{deep_equal, deep_equal_opt, is_empty_object, numbers_equal};
use keydelta_value::{Value, ValueKind};

/// Whether `val` must be written at its keypath.
///
/// | kind of `val` | written unless |
/// |---|---|
/// | sequence | deep-equal to `prev` |
/// | date | `prev` is a date with the same instant |
/// | number | `prev` is a number with the same value |
/// | object | deep-equal to `prev` |
/// | truthy scalar | strictly equal to `prev` |
/// | falsy scalar, absent | never written |
///
/// Falsy values never produce a write: a path that goes falsy is expressed
/// through [`should_unset`].
pub fn should_set(val: Option<&Value>, prev: Option<&Value>) -> bool {
    let Some(val) = val else {
        return false;
    };
    match val {
        Value::Array(_) | Value::Object(_) => !deep_equal_opt(Some(val), prev),
        Value::Date(date) => !matches!(prev, Some(Value::Date(old)) if old == date),
        Value::Number(n) => !matches!(prev, Some(Value::Number(old)) if numbers_equal(old, n)),
        Value::Null | Value::Bool(_) | Value::String(_) => val.is_truthy() && prev != Some(val),
    }
}

/// Whether the value that used to live at a keypath must be removed.
///
/// True when `prev` was present (truthy or numeric) and `val` is gone
/// (falsy and not numeric), or when a non-null object in `prev` has been
/// replaced by an empty object.
pub fn should_unset(val: Option<&Value>, prev: Option<&Value>) -> bool {
    let was_present = prev.is_some_and(|p| p.is_truthy() || p.is_number());
    let is_gone = val.map_or(true, |v| !v.is_truthy() && !v.is_number());
    if was_present && is_gone {
        return true;
    }
    match (prev, val) {
        (Some(prev), Some(val)) => {
            is_non_null_object(prev) && is_empty_object(val) && !deep_equal(prev, val)
        }
        _ => false,
    }
}

/// Objects in the broad sense: anything with identity rather than a plain
/// scalar value.
fn is_non_null_object(value: &Value) -> bool {
    match value.kind() {
        ValueKind::Mapping | ValueKind::Sequence | ValueKind::Temporal => true,
        ValueKind::Numeric | ValueKind::Scalar | ValueKind::Absent => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn v(j: serde_json::Value) -> Value {
        Value::from(j)
    }

    fn date(day: u32) -> Value {
        Value::Date(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap())
    }

    #[test]
    fn set_sequence() {
        assert!(should_set(Some(&v(json!([1, 2]))), None));
        assert!(should_set(Some(&v(json!([1, 2]))), Some(&v(json!([2, 1])))));
        assert!(!should_set(Some(&v(json!([1, 2]))), Some(&v(json!([1, 2])))));
        assert!(should_set(Some(&v(json!([]))), None));
    }

    #[test]
    fn set_temporal() {
        assert!(should_set(Some(&date(1)), None));
        assert!(should_set(Some(&date(1)), Some(&date(2))));
        assert!(should_set(Some(&date(1)), Some(&v(json!("2024-01-01T00:00:00.000Z")))));
        assert!(!should_set(Some(&date(1)), Some(&date(1))));
    }

    #[test]
    fn set_numeric() {
        assert!(should_set(Some(&v(json!(5))), None));
        assert!(should_set(Some(&v(json!(5))), Some(&v(json!("5")))));
        assert!(should_set(Some(&v(json!(0))), Some(&v(json!(1)))));
        assert!(!should_set(Some(&v(json!(5))), Some(&v(json!(5.0)))));
        assert!(!should_set(Some(&v(json!(0))), Some(&v(json!(0)))));
    }

    #[test]
    fn set_mapping() {
        assert!(should_set(Some(&v(json!({}))), Some(&v(json!({"a": 1})))));
        assert!(!should_set(Some(&v(json!({"a": 1}))), Some(&v(json!({"a": 1.0})))));
    }

    #[test]
    fn set_scalar() {
        assert!(should_set(Some(&v(json!("x"))), None));
        assert!(should_set(Some(&v(json!("x"))), Some(&v(json!("y")))));
        assert!(should_set(Some(&v(json!(true))), Some(&v(json!(1)))));
        assert!(!should_set(Some(&v(json!("x"))), Some(&v(json!("x")))));
    }

    #[test]
    fn falsy_never_set() {
        for falsy in [json!(null), json!(false), json!("")] {
            assert!(!should_set(Some(&v(falsy.clone())), Some(&v(json!("was")))));
            assert!(!should_set(Some(&v(falsy)), None));
        }
        assert!(!should_set(None, Some(&v(json!(1)))));
    }

    #[test]
    fn unset_when_value_disappears() {
        assert!(should_unset(None, Some(&v(json!(1)))));
        assert!(should_unset(None, Some(&v(json!(0)))));
        assert!(should_unset(Some(&v(json!(false))), Some(&v(json!("x")))));
        assert!(should_unset(Some(&Value::Null), Some(&v(json!({"a": 1})))));
        assert!(should_unset(Some(&v(json!(""))), Some(&date(1))));
    }

    #[test]
    fn no_unset_for_falsy_previous() {
        assert!(!should_unset(None, Some(&v(json!(false)))));
        assert!(!should_unset(None, Some(&Value::Null)));
        assert!(!should_unset(None, Some(&v(json!("")))));
        assert!(!should_unset(None, None));
    }

    #[test]
    fn no_unset_for_numeric_replacement() {
        assert!(!should_unset(Some(&v(json!(0))), Some(&v(json!(1)))));
        assert!(!should_unset(Some(&v(json!(2))), Some(&v(json!("x")))));
    }

    #[test]
    fn unset_when_object_emptied() {
        assert!(should_unset(Some(&v(json!({}))), Some(&v(json!({"a": 1})))));
        assert!(should_unset(Some(&v(json!({}))), Some(&v(json!([1])))));
        assert!(!should_unset(Some(&v(json!({}))), Some(&v(json!({})))));
        assert!(!should_unset(Some(&v(json!({}))), Some(&v(json!("x")))));
        assert!(!should_unset(Some(&v(json!([]))), Some(&v(json!({"a": 1})))));
    }
}
