//! # Built-in Comparators
//!
//! Comparators decide whether a candidate's return value matches the
//! expected output. All of them share the [`ComparatorFn`] signature.
//!
//! ## Comparators Provided
//!
//! - **`proctor.equal`**: structural equality
//! - **`proctor.equal_diff`**: structural equality, failing with a line diff
//! - **`proctor.unordered`**: list equality ignoring element order
//! - **`proctor.float_close`**: numeric equality within a relative tolerance
//!
//! An absent actual value (the candidate raised) compares as nil, so a case
//! that expects an error and a nil output matches on the return value.

use crate::diff::{diff_values, render_plain};
use crate::errors::ComparisonError;
use crate::registry::{ComparatorFn, Registry};
use crate::value::Value;

/// Relative tolerance used by `proctor.float_close`.
pub const FLOAT_TOLERANCE: f64 = 1e-9;

const NIL: &Value = &Value::Nil;

/// Structural equality.
///
/// Example:
///   actual `16`, expected `16` => true
pub const COMPARE_EQUAL: ComparatorFn =
    |actual, expected, _crash| Ok(actual.unwrap_or(NIL) == expected);

/// Structural equality; a mismatch raises with the diff of both values
/// attached as notes, expected lines marked `-` and actual lines `+`.
pub const COMPARE_EQUAL_DIFF: ComparatorFn = |actual, expected, _crash| {
    let actual = actual.unwrap_or(NIL);
    if actual == expected {
        return Ok(true);
    }
    let lines = render_plain(&diff_values(expected, Some(actual)));
    Err(ComparisonError::new("return value differs from expected").with_notes(lines))
};

/// List equality ignoring element order. Non-list values fall back to
/// structural equality.
pub const COMPARE_UNORDERED: ComparatorFn = |actual, expected, _crash| {
    match (actual.unwrap_or(NIL), expected) {
        (Value::List(a), Value::List(b)) => Ok(same_multiset(a, b)),
        (actual, expected) => Ok(actual == expected),
    }
};

/// Numeric equality within [`FLOAT_TOLERANCE`]; lists and maps compare
/// element-wise. Identical values always match; otherwise a non-numeric
/// operand is an error rather than a plain mismatch.
pub const COMPARE_FLOAT_CLOSE: ComparatorFn = |actual, expected, _crash| match actual {
    None => Ok(expected.is_nil()),
    Some(actual) => close(actual, expected),
};

fn same_multiset(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut unmatched: Vec<&Value> = b.iter().collect();
    for item in a {
        match unmatched.iter().position(|candidate| *candidate == item) {
            Some(index) => {
                unmatched.swap_remove(index);
            }
            None => return false,
        }
    }
    true
}

fn close(actual: &Value, expected: &Value) -> Result<bool, ComparisonError> {
    if actual == expected {
        return Ok(true);
    }
    match (actual, expected) {
        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (x, y) in a.iter().zip(b) {
                if !close(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Map(a), Value::Map(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (key, x) in a.iter() {
                let Some(y) = b.get(key) else {
                    return Ok(false);
                };
                if !close(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => {
            let (Some(x), Some(y)) = (actual.as_float(), expected.as_float()) else {
                return Err(ComparisonError::new(format!(
                    "cannot compare {} with {} numerically",
                    actual.type_name(),
                    expected.type_name()
                ))
                .with_note(format!("actual: {}", actual))
                .with_note(format!("expected: {}", expected)));
            };
            let scale = x.abs().max(y.abs()).max(1.0);
            Ok((x - y).abs() <= FLOAT_TOLERANCE * scale)
        }
    }
}

/// Registers every built-in comparator with the given registry.
pub fn register_builtin_comparators(registry: &mut Registry) {
    registry
        .register_comparator("proctor.equal", COMPARE_EQUAL)
        .register_comparator("proctor.equal_diff", COMPARE_EQUAL_DIFF)
        .register_comparator("proctor.unordered", COMPARE_UNORDERED)
        .register_comparator("proctor.float_close", COMPARE_FLOAT_CLOSE);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[i64]) -> Value {
        Value::List(items.iter().map(|n| Value::Int(*n)).collect())
    }

    #[test]
    fn equal_treats_absent_actual_as_nil() {
        assert_eq!(COMPARE_EQUAL(None, &Value::Nil, false), Ok(true));
        assert_eq!(COMPARE_EQUAL(None, &Value::Int(16), false), Ok(false));
    }

    #[test]
    fn equal_diff_attaches_marked_lines() {
        let err = COMPARE_EQUAL_DIFF(Some(&Value::Int(15)), &Value::Int(16), false).unwrap_err();
        assert_eq!(err.notes, vec!["- 16", "+ 15"]);
    }

    #[test]
    fn unordered_ignores_order_but_not_multiplicity() {
        assert_eq!(COMPARE_UNORDERED(Some(&list(&[3, 1, 2])), &list(&[1, 2, 3]), false), Ok(true));
        assert_eq!(COMPARE_UNORDERED(Some(&list(&[1, 1, 2])), &list(&[1, 2, 2]), false), Ok(false));
    }

    #[test]
    fn float_close_tolerates_rounding() {
        let actual = Value::Float(0.1 + 0.2);
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&actual), &Value::Float(0.3), false), Ok(true));
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&Value::Int(3)), &Value::Float(3.0), false), Ok(true));
        assert!(COMPARE_FLOAT_CLOSE(Some(&Value::from("x")), &Value::Int(1), false).is_err());
    }

    #[test]
    fn float_close_accepts_identical_non_numbers() {
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&Value::Nil), &Value::Nil, false), Ok(true));
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&Value::from("x")), &Value::from("x"), false), Ok(true));
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&Value::Bool(true)), &Value::Bool(true), false), Ok(true));
        let nested = Value::List(vec![Value::Nil, Value::from("label"), Value::Float(1.5)]);
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&nested), &nested, false), Ok(true));
    }

    #[test]
    fn float_close_compares_maps_by_key() {
        let map = |x: f64| {
            let mut map = im::OrdMap::new();
            map.insert("area".to_string(), Value::Float(x));
            map.insert("unit".to_string(), Value::from("m2"));
            Value::Map(map)
        };
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&map(0.1 + 0.2)), &map(0.3), false), Ok(true));
        assert_eq!(COMPARE_FLOAT_CLOSE(Some(&map(0.4)), &map(0.3), false), Ok(false));

        let mut other_key = im::OrdMap::new();
        other_key.insert("volume".to_string(), Value::Float(0.3));
        other_key.insert("unit".to_string(), Value::from("m2"));
        assert_eq!(
            COMPARE_FLOAT_CLOSE(Some(&map(0.3)), &Value::Map(other_key), false),
            Ok(false)
        );
    }
}
