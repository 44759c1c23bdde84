//! Structural pattern matcher.
//!
//! [`matches`] tests whether a JSON value contains a pattern: every key of the
//! pattern must be present in the data with an equal value, recursively. Keys
//! the pattern does not mention are ignored, so `{}` matches any object.
//!
//! Objects and arrays are both nested mappings (arrays keyed by index). When
//! either side of a key is a nested mapping, both must be mappings of the same
//! kind and match recursively. Scalars compare by strict equality: no string to
//! number coercion, numbers compare by value.

use serde_json::Value;

/// Subset-equality test of `data` against `pattern`.
///
/// # Example
///
/// ```rust
/// use funcroute_std::matcher::matches;
/// use serde_json::json;
///
/// let data = json!({ "type": "update", "user": { "id": 7, "name": "x" } });
/// assert!(matches(&data, &json!({ "user": { "id": 7 } })));
/// assert!(!matches(&data, &json!({ "user": { "id": "7" } })));
/// ```
pub fn matches(data: &Value, pattern: &Value) -> bool {
    match pattern {
        Value::Object(pattern) => pattern
            .iter()
            .all(|(key, expected)| entry_matches(data.get(key.as_str()), expected)),
        Value::Array(pattern) => pattern
            .iter()
            .enumerate()
            .all(|(index, expected)| entry_matches(data.get(index), expected)),
        scalar => scalar_eq(data, scalar),
    }
}

fn entry_matches(actual: Option<&Value>, expected: &Value) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    match (actual, expected) {
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_)) => {
            matches(actual, expected)
        }
        (Value::Object(_) | Value::Array(_), _) | (_, Value::Object(_) | Value::Array(_)) => false,
        _ => scalar_eq(actual, expected),
    }
}

fn scalar_eq(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}
