//! Structural equality over decoded JSON values.
//!
//! Comparison is structural, never textual: serializing both sides and
//! comparing strings would make equality depend on key order. Objects are
//! compared by own-key lookup, so two maps with the same entries in a
//! different order are equal.

use serde_json::{Map, Value};

/// Structural deep equality.
///
/// - primitives: equal iff same type and same value; numbers compare
///   numerically, so `1` and `1.0` are equal
/// - arrays: equal iff same length and element-wise equal in order
/// - objects: equal iff same own-key set and pairwise-equal values,
///   key order irrelevant
///
/// The length check plus a single pass over one map keeps the object case
/// linear in entry count.
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(va, vb)| deep_equals(va, vb))
        }
        (Value::Object(x), Value::Object(y)) => objects_equal(x, y),
        _ => false,
    }
}

/// Object comparison by own-key lookup; also used directly by the schema
/// comparator to avoid rewrapping maps.
pub(super) fn objects_equal(x: &Map<String, Value>, y: &Map<String, Value>) -> bool {
    x.len() == y.len()
        && x.iter().all(|(key, va)| match y.get(key) {
            Some(vb) => deep_equals(va, vb),
            None => false,
        })
}

/// Numeric equality across integer and float representations.
fn numbers_equal(x: &serde_json::Number, y: &serde_json::Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
