use serde_json::Value;
use std::cmp::Ordering;

/// One record of an externally stored table: an ordered mapping from field
/// name to a JSON value. Rows are immutable snapshots; evaluation never
/// mutates them.
pub type Row = serde_json::Map<String, Value>;

/// Numeric view of a JSON value, coercing integers to floats.
pub fn numeric_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// String form of a scalar value, used by `$regex`-adjacent text matching
/// and free-text search. Containers and null have no string form.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fixed rank so heterogeneous columns still sort under a total order.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total ordering over JSON values for sorting.
///
/// Numbers compare numerically (NaN sorts after every finite value), strings
/// lexicographically, booleans false-before-true. Values of different types
/// fall back to a fixed type rank; containers of equal rank compare equal so
/// the stable sort preserves their input order.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            match (x.is_nan(), y.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(numeric_of(&json!(42)), Some(42.0));
        assert_eq!(numeric_of(&json!(2.5)), Some(2.5));
        assert_eq!(numeric_of(&json!("42")), None);
        assert_eq!(numeric_of(&json!(null)), None);
    }

    #[test]
    fn test_text_form() {
        assert_eq!(text_of(&json!("abc")), Some("abc".to_string()));
        assert_eq!(text_of(&json!(15)), Some("15".to_string()));
        assert_eq!(text_of(&json!(true)), Some("true".to_string()));
        assert_eq!(text_of(&json!(null)), None);
        assert_eq!(text_of(&json!([1, 2])), None);
    }

    #[test]
    fn test_compare_numbers_mixed_repr() {
        assert_eq!(compare_values(&json!(1), &json!(2.5)), Ordering::Less);
        assert_eq!(compare_values(&json!(3.0), &json!(3)), Ordering::Equal);
    }

    #[test]
    fn test_compare_across_types_is_total() {
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!("10")), Ordering::Less);
        assert_eq!(compare_values(&json!("z"), &json!([1])), Ordering::Less);
    }
}
