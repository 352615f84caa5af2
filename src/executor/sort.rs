// ============================================================================
// Multi-key stable ordering for query results
// ============================================================================

use crate::core::{Row, compare_values};
use std::cmp::Ordering;

/// One key of an `order` specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    /// false = ascending (default), true = descending
    pub descending: bool,
}

impl SortKey {
    pub fn new(field: impl Into<String>, descending: bool) -> Self {
        Self {
            field: field.into(),
            descending,
        }
    }
}

/// Parse a comma-separated `field[:desc]` list.
///
/// Direction tokens are case-insensitive; anything other than `desc` sorts
/// ascending. Empty segments are skipped. The order parameter has no error
/// taxonomy, so parsing is lenient.
pub fn parse_order(raw: &str) -> Vec<SortKey> {
    raw.split(',')
        .filter_map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }
            let (field, direction) = match segment.split_once(':') {
                Some((field, direction)) => (field.trim(), direction.trim()),
                None => (segment, ""),
            };
            if field.is_empty() {
                return None;
            }
            Some(SortKey::new(field, direction.eq_ignore_ascii_case("desc")))
        })
        .collect()
}

/// Compares two rows by each sort key in turn; ties fall through to the next
/// key.
pub struct RowComparator<'a> {
    sort_keys: &'a [SortKey],
}

impl<'a> RowComparator<'a> {
    pub fn new(sort_keys: &'a [SortKey]) -> Self {
        Self { sort_keys }
    }

    pub fn compare(&self, row1: &Row, row2: &Row) -> Ordering {
        for key in self.sort_keys {
            let ordering = Self::compare_by_key(row1, row2, key);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    fn compare_by_key(row1: &Row, row2: &Row, key: &SortKey) -> Ordering {
        match (row1.get(&key.field), row2.get(&key.field)) {
            // Rows missing the sort field land after all rows that have it,
            // regardless of direction.
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ordering = compare_values(a, b);
                if key.descending { ordering.reverse() } else { ordering }
            }
        }
    }
}

/// Stable sort: rows that compare equal keep their input order.
pub fn sort_rows(rows: &mut [Row], sort_keys: &[SortKey]) {
    if rows.is_empty() || sort_keys.is_empty() {
        return;
    }
    let comparator = RowComparator::new(sort_keys);
    rows.sort_by(|a, b| comparator.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("row fixtures must be objects"),
        }
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(
            parse_order("score:desc,name"),
            vec![SortKey::new("score", true), SortKey::new("name", false)]
        );
        assert_eq!(parse_order("name:asc"), vec![SortKey::new("name", false)]);
        assert_eq!(parse_order("name:DESC"), vec![SortKey::new("name", true)]);
        // Lenient on noise.
        assert_eq!(parse_order(" , name , "), vec![SortKey::new("name", false)]);
        assert_eq!(parse_order("name:sideways"), vec![SortKey::new("name", false)]);
        assert!(parse_order("").is_empty());
    }

    #[test]
    fn test_single_key_ascending() {
        let mut rows = vec![
            row(json!({"n": 3})),
            row(json!({"n": 1})),
            row(json!({"n": 2})),
        ];
        sort_rows(&mut rows, &parse_order("n"));
        let ns: Vec<i64> = rows.iter().map(|r| r["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![1, 2, 3]);
    }

    #[test]
    fn test_descending() {
        let mut rows = vec![
            row(json!({"n": 1})),
            row(json!({"n": 3})),
            row(json!({"n": 2})),
        ];
        sort_rows(&mut rows, &parse_order("n:desc"));
        let ns: Vec<i64> = rows.iter().map(|r| r["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![3, 2, 1]);
    }

    #[test]
    fn test_multi_key_tie_breaking() {
        let mut rows = vec![
            row(json!({"group": "a", "n": 1})),
            row(json!({"group": "b", "n": 9})),
            row(json!({"group": "a", "n": 5})),
        ];
        sort_rows(&mut rows, &parse_order("group,n:desc"));
        let pairs: Vec<(String, i64)> = rows
            .iter()
            .map(|r| {
                (
                    r["group"].as_str().unwrap().to_string(),
                    r["n"].as_i64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), 5),
                ("a".to_string(), 1),
                ("b".to_string(), 9)
            ]
        );
    }

    #[test]
    fn test_missing_field_sorts_last_both_directions() {
        for order in ["n", "n:desc"] {
            let mut rows = vec![
                row(json!({"other": 1})),
                row(json!({"n": 2})),
                row(json!({"n": 1})),
            ];
            sort_rows(&mut rows, &parse_order(order));
            assert!(rows[2].get("n").is_none(), "order={order}");
            assert!(rows[0].get("n").is_some());
        }
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let mut rows = vec![
            row(json!({"k": 1, "tag": "first"})),
            row(json!({"k": 1, "tag": "second"})),
            row(json!({"k": 0, "tag": "third"})),
        ];
        sort_rows(&mut rows, &parse_order("k"));
        assert_eq!(rows[0]["tag"], json!("third"));
        assert_eq!(rows[1]["tag"], json!("first"));
        assert_eq!(rows[2]["tag"], json!("second"));
    }

    #[test]
    fn test_string_ordering() {
        let mut rows = vec![
            row(json!({"s": "pear"})),
            row(json!({"s": "apple"})),
            row(json!({"s": "mango"})),
        ];
        sort_rows(&mut rows, &parse_order("s"));
        let ss: Vec<&str> = rows.iter().map(|r| r["s"].as_str().unwrap()).collect();
        assert_eq!(ss, vec!["apple", "mango", "pear"]);
    }
}
