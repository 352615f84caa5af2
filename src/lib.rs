// ============================================================================
// gridstore — spreadsheet-backed row store core
// ============================================================================
//
// The query/schema heart of a Backend-as-a-Service that exposes a
// spreadsheet as a data store: a MongoDB-style WHERE evaluator, safe
// JSON/schema comparison, and an in-memory query executor with ordering,
// pagination, and counting. Transport, auth flows, and the real spreadsheet
// adapter live elsewhere; this crate is pure logic over row snapshots.

pub mod access;
pub mod core;
pub mod executor;
pub mod facade;
pub mod filter;
pub mod json;
pub mod result;
pub mod source;

// Re-export main types for convenience
pub use access::Requester;
pub use core::{QueryError, Result, Row};
pub use executor::{QueryExecutor, QueryOptions};
pub use facade::{QueryParams, Store};
pub use filter::{Expr, evaluate, parse_expression};
pub use json::{deep_equals, is_valid_object_json, parse_object_or_null, schema_rows_equal};
pub use result::{ApiResponse, Pagination, QueryResult};
pub use source::{MemorySource, RowSource};

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
    fn test_end_to_end_query() {
        let source = MemorySource::new().with_table(
            "scores",
            (1..=4).map(|i| row(json!({"id": i, "score": i * 100}))).collect(),
        );
        let store = Store::new(source);

        let params = QueryParams {
            where_clause: Some(r#"{"score": {"$gte": 200}}"#.to_string()),
            order: Some("score:desc".to_string()),
            limit: Some("2".to_string()),
            count: Some("true".to_string()),
            ..Default::default()
        };
        let result = store.query("scores", &params, &Requester::anonymous()).unwrap();

        assert_eq!(result.row_count(), 2);
        assert_eq!(result.results[0]["score"], json!(400));
        assert_eq!(result.count, Some(3));
    }

    #[test]
    fn test_error_surfaces_in_envelope() {
        let store = Store::new(MemorySource::new().with_table("t", vec![]));
        let params = QueryParams {
            where_clause: Some("{oops".to_string()),
            ..Default::default()
        };
        let response = Store::<MemorySource>::respond(store.query(
            "t",
            &params,
            &Requester::anonymous(),
        ));
        assert_eq!(response.http_status(), 400);
        let body = serde_json::to_value(response).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Invalid WHERE"));
    }
}
