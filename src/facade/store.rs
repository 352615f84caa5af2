use std::collections::HashMap;

use tracing::debug;

use crate::access::{Requester, can_read, can_write};
use crate::core::{QueryError, Result, Row};
use crate::executor::{QueryExecutor, QueryOptions};
use crate::json::FieldSchema;
use crate::result::{ApiResponse, QueryResult};
use crate::source::RowSource;

/// Raw string query parameters as received from the transport layer.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub where_clause: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    pub count: Option<String>,
    pub query: Option<String>,
}

impl QueryParams {
    /// Decode into executor options. Non-numeric `limit`/`page` strings are
    /// pagination errors; positivity itself is enforced by the executor.
    pub fn to_options(&self) -> Result<QueryOptions> {
        Ok(QueryOptions {
            where_clause: self.where_clause.clone(),
            text_query: self.query.clone(),
            order: self.order.clone(),
            limit: self
                .limit
                .as_deref()
                .map(|raw| parse_integer("limit", raw))
                .transpose()?,
            page: self
                .page
                .as_deref()
                .map(|raw| parse_integer("page", raw))
                .transpose()?,
            count: self
                .count
                .as_deref()
                .is_some_and(|raw| raw.eq_ignore_ascii_case("true") || raw == "1"),
        })
    }
}

fn parse_integer(name: &str, raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        QueryError::InvalidPaginationParameter(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))
    })
}

/// Ties a row source to the query core: access filtering, optional schema
/// validation on writes, query execution, response wrapping.
pub struct Store<S: RowSource> {
    source: S,
    schemas: HashMap<String, Vec<(String, FieldSchema)>>,
}

impl<S: RowSource> Store<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            schemas: HashMap::new(),
        }
    }

    /// Register column schemas for a table; later writes are validated
    /// against them. Descriptors use the schema-cell grammar (bare type name
    /// or JSON object).
    pub fn set_schema(&mut self, table: impl Into<String>, columns: &[(&str, &str)]) {
        let parsed = columns
            .iter()
            .map(|(field, descriptor)| (field.to_string(), FieldSchema::parse(descriptor)))
            .collect();
        self.schemas.insert(table.into(), parsed);
    }

    /// Run a query for `requester`: rows the requester cannot read are
    /// dropped before filtering, so counts and pagination never leak
    /// invisible records.
    pub fn query(
        &self,
        table: &str,
        params: &QueryParams,
        requester: &Requester,
    ) -> Result<QueryResult> {
        let options = params.to_options()?;
        let rows = self.source.fetch_rows(table)?;
        let fetched = rows.len();
        let readable: Vec<Row> = rows
            .into_iter()
            .filter(|row| can_read(row, requester))
            .collect();
        debug!(table, fetched, readable = readable.len(), "query admitted");
        QueryExecutor::execute(readable, &options)
    }

    /// Append a row after schema validation.
    pub fn insert(&mut self, table: &str, row: Row, _requester: &Requester) -> Result<()> {
        self.validate_row(table, &row)?;
        self.source.append_row(table, row)
    }

    /// Replace the row at `index`, enforcing its write flag.
    pub fn update(
        &mut self,
        table: &str,
        index: usize,
        row: Row,
        requester: &Requester,
    ) -> Result<()> {
        let existing = self.source.fetch_rows(table)?;
        let current = existing
            .get(index)
            .ok_or_else(|| QueryError::TableNotFound(format!("{table}: no row at index {index}")))?;
        if !can_write(current, requester) {
            return Err(QueryError::AccessDenied(format!(
                "row {index} of '{table}' is not writable by this requester"
            )));
        }
        self.validate_row(table, &row)?;
        self.source.update_row(table, index, row)
    }

    /// Wrap a query outcome in the wire envelope.
    pub fn respond(outcome: Result<QueryResult>) -> ApiResponse {
        ApiResponse::from(outcome)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn validate_row(&self, table: &str, row: &Row) -> Result<()> {
        let Some(columns) = self.schemas.get(table) else {
            return Ok(());
        };
        for (field, schema) in columns {
            schema.validate(field, row.get(field))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("row fixtures must be objects"),
        }
    }

    fn store_with_rows(rows_json: Vec<serde_json::Value>) -> Store<MemorySource> {
        let rows = rows_json.into_iter().map(row).collect();
        Store::new(MemorySource::new().with_table("records", rows))
    }

    #[test]
    fn test_query_params_decode() {
        let params = QueryParams {
            limit: Some("5".to_string()),
            page: Some("2".to_string()),
            count: Some("true".to_string()),
            ..Default::default()
        };
        let options = params.to_options().unwrap();
        assert_eq!(options.limit, Some(5));
        assert_eq!(options.page, Some(2));
        assert!(options.count);
    }

    #[test]
    fn test_non_numeric_pagination_param() {
        let params = QueryParams {
            limit: Some("lots".to_string()),
            ..Default::default()
        };
        let err = params.to_options().unwrap_err();
        assert!(matches!(err, QueryError::InvalidPaginationParameter(_)));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_unreadable_rows_never_reach_the_executor() {
        let store = store_with_rows(vec![
            json!({"id": 1}),
            json!({"id": 2, "_permissions": {"read": "role:staff"}}),
        ]);
        let params = QueryParams {
            count: Some("true".to_string()),
            ..Default::default()
        };

        let public = store.query("records", &params, &Requester::anonymous()).unwrap();
        assert_eq!(public.count, Some(1));

        let staff = store
            .query("records", &params, &Requester::user("u").with_role("staff"))
            .unwrap();
        assert_eq!(staff.count, Some(2));
    }

    #[test]
    fn test_update_enforces_write_flag() {
        let mut store = store_with_rows(vec![
            json!({"id": 1, "_permissions": {"write": "user:owner"}}),
        ]);
        let replacement = row(json!({"id": 1, "v": 2}));

        let err = store
            .update("records", 0, replacement.clone(), &Requester::user("intruder"))
            .unwrap_err();
        assert!(matches!(err, QueryError::AccessDenied(_)));

        store
            .update("records", 0, replacement, &Requester::user("owner"))
            .unwrap();
        assert_eq!(store.source().fetch_rows("records").unwrap()[0]["v"], json!(2));
    }

    #[test]
    fn test_insert_validates_schema() {
        let mut store = Store::new(MemorySource::new().with_table("records", vec![]));
        store.set_schema(
            "records",
            &[
                ("name", r#"{"type":"string","required":true}"#),
                ("score", "number"),
            ],
        );

        let err = store
            .insert("records", row(json!({"score": 10})), &Requester::anonymous())
            .unwrap_err();
        assert!(matches!(err, QueryError::SchemaViolation(_)));

        store
            .insert(
                "records",
                row(json!({"name": "ok", "score": 10})),
                &Requester::anonymous(),
            )
            .unwrap();
    }

    #[test]
    fn test_respond_maps_errors_to_envelope() {
        let store = store_with_rows(vec![json!({"id": 1})]);
        let params = QueryParams {
            where_clause: Some(r#"{"id": {"$bogus": 1}}"#.to_string()),
            ..Default::default()
        };
        let response =
            Store::<MemorySource>::respond(store.query("records", &params, &Requester::anonymous()));
        assert_eq!(response.http_status(), 400);
    }
}
