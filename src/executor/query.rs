use tracing::debug;

use super::sort::{SortKey, parse_order, sort_rows};
use crate::core::{QueryError, Result, Row};
use crate::filter::pattern::contains_ci;
use crate::filter::{evaluate, parse_expression};
use crate::result::{Pagination, QueryResult};

/// Options for one query execution, already decoded from the wire.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Raw WHERE parameter: a JSON filter tree.
    pub where_clause: Option<String>,
    /// Free-text search over all string-valued fields.
    pub text_query: Option<String>,
    /// Comma-separated `field[:desc]` list.
    pub order: Option<String>,
    pub limit: Option<i64>,
    /// 1-indexed; only meaningful together with `limit`.
    pub page: Option<i64>,
    /// Report the total number of matches before pagination.
    pub count: bool,
}

impl QueryOptions {
    pub fn with_where(mut self, filter: impl Into<String>) -> Self {
        self.where_clause = Some(filter.into());
        self
    }

    pub fn with_text_query(mut self, query: impl Into<String>) -> Self {
        self.text_query = Some(query.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_count(mut self) -> Self {
        self.count = true;
        self
    }
}

/// Runs a query over a materialized row snapshot: filter, sort, count,
/// paginate. Pure over its inputs.
pub struct QueryExecutor;

impl QueryExecutor {
    pub fn execute(rows: Vec<Row>, options: &QueryOptions) -> Result<QueryResult> {
        // Pagination parameters are rejected before any row is scanned.
        let (limit, page) = validate_pagination(options)?;

        // Parse-time validation of the whole filter tree, also before the
        // scan.
        let expr = options
            .where_clause
            .as_deref()
            .map(parse_expression)
            .transpose()?;
        let sort_keys: Vec<SortKey> = options
            .order
            .as_deref()
            .map(parse_order)
            .unwrap_or_default();

        let scanned = rows.len();
        let mut matched: Vec<Row> = rows
            .into_iter()
            .filter(|row| expr.as_ref().is_none_or(|e| evaluate(e, row)))
            .filter(|row| {
                options
                    .text_query
                    .as_deref()
                    .is_none_or(|q| row_contains_text(row, q))
            })
            .collect();

        sort_rows(&mut matched, &sort_keys);

        let total = matched.len();
        let results = match limit {
            Some(limit) => {
                let start = (page - 1).saturating_mul(limit);
                matched.into_iter().skip(start).take(limit).collect()
            }
            None => matched,
        };

        debug!(scanned, total, returned = results.len(), "query executed");

        Ok(QueryResult {
            results,
            count: options.count.then_some(total),
            pagination: limit.map(|limit| Pagination { page, limit, total }),
        })
    }
}

/// `limit`/`page` must be positive when present. Returns the effective
/// `usize` limit and the 1-indexed page (default 1).
fn validate_pagination(options: &QueryOptions) -> Result<(Option<usize>, usize)> {
    let limit = match options.limit {
        Some(limit) if limit <= 0 => {
            return Err(QueryError::InvalidPaginationParameter(format!(
                "limit must be a positive integer, got {limit}"
            )));
        }
        Some(limit) => Some(limit as usize),
        None => None,
    };
    let page = match options.page {
        Some(page) if page <= 0 => {
            return Err(QueryError::InvalidPaginationParameter(format!(
                "page must be a positive integer, got {page}"
            )));
        }
        Some(page) => page as usize,
        None => 1,
    };
    Ok((limit, page))
}

/// Free-text search: any string-valued field containing the query
/// case-insensitively retains the row.
fn row_contains_text(row: &Row, query: &str) -> bool {
    row.values()
        .filter_map(|value| value.as_str())
        .any(|text| contains_ci(text, query))
}
