//! Result shapes crossing the API boundary.

use serde::Serialize;

use crate::core::{QueryError, Row};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    /// Total matches before the page slice was taken.
    pub total: usize,
}

/// Outcome of one query execution.
#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub results: Vec<Row>,
    /// Present only when the client asked for a count; always the
    /// pre-pagination total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiSuccess {
    pub success: bool,
    #[serde(flatten)]
    pub result: QueryResult,
}

#[derive(Debug, Serialize)]
pub struct ApiFailure {
    pub success: bool,
    pub error: String,
}

/// Wire envelope: `{"success": true, ...}` or `{"success": false, "error"}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Success(ApiSuccess),
    Failure(ApiFailure),
}

impl ApiResponse {
    pub fn success(result: QueryResult) -> Self {
        Self::Success(ApiSuccess {
            success: true,
            result,
        })
    }

    pub fn failure(error: &QueryError) -> Self {
        Self::Failure(ApiFailure {
            success: false,
            error: error.to_string(),
        })
    }

    /// Every taxonomy error is a client error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Failure(_) => 400,
        }
    }
}

impl From<crate::core::Result<QueryResult>> for ApiResponse {
    fn from(outcome: crate::core::Result<QueryResult>) -> Self {
        match outcome {
            Ok(result) => Self::success(result),
            Err(err) => Self::failure(&err),
        }
    }
}
