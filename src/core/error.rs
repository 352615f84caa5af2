use thiserror::Error;

/// Errors produced by the query/schema core.
///
/// Every variant is a client-facing 400-class failure; the display strings
/// are the messages the API layer returns verbatim.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid WHERE format: {0}")]
    InvalidWhereFormat(String),

    #[error("Invalid WHERE clause: invalid operator '{0}'")]
    UnsupportedOperator(String),

    #[error("Invalid WHERE clause: operand for '{operator}' expected {expected}")]
    InvalidOperandType {
        operator: String,
        expected: &'static str,
    },

    #[error("Invalid WHERE clause: invalid regex: {0}")]
    InvalidRegex(String),

    #[error("Invalid pagination parameter: {0}")]
    InvalidPaginationParameter(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
