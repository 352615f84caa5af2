//! Safe JSON handling shared by the query and schema paths: defensive object
//! parsing, structural deep equality, and column-schema comparison.

mod deep_equal;
mod safe_parse;
mod schema;

pub use deep_equal::deep_equals;
pub use safe_parse::{is_valid_object_json, parse_object_or_null};
pub use schema::{FieldSchema, schema_rows_equal};
