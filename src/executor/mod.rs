//! Query execution over a materialized row snapshot.

mod query;
mod sort;

pub use query::{QueryExecutor, QueryOptions};
pub use sort::{RowComparator, SortKey, parse_order, sort_rows};
