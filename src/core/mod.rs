pub mod error;
pub mod row;

pub use error::{QueryError, Result};
pub use row::{Row, compare_values, numeric_of, text_of, type_name};
