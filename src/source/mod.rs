//! The row-oriented external data source boundary.
//!
//! The real deployment reads and writes a spreadsheet; the core only needs a
//! full-materialization contract, so the seam is a small trait. Rows come
//! back as snapshots and are never written through by the query path.

use std::collections::HashMap;

use crate::core::{QueryError, Result, Row};

/// A table-addressed row store: full fetch, append, in-place update.
pub trait RowSource {
    fn fetch_rows(&self, table: &str) -> Result<Vec<Row>>;
    fn append_row(&mut self, table: &str, row: Row) -> Result<()>;
    fn update_row(&mut self, table: &str, index: usize, row: Row) -> Result<()>;
}

/// In-memory source used by tests and demos.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: HashMap<String, Vec<Row>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&mut self, table: impl Into<String>) {
        self.tables.entry(table.into()).or_default();
    }

    pub fn with_table(mut self, table: impl Into<String>, rows: Vec<Row>) -> Self {
        self.tables.insert(table.into(), rows);
        self
    }

    fn table(&self, table: &str) -> Result<&Vec<Row>> {
        self.tables
            .get(table)
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()))
    }

    fn table_mut(&mut self, table: &str) -> Result<&mut Vec<Row>> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| QueryError::TableNotFound(table.to_string()))
    }
}

impl RowSource for MemorySource {
    fn fetch_rows(&self, table: &str) -> Result<Vec<Row>> {
        Ok(self.table(table)?.clone())
    }

    fn append_row(&mut self, table: &str, row: Row) -> Result<()> {
        self.table_mut(table)?.push(row);
        Ok(())
    }

    fn update_row(&mut self, table: &str, index: usize, row: Row) -> Result<()> {
        let rows = self.table_mut(table)?;
        match rows.get_mut(index) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(QueryError::TableNotFound(format!(
                "{table}: no row at index {index}"
            ))),
        }
    }
}
