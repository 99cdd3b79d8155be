//! Materialized result set

use super::ClientError;
use crate::value::Value;

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name (alias if one was given)
    pub name: String,
    /// Originating table, empty for computed columns
    pub table: String,
}

impl Field {
    /// Create field metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: String::new(),
        }
    }
}

/// Rows returned by a query, fully read into memory
#[derive(Debug, Clone, Default)]
pub struct Resultset {
    fields: Vec<Field>,
    rows: Vec<Vec<Value>>,
}

impl Resultset {
    /// Create a result set from column metadata and row values
    pub fn new(fields: Vec<Field>, rows: Vec<Vec<Value>>) -> Self {
        Self { fields, rows }
    }

    /// Column metadata
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    /// Read the cell at `(row, column)`
    pub fn get_value(&self, row: usize, column: usize) -> Result<Value, ClientError> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .cloned()
            .ok_or(ClientError::OutOfRange { row, column })
    }
}
