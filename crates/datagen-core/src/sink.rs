//! Row sink contract shared by the output writers.
//!
//! A sink owns its output file and a fixed column schema. The row driver
//! pushes complete rows in schema order and closes the sink exactly once
//! at the end of a successful run:
//!
//! ```ignore
//! for row in driver.by_ref() {
//!     sink.write_row(&row)?;
//! }
//! sink.close()?;
//! ```
//!
//! A sink that is dropped without `close` leaves an incomplete file behind;
//! callers delete it.

use crate::schema::ColumnSchema;
use crate::types::ColumnType;
use crate::values::Value;

/// A typed, schema-bound consumer of generated rows.
pub trait RowSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Columns this sink was opened with.
    fn schema(&self) -> &[ColumnSchema];

    /// Write one row. `row` has one value per schema column, each matching
    /// its column type or `Null`.
    fn write_row(&mut self, row: &[Value]) -> Result<(), Self::Error>;

    /// Flush buffered rows and finalize the output.
    fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized;
}

/// A row that does not fit a sink's schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowMismatch {
    #[error("row has {actual} values but the schema has {expected} columns")]
    Width { expected: usize, actual: usize },

    #[error("column \"{column}\" expects {expected}, got {value:?}")]
    Type {
        column: String,
        expected: ColumnType,
        value: Value,
    },
}

/// Check that `row` has one value per column and each value matches its
/// column type or is `Null`.
pub fn check_row(schema: &[ColumnSchema], row: &[Value]) -> Result<(), RowMismatch> {
    if schema.len() != row.len() {
        return Err(RowMismatch::Width {
            expected: schema.len(),
            actual: row.len(),
        });
    }
    for (column, value) in schema.iter().zip(row) {
        if !value.matches(column.column_type) {
            return Err(RowMismatch::Type {
                column: column.name.clone(),
                expected: column.column_type,
                value: value.clone(),
            });
        }
    }
    Ok(())
}
