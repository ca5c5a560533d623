//! CSV row sink for datagen.
//!
//! Writes a header line of column names followed by one line per row.
//! Null values are written as empty fields.
//!
//! # Example
//!
//! ```ignore
//! use datagen_core::{ColumnSchema, ColumnType, RowSink, Value};
//! use datagen_sink_csv::CsvSink;
//!
//! let schema = vec![ColumnSchema::new("id", ColumnType::Int64)];
//! let mut sink = CsvSink::create("/tmp/ids.csv", schema)?;
//! sink.write_row(&[Value::Int64(1)])?;
//! sink.close()?;
//! ```

mod error;
mod sink;

pub use error::CsvSinkError;
pub use sink::{CsvSink, DEFAULT_BUFFER_SIZE};
