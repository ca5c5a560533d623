//! Core types for the datagen test data generator.
//!
//! This crate provides the foundational types shared by the generator
//! engine and the output sinks:
//!
//! - [`ColumnType`] - Declared output domain of a column
//! - [`Value`] - Typed value produced by a generator (or `Null`)
//! - [`GenerationDocument`] - Generation document loaded from JSON or YAML
//! - [`ConfigNode`] - Typed accessors over one column's JSON node
//! - [`RowSink`] - Contract implemented by the CSV and Parquet writers
//!
//! # Architecture
//!
//! ```text
//! datagen-core (this crate)
//!    │
//!    ├─── datagen-generator     (generators + row driver)
//!    │
//!    ├─── datagen-sink-csv      (implements RowSink for CSV)
//!    └─── datagen-sink-parquet  (implements RowSink for Parquet)
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_core::{ColumnType, Value};
//!
//! let value = ColumnType::Int32.parse_literal("42").unwrap();
//! assert_eq!(value, Value::Int32(42));
//! assert_eq!(value.to_text().as_deref(), Some("42"));
//! ```

pub mod error;
pub mod files;
pub mod node;
pub mod schema;
pub mod sink;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use error::{ConfigError, ResourceError};
pub use files::{locate_file, read_lines};
pub use node::ConfigNode;
pub use schema::{ColumnDefinition, ColumnSchema, GenerationDocument, OutputFormat, SchemaError};
pub use sink::{check_row, RowMismatch, RowSink};
pub use types::ColumnType;
pub use values::{Row, Value};
