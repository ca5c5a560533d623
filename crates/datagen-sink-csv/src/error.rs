//! Error types for the CSV sink.

use datagen_core::RowMismatch;
use thiserror::Error;

/// Errors that can occur while writing CSV output.
#[derive(Error, Debug)]
pub enum CsvSinkError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Row does not fit the schema.
    #[error("Schema error: {0}")]
    Schema(#[from] RowMismatch),
}
