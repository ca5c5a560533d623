//! Error types for the Parquet sink.

use datagen_core::RowMismatch;
use thiserror::Error;

/// Errors that can occur while writing Parquet output.
#[derive(Error, Debug)]
pub enum ParquetSinkError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parquet encoding error.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow batch assembly error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Row does not fit the schema.
    #[error("Schema error: {0}")]
    Schema(#[from] RowMismatch),
}
