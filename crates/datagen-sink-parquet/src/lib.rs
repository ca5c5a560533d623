//! Parquet row sink for datagen.
//!
//! Rows are buffered column-wise in arrow builders and flushed as record
//! batches through [`parquet::arrow::ArrowWriter`] with ZSTD compression.
//! Every field is nullable; a null value is simply absent from its column.
//!
//! | ColumnType | Arrow type |
//! |---|---|
//! | `Int32` | `Int32` |
//! | `Int64` | `Int64` |
//! | `Double` | `Float64` |
//! | `String` | `Utf8` |
//! | `TimestampNanos` | `Timestamp(Nanosecond, "UTC")` |

mod error;
mod sink;

pub use error::ParquetSinkError;
pub use sink::{arrow_schema, ParquetSink, DEFAULT_BATCH_SIZE};
