//! Parquet sink.

use crate::error::ParquetSinkError;
use arrow::array::{
    ArrayRef, Float64Builder, Int32Builder, Int64Builder, StringBuilder,
    TimestampNanosecondBuilder,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use datagen_core::{check_row, ColumnSchema, ColumnType, RowMismatch, RowSink, Value};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Rows buffered per record batch by default.
pub const DEFAULT_BATCH_SIZE: usize = 8192;

const UTC: &str = "UTC";

/// Arrow schema for a list of output columns. All fields are nullable.
pub fn arrow_schema(columns: &[ColumnSchema]) -> Schema {
    let fields: Vec<Field> = columns
        .iter()
        .map(|c| Field::new(c.name.as_str(), arrow_type(c.column_type), true))
        .collect();
    Schema::new(fields)
}

fn arrow_type(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Int32 => DataType::Int32,
        ColumnType::Int64 => DataType::Int64,
        ColumnType::Double => DataType::Float64,
        ColumnType::String => DataType::Utf8,
        ColumnType::TimestampNanos => DataType::Timestamp(TimeUnit::Nanosecond, Some(UTC.into())),
    }
}

/// Per-column buffer, dispatched on the declared column type.
enum ColumnBuilder {
    Int32(Int32Builder),
    Int64(Int64Builder),
    Double(Float64Builder),
    String(StringBuilder),
    Timestamp(TimestampNanosecondBuilder),
}

impl ColumnBuilder {
    fn new(column_type: ColumnType, capacity: usize) -> Self {
        match column_type {
            ColumnType::Int32 => Self::Int32(Int32Builder::with_capacity(capacity)),
            ColumnType::Int64 => Self::Int64(Int64Builder::with_capacity(capacity)),
            ColumnType::Double => Self::Double(Float64Builder::with_capacity(capacity)),
            ColumnType::String => Self::String(StringBuilder::new()),
            ColumnType::TimestampNanos => Self::Timestamp(
                TimestampNanosecondBuilder::with_capacity(capacity).with_timezone(UTC),
            ),
        }
    }

    fn append(&mut self, column: &ColumnSchema, value: &Value) -> Result<(), RowMismatch> {
        match (self, value) {
            (Self::Int32(b), Value::Null) => b.append_null(),
            (Self::Int64(b), Value::Null) => b.append_null(),
            (Self::Double(b), Value::Null) => b.append_null(),
            (Self::String(b), Value::Null) => b.append_null(),
            (Self::Timestamp(b), Value::Null) => b.append_null(),
            (Self::Int32(b), Value::Int32(v)) => b.append_value(*v),
            (Self::Int64(b), Value::Int64(v)) => b.append_value(*v),
            (Self::Double(b), Value::Double(v)) => b.append_value(*v),
            (Self::String(b), Value::String(v)) => b.append_value(v),
            (Self::Timestamp(b), Value::TimestampNanos(v)) => b.append_value(*v),
            (_, other) => {
                return Err(RowMismatch::Type {
                    column: column.name.clone(),
                    expected: column.column_type,
                    value: other.clone(),
                })
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            Self::Int32(b) => Arc::new(b.finish()),
            Self::Int64(b) => Arc::new(b.finish()),
            Self::Double(b) => Arc::new(b.finish()),
            Self::String(b) => Arc::new(b.finish()),
            Self::Timestamp(b) => Arc::new(b.finish()),
        }
    }
}

/// Writes rows to a ZSTD-compressed Parquet file.
///
/// Rows accumulate in column builders and are written as one record batch
/// every `batch_size` rows, and once more on [`close`](RowSink::close).
pub struct ParquetSink {
    schema: Vec<ColumnSchema>,
    arrow_schema: SchemaRef,
    builders: Vec<ColumnBuilder>,
    writer: ArrowWriter<File>,
    batch_size: usize,
    buffered: usize,
    rows_written: u64,
}

impl ParquetSink {
    /// Create (or truncate) `path` with the default batch size.
    pub fn create<P: AsRef<Path>>(
        path: P,
        schema: Vec<ColumnSchema>,
    ) -> Result<Self, ParquetSinkError> {
        Self::with_batch_size(path, schema, DEFAULT_BATCH_SIZE)
    }

    /// Create (or truncate) `path`, flushing every `batch_size` rows.
    pub fn with_batch_size<P: AsRef<Path>>(
        path: P,
        schema: Vec<ColumnSchema>,
        batch_size: usize,
    ) -> Result<Self, ParquetSinkError> {
        let path = path.as_ref();
        let batch_size = batch_size.max(1);
        debug!(
            "Opening Parquet sink '{}' with {} columns, batch size {}",
            path.display(),
            schema.len(),
            batch_size
        );

        let arrow_schema: SchemaRef = Arc::new(arrow_schema(&schema));
        let file = File::create(path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(Default::default()))
            .build();

        let writer = ArrowWriter::try_new(file, arrow_schema.clone(), Some(props))?;

        let builders = schema
            .iter()
            .map(|c| ColumnBuilder::new(c.column_type, batch_size))
            .collect();

        Ok(Self {
            schema,
            arrow_schema,
            builders,
            writer,
            batch_size,
            buffered: 0,
            rows_written: 0,
        })
    }

    /// Rows accepted so far, including those still buffered.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    fn flush_batch(&mut self) -> Result<(), ParquetSinkError> {
        if self.buffered == 0 {
            return Ok(());
        }
        let columns: Vec<ArrayRef> = self.builders.iter_mut().map(ColumnBuilder::finish).collect();
        let batch = RecordBatch::try_new(self.arrow_schema.clone(), columns)?;
        self.writer.write(&batch)?;
        debug!("Flushed batch of {} rows", self.buffered);
        self.buffered = 0;
        Ok(())
    }
}

impl RowSink for ParquetSink {
    type Error = ParquetSinkError;

    fn schema(&self) -> &[ColumnSchema] {
        &self.schema
    }

    fn write_row(&mut self, row: &[Value]) -> Result<(), Self::Error> {
        // Validate first so a bad row never leaves the builders uneven.
        check_row(&self.schema, row)?;

        for ((builder, column), value) in self.builders.iter_mut().zip(&self.schema).zip(row) {
            builder.append(column, value)?;
        }
        self.buffered += 1;
        self.rows_written += 1;

        if self.buffered >= self.batch_size {
            self.flush_batch()?;
        }
        Ok(())
    }

    fn close(mut self) -> Result<(), Self::Error> {
        self.flush_batch()?;
        self.writer.close()?;
        debug!("Closed Parquet sink after {} rows", self.rows_written);
        Ok(())
    }
}
