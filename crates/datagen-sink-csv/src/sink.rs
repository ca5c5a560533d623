//! CSV sink.

use crate::error::CsvSinkError;
use csv::Writer;
use datagen_core::{check_row, ColumnSchema, RowSink, Value};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Writes rows to a CSV file with a header line.
pub struct CsvSink {
    schema: Vec<ColumnSchema>,
    writer: Writer<BufWriter<File>>,
    record: Vec<String>,
    rows_written: u64,
}

impl CsvSink {
    /// Create (or truncate) `path` and write the header line.
    pub fn create<P: AsRef<Path>>(path: P, schema: Vec<ColumnSchema>) -> Result<Self, CsvSinkError> {
        let path = path.as_ref();
        debug!(
            "Opening CSV sink '{}' with {} columns",
            path.display(),
            schema.len()
        );

        let file = File::create(path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = Writer::from_writer(buf_writer);
        writer.write_record(schema.iter().map(|c| c.name.as_str()))?;

        Ok(Self {
            record: Vec::with_capacity(schema.len()),
            schema,
            writer,
            rows_written: 0,
        })
    }

    /// Rows written so far, excluding the header.
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl RowSink for CsvSink {
    type Error = CsvSinkError;

    fn schema(&self) -> &[ColumnSchema] {
        &self.schema
    }

    fn write_row(&mut self, row: &[Value]) -> Result<(), Self::Error> {
        check_row(&self.schema, row)?;

        self.record.clear();
        self.record
            .extend(row.iter().map(|v| v.to_text().unwrap_or_default()));
        self.writer.write_record(&self.record)?;
        self.rows_written += 1;
        Ok(())
    }

    fn close(mut self) -> Result<(), Self::Error> {
        self.writer.flush()?;
        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| CsvSinkError::Io(std::io::Error::other(e.to_string())))?;
        let file = buf_writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        debug!("Closed CSV sink after {} rows", self.rows_written);
        Ok(())
    }
}
