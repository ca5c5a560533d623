//! Row driver: merges column generators into a row stream.

use crate::factory::generator_from_definition;
use crate::generator::{ColumnGenerator, GeneratorError};
use datagen_core::{ColumnSchema, GenerationDocument, Row, RowSink};
use std::path::Path;
use tracing::debug;

/// A sink rejected a row while the driver was writing.
#[derive(Debug, thiserror::Error)]
#[error("failed to write row {row}: {source}")]
pub struct DriveError<E: std::error::Error + 'static> {
    /// Zero-based index of the row that failed
    pub row: u64,
    #[source]
    pub source: E,
}

/// Pulls one value per column per row, in column order.
///
/// The first column that reports exhaustion ends the stream for good. Columns
/// before it in that row have already been pulled; their values are
/// discarded along with the partial row.
#[derive(Debug)]
pub struct RowDriver {
    generators: Vec<ColumnGenerator>,
    rows_emitted: u64,
    exhausted: bool,
}

impl RowDriver {
    pub fn new(generators: Vec<ColumnGenerator>) -> Result<Self, GeneratorError> {
        if generators.is_empty() {
            return Err(GeneratorError::NoColumns);
        }
        Ok(Self {
            generators,
            rows_emitted: 0,
            exhausted: false,
        })
    }

    /// Build one generator per document column, in document order.
    pub fn from_document(
        document: &GenerationDocument,
        base_dir: &Path,
    ) -> Result<Self, GeneratorError> {
        let generators = document
            .columns
            .iter()
            .map(|column| generator_from_definition(column, base_dir))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(generators)
    }

    /// Sink schema: one entry per column.
    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.generators.iter().map(ColumnGenerator::schema).collect()
    }

    pub fn generators(&self) -> &[ColumnGenerator] {
        &self.generators
    }

    /// Number of complete rows produced so far.
    pub fn rows_emitted(&self) -> u64 {
        self.rows_emitted
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Assemble the next row, or `None` once any column is exhausted.
    pub fn next_row(&mut self) -> Option<Row> {
        if self.exhausted {
            return None;
        }

        let mut row = Vec::with_capacity(self.generators.len());
        for generator in &mut self.generators {
            match generator.next_value() {
                Some(value) => row.push(value),
                None => {
                    debug!(
                        "Column {} exhausted after {} rows",
                        generator.name(),
                        self.rows_emitted
                    );
                    self.exhausted = true;
                    return None;
                }
            }
        }

        self.rows_emitted += 1;
        Some(row)
    }

    /// Write every remaining row to `sink`. Returns the number of rows
    /// written by this call. The sink is not closed.
    pub fn drive<S: RowSink>(&mut self, sink: &mut S) -> Result<u64, DriveError<S::Error>> {
        let mut written = 0u64;
        while let Some(row) = self.next_row() {
            let index = self.rows_emitted - 1;
            sink.write_row(&row)
                .map_err(|source| DriveError { row: index, source })?;
            written += 1;

            if written % 10000 == 0 {
                debug!("Written {} rows", written);
            }
        }
        Ok(written)
    }
}

impl Iterator for RowDriver {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorKind;
    use crate::generators::IdGenerator;
    use datagen_core::{ColumnType, Value};
    use serde_json::json;

    fn doc(columns: serde_json::Value) -> GenerationDocument {
        GenerationDocument::from_value(json!({
            "format": "CSV",
            "output_filename": "out.csv",
            "columns": columns
        }))
        .unwrap()
    }

    fn id_column(seed: &str) -> serde_json::Value {
        json!({ "generation_type": "id", "type": "INT64", "start_id": "0", "seed": seed })
    }

    fn next_id(driver: &RowDriver, column: usize) -> i64 {
        match driver.generators()[column].kind() {
            GeneratorKind::Id(g) => g.next_id(),
            other => panic!("expected id generator, got {}", other.name()),
        }
    }

    /// In-memory sink that can be told to fail on a given row.
    struct VecSink {
        schema: Vec<ColumnSchema>,
        rows: Vec<Row>,
        fail_at: Option<usize>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("sink refused the row")]
    struct Refused;

    impl RowSink for VecSink {
        type Error = Refused;

        fn schema(&self) -> &[ColumnSchema] {
            &self.schema
        }

        fn write_row(&mut self, row: &[Value]) -> Result<(), Self::Error> {
            if self.fail_at == Some(self.rows.len()) {
                return Err(Refused);
            }
            self.rows.push(row.to_vec());
            Ok(())
        }

        fn close(self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_short_column_bounds_stream() {
        let document = doc(json!({
            "A": id_column("1"),
            "B": {
                "generation_type": "list",
                "type": "INT64",
                "values": ["7", "8", "9", "10"],
                "count": "3",
                "seed": "2"
            },
            "C": id_column("3")
        }));
        let mut driver = RowDriver::from_document(&document, Path::new(".")).unwrap();
        let rows: Vec<Row> = driver.by_ref().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(driver.rows_emitted(), 3);
        assert_eq!(
            rows[2],
            vec![Value::Int64(2), Value::Int64(9), Value::Int64(2)]
        );

        // C is never reached on the terminating pull, so it advanced once per
        // emitted row. A precedes B and was pulled for the discarded row too.
        assert_eq!(next_id(&driver, 2), 3);
        assert_eq!(next_id(&driver, 0), 4);
        assert!(driver.is_exhausted());
        assert_eq!(driver.next_row(), None);
        assert_eq!(next_id(&driver, 0), 4);
    }

    #[test]
    fn test_schema_follows_document_order() {
        let document = doc(json!({
            "z": id_column("1"),
            "a": { "generation_type": "list", "type": "DOUBLE", "values": ["1.5"], "seed": "1" }
        }));
        let driver = RowDriver::from_document(&document, Path::new(".")).unwrap();
        assert_eq!(
            driver.schema(),
            vec![
                ColumnSchema::new("z", ColumnType::Int64),
                ColumnSchema::new("a", ColumnType::Double)
            ]
        );
    }

    #[test]
    fn test_drive_writes_all_rows() {
        let document = doc(json!({
            "n": {
                "generation_type": "full_range",
                "type": "INT32",
                "range_start": "1",
                "range_stop": "25000",
                "seed": "0"
            }
        }));
        let mut driver = RowDriver::from_document(&document, Path::new(".")).unwrap();
        let mut sink = VecSink {
            schema: driver.schema(),
            rows: Vec::new(),
            fail_at: None,
        };
        assert_eq!(driver.drive(&mut sink).unwrap(), 25000);
        assert_eq!(sink.rows.last(), Some(&vec![Value::Int32(25000)]));
        assert!(sink.close().is_ok());
    }

    #[test]
    fn test_drive_reports_failing_row() {
        let document = doc(json!({ "id": id_column("1") }));
        let mut driver = RowDriver::from_document(&document, Path::new(".")).unwrap();
        let mut sink = VecSink {
            schema: driver.schema(),
            rows: Vec::new(),
            fail_at: Some(4),
        };
        let err = driver.drive(&mut sink).unwrap_err();
        assert_eq!(err.row, 4);
        assert_eq!(sink.rows.len(), 4);
        assert!(err.to_string().contains("row 4"));
    }

    #[test]
    fn test_deterministic_rows() {
        let columns = json!({
            "price": {
                "generation_type": "random",
                "type": "DOUBLE",
                "distribution": "normal",
                "mean": "100",
                "stddev": "5",
                "percent_null": "10",
                "seed": "42"
            },
            "n": { "generation_type": "list", "type": "INT32", "values": ["1"], "count": "200", "seed": "1" }
        });
        let first: Vec<Row> = RowDriver::from_document(&doc(columns.clone()), Path::new("."))
            .unwrap()
            .collect();
        let second: Vec<Row> = RowDriver::from_document(&doc(columns), Path::new("."))
            .unwrap()
            .collect();
        assert_eq!(first.len(), 200);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_empty_driver() {
        assert!(matches!(
            RowDriver::new(Vec::new()),
            Err(GeneratorError::NoColumns)
        ));
    }

    #[test]
    fn test_new_from_generators() {
        let id = ColumnGenerator::new(
            "id",
            GeneratorKind::Id(
                IdGenerator::new(
                    "id",
                    ColumnType::String,
                    5,
                    crate::generators::Increment::Decreasing,
                    false,
                )
                .unwrap(),
            ),
            Default::default(),
        );
        let mut driver = RowDriver::new(vec![id]).unwrap();
        assert_eq!(driver.next_row(), Some(vec![Value::from("5")]));
        assert_eq!(driver.next_row(), Some(vec![Value::from("4")]));
    }
}
