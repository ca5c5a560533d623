//! Generation runs: document in, one output file out.

use crate::config::{document_base_dir, RunConfig};
use datagen_core::{ColumnSchema, GenerationDocument, OutputFormat, RowSink, SchemaError};
use datagen_generator::{GeneratorError, RowDriver};
use datagen_sink_csv::CsvSink;
use datagen_sink_parquet::ParquetSink;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during a generation run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The generation document could not be loaded.
    #[error("Failed to load generation document {}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    /// A column generator could not be built.
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// The output exists and neither overwriting nor skipping is allowed.
    #[error("Output file {} already exists and overwrite is disabled", path.display())]
    OutputExists { path: PathBuf },

    /// `~` could not be expanded.
    #[error("Cannot expand \"{filename}\": no home directory")]
    NoHomeDirectory { filename: String },

    /// Filesystem error outside the sink.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output sink could not be opened or finalized.
    #[error("Failed to write {}: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Writing failed mid-stream. The partial output has been deleted.
    #[error("Generation failed at row {row}: {source}")]
    Generation {
        row: u64,
        #[source]
        source: BoxError,
    },
}

/// Metrics from a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

impl GenerateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Result of a run that did not fail.
#[derive(Debug, Clone)]
pub enum GenerateOutcome {
    /// Output written to `path`.
    Written {
        path: PathBuf,
        metrics: GenerateMetrics,
    },

    /// Output already existed and overwriting was disabled.
    Skipped { path: PathBuf },
}

/// Load a generation document from disk.
pub fn load_document(path: &Path) -> Result<GenerationDocument, RunError> {
    GenerationDocument::from_file(path).map_err(|source| RunError::Document {
        path: path.to_path_buf(),
        source,
    })
}

/// Generate the output described by the document at `path`.
///
/// Relative `source_file` references resolve against the document's
/// directory.
pub fn generate_file(path: &Path, config: &RunConfig) -> Result<GenerateOutcome, RunError> {
    let document = load_document(path)?;
    info!(
        "Loaded generation document '{}' ({} columns)",
        path.display(),
        document.columns.len()
    );
    generate_document(&document, &document_base_dir(path), config)
}

/// Parse a document and build all of its generators without writing output.
///
/// Returns the output schema.
pub fn validate_file(path: &Path) -> Result<Vec<ColumnSchema>, RunError> {
    let document = load_document(path)?;
    let driver = RowDriver::from_document(&document, &document_base_dir(path))?;
    Ok(driver.schema())
}

/// Generate the output for an already-loaded document.
pub fn generate_document(
    document: &GenerationDocument,
    base_dir: &Path,
    config: &RunConfig,
) -> Result<GenerateOutcome, RunError> {
    let start_time = Instant::now();
    let output_path = config.resolve_output_path(&document.output_filename)?;

    if output_path.exists() && !config.overwrite {
        if config.force_regeneration {
            return Err(RunError::OutputExists { path: output_path });
        }
        info!(
            "Output '{}' already exists, skipping",
            output_path.display()
        );
        return Ok(GenerateOutcome::Skipped { path: output_path });
    }

    // Build every generator before touching the output.
    let mut driver = RowDriver::from_document(document, base_dir)?;

    if output_path.exists() {
        info!("Removing existing output '{}'", output_path.display());
        fs::remove_file(&output_path).map_err(|source| RunError::Io {
            path: output_path.clone(),
            source,
        })?;
    }
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RunError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    info!(
        "Generating {} file '{}'",
        document.format,
        output_path.display()
    );

    let schema = driver.schema();
    let rows_written = match document.format {
        OutputFormat::Csv => write_output(&output_path, &mut driver, |path| {
            CsvSink::create(path, schema)
        })?,
        OutputFormat::Parquet => write_output(&output_path, &mut driver, |path| {
            ParquetSink::with_batch_size(path, schema, config.batch_size)
        })?,
    };

    let file_size_bytes = fs::metadata(&output_path)
        .map_err(|source| RunError::Io {
            path: output_path.clone(),
            source,
        })?
        .len();

    let metrics = GenerateMetrics {
        rows_written,
        total_duration: start_time.elapsed(),
        file_size_bytes,
    };

    info!(
        "Generation complete: {} rows, {} bytes in {:?} ({:.2} rows/sec)",
        metrics.rows_written,
        metrics.file_size_bytes,
        metrics.total_duration,
        metrics.rows_per_second()
    );

    Ok(GenerateOutcome::Written {
        path: output_path,
        metrics,
    })
}

/// Open a sink on `path`, drive every row into it and close it. On any
/// failure the partial file is removed.
fn write_output<S, F>(path: &Path, driver: &mut RowDriver, open: F) -> Result<u64, RunError>
where
    S: RowSink,
    F: FnOnce(&Path) -> Result<S, S::Error>,
{
    let result = open(path)
        .map_err(|e| RunError::Sink {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
        .and_then(|mut sink| {
            let rows = driver.drive(&mut sink).map_err(|e| RunError::Generation {
                row: e.row,
                source: Box::new(e.source),
            })?;
            sink.close().map_err(|e| RunError::Sink {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
            Ok(rows)
        });

    if result.is_err() {
        remove_partial_output(path);
    }
    result
}

fn remove_partial_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed partial output '{}'", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Failed to remove partial output '{}': {}",
            path.display(),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagen_core::{ColumnType, Value};
    use serde_json::json;
    use tempfile::TempDir;

    fn id_document(output: &str, format: &str) -> GenerationDocument {
        GenerationDocument::from_value(json!({
            "format": format,
            "output_filename": output,
            "columns": {
                "id": { "generation_type": "id", "type": "INT64", "start_id": "1", "seed": "1" },
                "n": { "generation_type": "full_range", "type": "INT32",
                       "range_start": "1", "range_stop": "10", "seed": "1" }
            }
        }))
        .unwrap()
    }

    /// Creates its file, then refuses the row at `fail_at`.
    struct FailingSink {
        schema: Vec<ColumnSchema>,
        written: usize,
        fail_at: usize,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    impl RowSink for FailingSink {
        type Error = DiskFull;

        fn schema(&self) -> &[ColumnSchema] {
            &self.schema
        }

        fn write_row(&mut self, _row: &[Value]) -> Result<(), Self::Error> {
            if self.written == self.fail_at {
                return Err(DiskFull);
            }
            self.written += 1;
            Ok(())
        }

        fn close(self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_removes_partial_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.csv");
        let document = id_document("partial.csv", "CSV");
        let mut driver = RowDriver::from_document(&document, dir.path()).unwrap();

        let err = write_output(&path, &mut driver, |p| {
            fs::write(p, "partial").unwrap();
            Ok(FailingSink {
                schema: vec![ColumnSchema::new("id", ColumnType::Int64)],
                written: 0,
                fail_at: 3,
            })
        })
        .unwrap_err();

        assert!(matches!(err, RunError::Generation { row: 3, .. }));
        assert!(err.to_string().contains("disk full"));
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_csv_with_prefix() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig::default().with_output_prefix(dir.path().join("nested"));

        let outcome =
            generate_document(&id_document("ids.csv", "CSV"), dir.path(), &config).unwrap();
        let GenerateOutcome::Written { path, metrics } = outcome else {
            panic!("expected output to be written");
        };
        assert_eq!(path, dir.path().join("nested/ids.csv"));
        assert_eq!(metrics.rows_written, 10);
        assert_eq!(metrics.file_size_bytes, fs::metadata(&path).unwrap().len());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,n\n1,1\n2,2\n"));
        assert_eq!(content.lines().count(), 11);
    }

    #[test]
    fn test_existing_output_policies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ids.csv");
        fs::write(&path, "stale").unwrap();
        let document = id_document("ids.csv", "CSV");
        let base = RunConfig::default().with_output_prefix(dir.path());

        // Neither overwrite nor force: skipped, file untouched.
        let config = base.clone().with_overwrite(false);
        assert!(matches!(
            generate_document(&document, dir.path(), &config).unwrap(),
            GenerateOutcome::Skipped { .. }
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "stale");

        // Force without overwrite: error, file untouched.
        let config = base.clone().with_overwrite(false).with_force_regeneration(true);
        assert!(matches!(
            generate_document(&document, dir.path(), &config),
            Err(RunError::OutputExists { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "stale");

        // Overwrite: regenerated.
        assert!(matches!(
            generate_document(&document, dir.path(), &base).unwrap(),
            GenerateOutcome::Written { .. }
        ));
        assert!(fs::read_to_string(&path).unwrap().starts_with("id,n\n"));
    }

    #[test]
    fn test_config_error_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let document = GenerationDocument::from_value(json!({
            "output_filename": "bad.csv",
            "columns": {
                "x": { "generation_type": "full_range", "type": "INT64",
                       "range_start": "9", "range_stop": "1", "seed": "0" }
            }
        }))
        .unwrap();
        let config = RunConfig::default().with_output_prefix(dir.path());

        let err = generate_document(&document, dir.path(), &config).unwrap_err();
        assert!(matches!(err, RunError::Generator(_)));
        assert!(!dir.path().join("bad.csv").exists());
    }

    #[test]
    fn test_metrics_rows_per_second() {
        let metrics = GenerateMetrics {
            rows_written: 1000,
            total_duration: Duration::from_secs(2),
            file_size_bytes: 0,
        };
        assert_eq!(metrics.rows_per_second(), 500.0);
        assert_eq!(GenerateMetrics::default().rows_per_second(), 0.0);
    }
}
