//! Run-level configuration.

use crate::run::RunError;
use std::path::{Path, PathBuf};

/// Default number of rows per Parquet record batch.
pub const DEFAULT_BATCH_SIZE: usize = datagen_sink_parquet::DEFAULT_BATCH_SIZE;

/// Settings shared by every document generated in one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory joined onto relative output file names
    pub output_prefix: Option<PathBuf>,

    /// Delete and regenerate an existing output file
    pub overwrite: bool,

    /// Treat an existing output file as an error when not overwriting
    pub force_regeneration: bool,

    /// Rows per Parquet record batch
    pub batch_size: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_prefix: None,
            overwrite: true,
            force_regeneration: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl RunConfig {
    pub fn with_output_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.output_prefix = Some(prefix.into());
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_force_regeneration(mut self, force: bool) -> Self {
        self.force_regeneration = force;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Resolve a document's `output_filename`.
    ///
    /// `~` and `~/...` expand to the home directory. Absolute paths are kept;
    /// other relative paths are joined onto `output_prefix` when one is set.
    pub fn resolve_output_path(&self, filename: &str) -> Result<PathBuf, RunError> {
        let expanded = if filename == "~" || filename.starts_with("~/") {
            let home = dirs::home_dir().ok_or_else(|| RunError::NoHomeDirectory {
                filename: filename.to_string(),
            })?;
            match filename.strip_prefix("~/") {
                Some(rest) => home.join(rest),
                None => home,
            }
        } else {
            PathBuf::from(filename)
        };

        if expanded.is_absolute() {
            return Ok(expanded);
        }
        Ok(match &self.output_prefix {
            Some(prefix) => prefix.join(expanded),
            None => expanded,
        })
    }
}

/// Directory that relative `source_file` references resolve against.
pub(crate) fn document_base_dir(document_path: &Path) -> PathBuf {
    match document_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert!(config.overwrite);
        assert!(!config.force_regeneration);
        assert_eq!(config.batch_size, 8192);
        assert_eq!(config.output_prefix, None);
    }

    #[test]
    fn test_relative_path_uses_prefix() {
        let config = RunConfig::default().with_output_prefix("/data/out");
        assert_eq!(
            config.resolve_output_path("trades.csv").unwrap(),
            PathBuf::from("/data/out/trades.csv")
        );
        assert_eq!(
            RunConfig::default().resolve_output_path("trades.csv").unwrap(),
            PathBuf::from("trades.csv")
        );
    }

    #[test]
    fn test_absolute_path_ignores_prefix() {
        let config = RunConfig::default().with_output_prefix("/data/out");
        assert_eq!(
            config.resolve_output_path("/tmp/trades.csv").unwrap(),
            PathBuf::from("/tmp/trades.csv")
        );
    }

    #[test]
    fn test_home_expansion() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let config = RunConfig::default().with_output_prefix("/ignored");
        assert_eq!(
            config.resolve_output_path("~/gen/t.parquet").unwrap(),
            home.join("gen/t.parquet")
        );
        assert_eq!(config.resolve_output_path("~").unwrap(), home);
    }

    #[test]
    fn test_document_base_dir() {
        assert_eq!(document_base_dir(Path::new("doc.json")), PathBuf::from("."));
        assert_eq!(
            document_base_dir(Path::new("/specs/doc.json")),
            PathBuf::from("/specs")
        );
    }
}
