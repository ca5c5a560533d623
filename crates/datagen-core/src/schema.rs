//! Generation documents and output schemas.
//!
//! A generation document names an output file and format and describes one
//! generator per column:
//!
//! ```json
//! {
//!   "format": "CSV",
//!   "output_filename": "trades.csv",
//!   "columns": {
//!     "id":    { "generation_type": "id", "type": "INT64", "start_id": "1", "seed": "1" },
//!     "price": { "generation_type": "random", "type": "DOUBLE", "distribution": "normal",
//!                "mean": "100", "stddev": "5", "seed": "2" }
//!   }
//! }
//! ```
//!
//! `columns` may also be an array of column nodes carrying a `name` key.
//! Column order always follows the document.

use crate::types::ColumnType;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for document loading.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading the document
    #[error("Failed to read generation document: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Structurally invalid document
    #[error("Invalid generation document: {0}")]
    Invalid(String),
}

// ============================================================================
// Output
// ============================================================================

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    /// Comma-separated text with a header row
    #[default]
    Csv,

    /// Parquet, all fields optional
    Parquet,
}

impl FromStr for OutputFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CSV" => Ok(Self::Csv),
            "PARQUET" => Ok(Self::Parquet),
            _ => Err(SchemaError::Invalid(format!(
                "unrecognized output format \"{s}\""
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("CSV"),
            Self::Parquet => f.write_str("PARQUET"),
        }
    }
}

/// Output column: name and type, as seen by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSchema {
    /// Create a new column schema.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// One column of a generation document: its name and raw generator node.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,

    /// Generator definition, interpreted by the generator factory
    pub node: JsonValue,
}

/// A parsed generation document.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDocument {
    /// Output format
    pub format: OutputFormat,

    /// Output file name as written in the document (unresolved)
    pub output_filename: String,

    /// Column definitions, in document order
    pub columns: Vec<ColumnDefinition>,
}

impl GenerationDocument {
    /// Load a document from a file. `.yaml`/`.yml` files are parsed as YAML,
    /// everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Build a document from an already-parsed node tree.
    pub fn from_value(value: JsonValue) -> Result<Self, SchemaError> {
        let JsonValue::Object(mut root) = value else {
            return Err(SchemaError::Invalid(
                "top level must be an object".to_string(),
            ));
        };

        let format = match root.get("format") {
            None | Some(JsonValue::Null) => {
                tracing::warn!("no format found, defaulting to {}", OutputFormat::Csv);
                OutputFormat::Csv
            }
            Some(JsonValue::String(s)) => s.parse()?,
            Some(other) => {
                return Err(SchemaError::Invalid(format!(
                    "format must be a string; read {other}"
                )))
            }
        };

        let output_filename = match root.get("output_filename") {
            Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                return Err(SchemaError::Invalid(
                    "no output_filename provided".to_string(),
                ))
            }
        };

        let columns = match root.remove("columns") {
            Some(JsonValue::Object(map)) => map
                .into_iter()
                .map(|(name, node)| ColumnDefinition { name, node })
                .collect(),
            Some(JsonValue::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(idx, node)| {
                    let name = node
                        .get("name")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| {
                            SchemaError::Invalid(format!("column #{idx} has no \"name\""))
                        })?;
                    Ok(ColumnDefinition { name, node })
                })
                .collect::<Result<Vec<_>, SchemaError>>()?,
            _ => {
                return Err(SchemaError::Invalid(
                    "\"columns\" must be an object or an array".to_string(),
                ))
            }
        };

        let doc = Self {
            format,
            output_filename,
            columns,
        };
        doc.validate()?;
        Ok(doc)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::Invalid("no columns defined".to_string()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::Invalid(format!(
                    "duplicate column \"{}\"",
                    column.name
                )));
            }
        }
        Ok(())
    }

    /// Get a column definition by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all column names, in document order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = r#"{
        "format": "parquet",
        "output_filename": "out.parquet",
        "columns": {
            "zeta":  { "generation_type": "id", "type": "INT64", "start_id": "1", "seed": "1" },
            "alpha": { "generation_type": "list", "type": "STRING", "values": ["a"], "seed": "2" }
        }
    }"#;

    #[test]
    fn test_parse_json_preserves_column_order() {
        let doc = GenerationDocument::from_json(DOC).unwrap();
        assert_eq!(doc.format, OutputFormat::Parquet);
        assert_eq!(doc.output_filename, "out.parquet");
        assert_eq!(doc.column_names(), vec!["zeta", "alpha"]);
        assert!(doc.get_column("alpha").is_some());
        assert!(doc.get_column("beta").is_none());
    }

    #[test]
    fn test_parse_array_columns() {
        let doc = GenerationDocument::from_json(
            r#"{"output_filename": "x.csv",
                "columns": [{"name": "b", "generation_type": "id"}, {"name": "a"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.format, OutputFormat::Csv);
        assert_eq!(doc.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
format: CSV
output_filename: out.csv
columns:
  b:
    generation_type: id
    start_id: 1
    seed: 3
  a:
    generation_type: id
    start_id: 5
    seed: 4
"#;
        let doc = GenerationDocument::from_yaml(yaml).unwrap();
        assert_eq!(doc.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("doc.json");
        fs::write(&json_path, DOC).unwrap();
        assert_eq!(
            GenerationDocument::from_file(&json_path).unwrap().columns.len(),
            2
        );

        let yaml_path = dir.path().join("doc.yml");
        fs::write(
            &yaml_path,
            "output_filename: y.csv\ncolumns:\n  c:\n    generation_type: id\n",
        )
        .unwrap();
        assert_eq!(
            GenerationDocument::from_file(&yaml_path).unwrap().columns.len(),
            1
        );
    }

    #[test]
    fn test_missing_output_filename() {
        let err = GenerationDocument::from_json(r#"{"columns": {"a": {}}}"#).unwrap_err();
        assert!(err.to_string().contains("output_filename"));
    }

    #[test]
    fn test_unknown_format() {
        let err = GenerationDocument::from_json(
            r#"{"format": "ORC", "output_filename": "x", "columns": {"a": {}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ORC"));
    }

    #[test]
    fn test_empty_and_duplicate_columns() {
        assert!(
            GenerationDocument::from_json(r#"{"output_filename": "x", "columns": {}}"#).is_err()
        );
        assert!(GenerationDocument::from_json(
            r#"{"output_filename": "x", "columns": [{"name": "a"}, {"name": "a"}]}"#
        )
        .is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(
            "Parquet".parse::<OutputFormat>().unwrap(),
            OutputFormat::Parquet
        );
        assert_eq!(OutputFormat::Parquet.to_string(), "PARQUET");
    }
}
