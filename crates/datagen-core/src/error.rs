//! Error taxonomy shared by document parsing and generator construction.
//!
//! Both kinds are fatal and raised before the first row is produced.

use std::path::PathBuf;

/// A missing, malformed or incompatible configuration field.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required key is absent from the column node.
    #[error("{column}: missing required field \"{key}\"")]
    MissingField { column: String, key: String },

    /// A key is present but its value cannot be parsed.
    #[error("{column}: field \"{key}\" must be {expected}; read \"{value}\"")]
    Malformed {
        column: String,
        key: String,
        expected: &'static str,
        value: String,
    },

    /// A column node is not a JSON object.
    #[error("{column}: column definition must be an object")]
    NotAnObject { column: String },

    /// The declared column type cannot be produced by the requested generator.
    #[error("{column}: column type {column_type} is not supported for {generator}")]
    UnsupportedType {
        column: String,
        column_type: crate::ColumnType,
        generator: String,
    },

    /// Unrecognised `generation_type`.
    #[error("{column}: unexpected generation_type \"{generation_type}\"")]
    UnknownGenerationType {
        column: String,
        generation_type: String,
    },

    /// Any other constraint violation (bounds, list lengths, ...).
    #[error("{column}: {message}")]
    Invalid { column: String, message: String },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub fn invalid(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            column: column.into(),
            message: message.into(),
        }
    }
}

/// A referenced source file could not be found or read.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Not present at the given location, nor relative to the base directory or its parent.
    #[error("couldn't find file \"{name}\" in \"{}\" or its parent", dir.display())]
    NotFound { name: String, dir: PathBuf },

    /// Found but unreadable.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
