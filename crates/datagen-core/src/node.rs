//! Typed accessors over a column's JSON definition.
//!
//! Generation documents carry numbers as decimal strings (`"seed": "42"`),
//! but plain JSON numbers and booleans are accepted as well. Every getter
//! comes in a required and an optional flavour; parse failures are fatal
//! [`ConfigError`]s naming the column and the key.

use crate::error::ConfigError;
use crate::types::ColumnType;
use serde_json::{Map, Value as JsonValue};
use std::str::FromStr;

/// Read-only view of one column node.
#[derive(Debug, Clone, Copy)]
pub struct ConfigNode<'a> {
    column: &'a str,
    map: &'a Map<String, JsonValue>,
}

impl<'a> ConfigNode<'a> {
    /// Wrap a column node. The node must be a JSON object.
    pub fn new(column: &'a str, node: &'a JsonValue) -> Result<Self, ConfigError> {
        match node {
            JsonValue::Object(map) => Ok(Self { column, map }),
            _ => Err(ConfigError::NotAnObject {
                column: column.to_string(),
            }),
        }
    }

    /// Name of the column this node defines.
    pub fn column(&self) -> &'a str {
        self.column
    }

    /// Whether the key is present (and not JSON `null`).
    pub fn contains(&self, key: &str) -> bool {
        !matches!(self.map.get(key), None | Some(JsonValue::Null))
    }

    /// Raw JSON value for a key.
    pub fn raw(&self, key: &str) -> Option<&'a JsonValue> {
        match self.map.get(key) {
            None | Some(JsonValue::Null) => None,
            Some(v) => Some(v),
        }
    }

    /// Scalar text of a key, if present.
    pub fn optional_str(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.raw(key) {
            None => Ok(None),
            Some(v) => scalar_text(v)
                .map(Some)
                .ok_or_else(|| self.malformed(key, "a scalar", v)),
        }
    }

    /// Scalar text of a required key.
    pub fn required_str(&self, key: &str) -> Result<String, ConfigError> {
        self.optional_str(key)?
            .ok_or_else(|| self.missing(key))
    }

    /// Parse an optional key.
    pub fn optional<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<T>, ConfigError> {
        match self.optional_str(key)? {
            None => Ok(None),
            Some(text) => text
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| self.malformed_text(key, expected, text)),
        }
    }

    /// Parse a required key.
    pub fn required<T: FromStr>(&self, key: &str, expected: &'static str) -> Result<T, ConfigError> {
        self.optional(key, expected)?
            .ok_or_else(|| self.missing(key))
    }

    /// Required 64-bit integer.
    pub fn required_i64(&self, key: &str) -> Result<i64, ConfigError> {
        self.required(key, "an integer")
    }

    /// Required 32-bit integer.
    pub fn required_i32(&self, key: &str) -> Result<i32, ConfigError> {
        self.required(key, "a 32-bit integer")
    }

    /// Required float.
    pub fn required_f64(&self, key: &str) -> Result<f64, ConfigError> {
        self.required(key, "a number")
    }

    /// Optional non-negative count.
    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        self.optional(key, "a non-negative integer")
    }

    /// Optional boolean with a default.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.optional_str(key)? {
            None => Ok(default),
            Some(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(self.malformed_text(key, "a boolean", text)),
            },
        }
    }

    /// Scalar text of every element of an array key.
    pub fn optional_str_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        match self.raw(key) {
            None => Ok(None),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| self.malformed(key, "a list of scalars", item))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(self.malformed(key, "a list", other)),
        }
    }

    /// Required array key, as scalar texts.
    pub fn required_str_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        self.optional_str_list(key)?
            .ok_or_else(|| self.missing(key))
    }

    /// Optional array key, each element parsed.
    pub fn optional_list<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<Vec<T>>, ConfigError> {
        match self.optional_str_list(key)? {
            None => Ok(None),
            Some(items) => items
                .into_iter()
                .map(|text| {
                    text.trim()
                        .parse::<T>()
                        .map_err(|_| self.malformed_text(key, expected, text))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
        }
    }

    /// The column's declared type. A missing `type` defaults to `String`.
    pub fn column_type(&self) -> Result<ColumnType, ConfigError> {
        match self.optional_str("type")? {
            None => {
                tracing::warn!(
                    "{}: no column type specified; defaulting to {}",
                    self.column,
                    ColumnType::String
                );
                Ok(ColumnType::String)
            }
            Some(text) => text
                .parse()
                .map_err(|_| self.malformed_text("type", "a column type", text)),
        }
    }

    /// Required `seed`.
    pub fn seed(&self) -> Result<u64, ConfigError> {
        // Negative seeds are accepted and reinterpreted bit-for-bit.
        let text = self.required_str("seed")?;
        let trimmed = text.trim();
        trimmed
            .parse::<u64>()
            .or_else(|_| trimmed.parse::<i64>().map(|s| s as u64))
            .map_err(|_| self.malformed_text("seed", "an integer", text))
    }

    /// Optional `percent_null` in `[0, 100]`; defaults to 0.
    pub fn percent_null(&self) -> Result<f64, ConfigError> {
        match self.optional::<f64>("percent_null", "a number")? {
            None => {
                tracing::debug!("{}: defaulting to no null values", self.column);
                Ok(0.0)
            }
            Some(pct) if (0.0..=100.0).contains(&pct) => Ok(pct),
            Some(pct) => Err(ConfigError::invalid(
                self.column,
                format!("percent_null must be between 0 and 100 inclusive; read {pct}"),
            )),
        }
    }

    fn missing(&self, key: &str) -> ConfigError {
        ConfigError::MissingField {
            column: self.column.to_string(),
            key: key.to_string(),
        }
    }

    fn malformed(&self, key: &str, expected: &'static str, value: &JsonValue) -> ConfigError {
        self.malformed_text(key, expected, value.to_string())
    }

    fn malformed_text(&self, key: &str, expected: &'static str, value: String) -> ConfigError {
        ConfigError::Malformed {
            column: self.column.to_string(),
            key: key.to_string(),
            expected,
            value,
        }
    }
}

fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
