//! Column types understood by the generator engine and the sinks.
//!
//! `ColumnType` is a closed set: it determines both the native output domain
//! of a generator and the serialization branch taken by a sink.

use crate::values::Value;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declared output domain of one column.
///
/// # Document Format
///
/// Column types are written as strings, case-insensitively:
/// ```json
/// "type": "INT32"
/// "type": "timestamp_nanos"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 32-bit signed integer
    Int32,

    /// 64-bit signed integer
    Int64,

    /// 64-bit IEEE 754 floating point
    Double,

    /// UTF-8 text
    String,

    /// Nanoseconds since the Unix epoch, UTC
    TimestampNanos,
}

impl ColumnType {
    /// All column types, in declaration order.
    pub const ALL: [ColumnType; 5] = [
        Self::Int32,
        Self::Int64,
        Self::Double,
        Self::String,
        Self::TimestampNanos,
    ];

    /// Canonical document name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::TimestampNanos => "TIMESTAMP_NANOS",
        }
    }

    /// Whether values of this type are numeric (`Int32`, `Int64`, `Double`).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int32 | Self::Int64 | Self::Double)
    }

    /// Parse a textual literal into a value of this type.
    ///
    /// Timestamps accept RFC 3339, an ISO date-time without offset (taken as
    /// UTC), or a bare integer count of nanoseconds.
    pub fn parse_literal(&self, text: &str) -> Result<Value, ParseLiteralError> {
        let trimmed = text.trim();
        let err = || ParseLiteralError {
            column_type: *self,
            literal: text.to_string(),
        };
        match self {
            Self::Int32 => trimmed.parse().map(Value::Int32).map_err(|_| err()),
            Self::Int64 => trimmed.parse().map(Value::Int64).map_err(|_| err()),
            Self::Double => trimmed.parse().map(Value::Double).map_err(|_| err()),
            Self::String => Ok(Value::String(text.to_string())),
            Self::TimestampNanos => parse_timestamp_nanos(trimmed)
                .map(Value::TimestampNanos)
                .ok_or_else(err),
        }
    }
}

fn parse_timestamp_nanos(s: &str) -> Option<i64> {
    if let Ok(nanos) = s.parse::<i64>() {
        return Some(nanos);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.timestamp_nanos_opt();
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return naive.and_utc().timestamp_nanos_opt();
        }
    }

    None
}

/// A literal that does not parse as the requested column type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("\"{literal}\" is not a valid {column_type} literal")]
pub struct ParseLiteralError {
    pub column_type: ColumnType,
    pub literal: String,
}

/// Unrecognised column type name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognized column type \"{0}\"")]
pub struct UnknownColumnType(pub String);

impl FromStr for ColumnType {
    type Err = UnknownColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "int32" => Ok(Self::Int32),
            "int64" => Ok(Self::Int64),
            "double" => Ok(Self::Double),
            "string" => Ok(Self::String),
            "timestampnanos" => Ok(Self::TimestampNanos),
            _ => Err(UnknownColumnType(s.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
