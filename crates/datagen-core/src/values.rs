//! Value representations produced by generators and consumed by sinks.

use crate::types::ColumnType;
use chrono::{DateTime, SecondsFormat};

/// A single generated value.
///
/// A value is either the variant matching its column's [`ColumnType`] or
/// `Null`. Generators guarantee this at construction; sinks reject
/// mismatches as a programming error.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Double(f64),

    /// UTF-8 text
    String(String),

    /// Nanoseconds since the Unix epoch, UTC
    TimestampNanos(i64),

    /// Null value
    Null,
}

/// One row: a value per configured column, in configuration order.
pub type Row = Vec<Value>;

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The column type this value belongs to, or `None` for `Null`.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Int32(_) => Some(ColumnType::Int32),
            Self::Int64(_) => Some(ColumnType::Int64),
            Self::Double(_) => Some(ColumnType::Double),
            Self::String(_) => Some(ColumnType::String),
            Self::TimestampNanos(_) => Some(ColumnType::TimestampNanos),
            Self::Null => None,
        }
    }

    /// Whether this value may be stored in a column of the given type.
    pub fn matches(&self, column_type: ColumnType) -> bool {
        match self.column_type() {
            Some(ty) => ty == column_type,
            None => true,
        }
    }

    /// Textual projection used by the CSV sink. `Null` has no text.
    ///
    /// Timestamps render as RFC 3339 in UTC, e.g. `2021-06-01T12:00:00.500Z`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Int32(i) => Some(i.to_string()),
            Self::Int64(i) => Some(i.to_string()),
            Self::Double(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::TimestampNanos(nanos) => Some(
                DateTime::from_timestamp_nanos(*nanos)
                    .to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            Self::Null => None,
        }
    }

    /// Try to get this value as an i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(i) => Some(*i),
            Self::Int32(i) => Some(*i as i64),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a nanosecond timestamp.
    pub fn as_timestamp_nanos(&self) -> Option<i64> {
        match self {
            Self::TimestampNanos(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Int32(-5).to_text().as_deref(), Some("-5"));
        assert_eq!(Value::Int64(1 << 40).to_text().as_deref(), Some("1099511627776"));
        assert_eq!(Value::Double(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(Value::from("abc").to_text().as_deref(), Some("abc"));
        assert_eq!(Value::Null.to_text(), None);
    }

    #[test]
    fn test_timestamp_text() {
        assert_eq!(
            Value::TimestampNanos(0).to_text().as_deref(),
            Some("1970-01-01T00:00:00Z")
        );
        assert_eq!(
            Value::TimestampNanos(1_500_000_000).to_text().as_deref(),
            Some("1970-01-01T00:00:01.500Z")
        );
    }

    #[test]
    fn test_matches() {
        assert!(Value::Int32(1).matches(ColumnType::Int32));
        assert!(!Value::Int32(1).matches(ColumnType::Int64));
        assert!(Value::Null.matches(ColumnType::TimestampNanos));
        assert!(Value::TimestampNanos(3).matches(ColumnType::TimestampNanos));
        assert!(!Value::from("x").matches(ColumnType::Double));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int32(7).as_i64(), Some(7));
        assert_eq!(Value::Double(1.0).as_i64(), None);
        assert_eq!(Value::from("s").as_str(), Some("s"));
        assert_eq!(Value::TimestampNanos(9).as_timestamp_nanos(), Some(9));
        assert!(Value::Null.is_null());
    }
}
