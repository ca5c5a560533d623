//! Monotonic identifier generator.

use datagen_core::{ColumnType, ConfigError, Value};
use std::str::FromStr;

/// Direction of the id counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Increment {
    #[default]
    Increasing,
    Decreasing,
}

impl Increment {
    fn step(&self) -> i64 {
        match self {
            Self::Increasing => 1,
            Self::Decreasing => -1,
        }
    }
}

impl FromStr for Increment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "increasing" => Ok(Self::Increasing),
            "decreasing" => Ok(Self::Decreasing),
            _ => Err(format!(
                "increment must be one of increasing or decreasing; found \"{s}\""
            )),
        }
    }
}

/// Infinite counter stepping by one from `start_id`.
///
/// Never exhausts on its own; some other column must bound the row stream.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    column_type: ColumnType,
    current: i64,
    increment: Increment,
    hex: bool,
}

impl IdGenerator {
    /// Build an id generator for an `Int32`, `Int64` or `String` column.
    ///
    /// `hex` renders `String` ids in lower-case hexadecimal and is rejected
    /// for numeric columns.
    pub fn new(
        column: &str,
        column_type: ColumnType,
        start_id: i64,
        increment: Increment,
        hex: bool,
    ) -> Result<Self, ConfigError> {
        match column_type {
            ColumnType::Int32 | ColumnType::Int64 | ColumnType::String => {}
            ColumnType::Double | ColumnType::TimestampNanos => {
                return Err(ConfigError::UnsupportedType {
                    column: column.to_string(),
                    column_type,
                    generator: "id".to_string(),
                })
            }
        }
        if hex && column_type != ColumnType::String {
            return Err(ConfigError::invalid(
                column,
                format!("hex ids require a STRING column, not {column_type}"),
            ));
        }
        if column_type == ColumnType::Int32 && i32::try_from(start_id).is_err() {
            return Err(ConfigError::invalid(
                column,
                format!("start_id {start_id} does not fit an INT32 column"),
            ));
        }

        Ok(Self {
            column_type,
            current: start_id,
            increment,
            hex,
        })
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// The id the next pull will produce.
    pub fn next_id(&self) -> i64 {
        self.current
    }

    pub fn has_next(&self) -> bool {
        true
    }

    pub(crate) fn pull(&mut self) -> Value {
        let id = self.current;
        self.current = self.current.wrapping_add(self.increment.step());

        match self.column_type {
            // INT32 ids wrap once the counter leaves the i32 range.
            ColumnType::Int32 => Value::Int32(id as i32),
            ColumnType::String if self.hex => Value::String(format!("{id:x}")),
            ColumnType::String => Value::String(id.to_string()),
            _ => Value::Int64(id),
        }
    }
}
