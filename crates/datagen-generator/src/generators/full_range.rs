//! Full-range generator: every integer of `[start, stop]` exactly once.
//!
//! Increasing and decreasing orderings step a single cursor. Shuffling
//! materializes the whole range and permutes it in place, which costs O(n)
//! memory and time.

use super::seeded_rng;
use datagen_core::{ColumnType, ConfigError, Value};
use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;

/// Order in which the range is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    #[default]
    Increasing,
    Decreasing,
    Shuffled,
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "increasing" => Ok(Self::Increasing),
            "decreasing" => Ok(Self::Decreasing),
            "shuffled" => Ok(Self::Shuffled),
            _ => Err(format!(
                "order must be one of increasing, decreasing or shuffled; found \"{s}\""
            )),
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => f.write_str("increasing"),
            Self::Decreasing => f.write_str("decreasing"),
            Self::Shuffled => f.write_str("shuffled"),
        }
    }
}

#[derive(Debug, Clone)]
enum Cursor {
    Step { next: i64, step: i64, remaining: u64 },
    Deck { deck: Vec<i64>, pos: usize },
}

/// Enumerates `start..=stop` as `Int32`, `Int64` or `Double`.
#[derive(Debug, Clone)]
pub struct FullRangeGenerator {
    column_type: ColumnType,
    start: i64,
    stop: i64,
    order: Ordering,
    cursor: Cursor,
}

impl FullRangeGenerator {
    /// Build a generator over `[start, stop]`.
    ///
    /// Fails if `stop < start`, if the column type is not numeric, or if an
    /// `Int32` column is given endpoints outside the `i32` range.
    pub fn new(
        column: &str,
        column_type: ColumnType,
        start: i64,
        stop: i64,
        order: Ordering,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if !column_type.is_numeric() {
            return Err(ConfigError::UnsupportedType {
                column: column.to_string(),
                column_type,
                generator: "full_range".to_string(),
            });
        }
        if stop < start {
            return Err(ConfigError::invalid(
                column,
                format!("range_start {start} must not be greater than range_stop {stop}"),
            ));
        }
        if column_type == ColumnType::Int32
            && (i32::try_from(start).is_err() || i32::try_from(stop).is_err())
        {
            return Err(ConfigError::invalid(
                column,
                format!("range [{start}, {stop}] does not fit an INT32 column"),
            ));
        }

        // stop >= start, so the span is in [1, 2^64] and only saturates for the full i64 range.
        let span = (stop as i128 - start as i128 + 1).min(u64::MAX as i128) as u64;

        let cursor = match order {
            Ordering::Increasing => Cursor::Step {
                next: start,
                step: 1,
                remaining: span,
            },
            Ordering::Decreasing => Cursor::Step {
                next: stop,
                step: -1,
                remaining: span,
            },
            Ordering::Shuffled => {
                let capacity = usize::try_from(span).map_err(|_| {
                    ConfigError::invalid(column, format!("range of {span} values is too large to shuffle"))
                })?;
                let mut deck: Vec<i64> = Vec::new();
                deck.try_reserve_exact(capacity).map_err(|_| {
                    ConfigError::invalid(column, format!("range of {span} values is too large to shuffle"))
                })?;
                deck.extend(start..=stop);
                deck.shuffle(&mut seeded_rng(seed));
                Cursor::Deck { deck, pos: 0 }
            }
        };

        Ok(Self {
            column_type,
            start,
            stop,
            order,
            cursor,
        })
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn order(&self) -> Ordering {
        self.order
    }

    /// Inclusive bounds of the range.
    pub fn bounds(&self) -> (i64, i64) {
        (self.start, self.stop)
    }

    /// Number of values not yet produced.
    pub fn remaining(&self) -> u64 {
        match &self.cursor {
            Cursor::Step { remaining, .. } => *remaining,
            Cursor::Deck { deck, pos } => (deck.len() - pos) as u64,
        }
    }

    pub fn has_next(&self) -> bool {
        self.remaining() > 0
    }

    /// Produce the next value. Callers check [`has_next`](Self::has_next) first.
    pub(crate) fn pull(&mut self) -> Value {
        let raw = match &mut self.cursor {
            Cursor::Step {
                next,
                step,
                remaining,
            } => {
                let value = *next;
                *remaining = remaining.saturating_sub(1);
                *next = next.wrapping_add(*step);
                value
            }
            Cursor::Deck { deck, pos } => {
                let value = deck[*pos];
                *pos += 1;
                value
            }
        };
        self.project(raw)
    }

    fn project(&self, raw: i64) -> Value {
        match self.column_type {
            ColumnType::Int32 => Value::Int32(raw as i32),
            ColumnType::Double => Value::Double(raw as f64),
            // Non-numeric types are rejected in `new`.
            _ => Value::Int64(raw),
        }
    }
}
