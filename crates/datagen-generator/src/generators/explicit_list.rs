//! Finite generator over an explicit list of values.
//!
//! Values come from an inline `values` array or from a file, one literal per
//! line. In sequential mode the list is cycled modulo its length; in random
//! mode entries are drawn with replacement. Either way the generator is
//! exhausted after `count` pulls, which defaults to the list length.

use super::{parse_values, seeded_rng};
use crate::GeneratorError;
use datagen_core::{read_lines, ColumnType, ConfigError, Value};
use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ExplicitListGenerator {
    column_type: ColumnType,
    values: Vec<Value>,
    count: u64,
    emitted: u64,
    rng: Option<StdRng>,
}

impl ExplicitListGenerator {
    pub fn new(
        column: &str,
        column_type: ColumnType,
        values: Vec<Value>,
        count: Option<u64>,
        random: bool,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let count = count.unwrap_or(values.len() as u64);
        if values.is_empty() && count > 0 {
            return Err(ConfigError::invalid(
                column,
                format!("cannot emit {count} values from an empty list"),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.matches(column_type)) {
            return Err(ConfigError::invalid(
                column,
                format!("list value {bad:?} is not a {column_type} value"),
            ));
        }

        Ok(Self {
            column_type,
            values,
            count,
            emitted: 0,
            rng: random.then(|| seeded_rng(seed)),
        })
    }

    /// Load the list from a newline-delimited file, one literal per line.
    pub fn from_file(
        column: &str,
        column_type: ColumnType,
        path: &Path,
        count: Option<u64>,
        random: bool,
        seed: u64,
    ) -> Result<Self, GeneratorError> {
        let lines = read_lines(path)?;
        let source = path.display().to_string();
        let values = parse_values(column, column_type, &source, &lines)?;
        tracing::debug!(
            "{}: loaded {} list values from {}",
            column,
            values.len(),
            source
        );
        Ok(Self::new(column, column_type, values, count, random, seed)?)
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Total number of values this generator will produce.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Values produced so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn is_random(&self) -> bool {
        self.rng.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.emitted < self.count
    }

    pub(crate) fn pull(&mut self) -> Value {
        let len = self.values.len();
        let idx = match &mut self.rng {
            Some(rng) => rng.gen_range(0..len),
            None => (self.emitted % len as u64) as usize,
        };
        self.emitted += 1;
        self.values[idx].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn drain(g: &mut ExplicitListGenerator) -> Vec<Value> {
        let mut out = Vec::new();
        while g.has_next() {
            out.push(g.pull());
        }
        out
    }

    fn tens() -> Vec<Value> {
        vec![Value::Int64(10), Value::Int64(20), Value::Int64(30)]
    }

    #[test]
    fn test_sequential_cycles_to_count() {
        let mut g =
            ExplicitListGenerator::new("c", ColumnType::Int64, tens(), Some(5), false, 0).unwrap();
        assert_eq!(
            drain(&mut g),
            vec![
                Value::Int64(10),
                Value::Int64(20),
                Value::Int64(30),
                Value::Int64(10),
                Value::Int64(20)
            ]
        );
        assert_eq!(g.emitted(), 5);
    }

    #[test]
    fn test_count_defaults_to_length() {
        let mut g =
            ExplicitListGenerator::new("c", ColumnType::Int64, tens(), None, false, 0).unwrap();
        assert_eq!(g.count(), 3);
        assert_eq!(drain(&mut g), tens());
    }

    #[test]
    fn test_zero_count_is_exhausted() {
        let g = ExplicitListGenerator::new("c", ColumnType::Int64, tens(), Some(0), false, 0)
            .unwrap();
        assert!(!g.has_next());

        let empty =
            ExplicitListGenerator::new("c", ColumnType::Int64, vec![], None, false, 0).unwrap();
        assert!(!empty.has_next());
    }

    #[test]
    fn test_empty_list_with_count_is_rejected() {
        assert!(
            ExplicitListGenerator::new("c", ColumnType::Int64, vec![], Some(1), false, 0).is_err()
        );
    }

    #[test]
    fn test_rejects_mismatched_values() {
        assert!(ExplicitListGenerator::new(
            "c",
            ColumnType::Int32,
            vec![Value::from("a")],
            None,
            false,
            0
        )
        .is_err());
    }

    #[test]
    fn test_random_draws_with_replacement() {
        let mut g =
            ExplicitListGenerator::new("c", ColumnType::Int64, tens(), Some(1000), true, 4)
                .unwrap();
        assert!(g.is_random());
        let drawn = drain(&mut g);
        assert_eq!(drawn.len(), 1000);
        assert!(drawn.iter().all(|v| tens().contains(v)));
        assert!(tens().iter().all(|v| drawn.contains(v)));

        let mut again =
            ExplicitListGenerator::new("c", ColumnType::Int64, tens(), Some(1000), true, 4)
                .unwrap();
        assert_eq!(drain(&mut again), drawn);
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("names.txt");
        fs::write(&path, "alice\nbob\r\ncarol\n").unwrap();

        let mut g =
            ExplicitListGenerator::from_file("c", ColumnType::String, &path, None, false, 0)
                .unwrap();
        assert_eq!(
            drain(&mut g),
            vec![Value::from("alice"), Value::from("bob"), Value::from("carol")]
        );
    }
}
