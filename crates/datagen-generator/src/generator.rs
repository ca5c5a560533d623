//! Column generator: one variant plus its null-injection layer.

use crate::generators::{
    ExplicitListGenerator, FullRangeGenerator, IdGenerator, PercentNullManager, RandomGenerator,
    SelectionGenerator,
};
use datagen_core::{ColumnSchema, ColumnType, ConfigError, ResourceError, Value};

/// Error type for generator construction.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Missing, malformed or incompatible configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Source file not found or unreadable
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A row driver needs at least one column
    #[error("at least one column generator is required")]
    NoColumns,
}

/// The closed set of generator variants.
#[derive(Debug, Clone)]
pub enum GeneratorKind {
    FullRange(FullRangeGenerator),
    Id(IdGenerator),
    Random(RandomGenerator),
    Selection(SelectionGenerator),
    ExplicitList(ExplicitListGenerator),
}

impl GeneratorKind {
    /// Generation type name as written in documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FullRange(_) => "full_range",
            Self::Id(_) => "id",
            Self::Random(_) => "random",
            Self::Selection(_) => "selection",
            Self::ExplicitList(_) => "list",
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::FullRange(g) => g.column_type(),
            Self::Id(g) => g.column_type(),
            Self::Random(g) => g.column_type(),
            Self::Selection(g) => g.column_type(),
            Self::ExplicitList(g) => g.column_type(),
        }
    }

    pub fn has_next(&self) -> bool {
        match self {
            Self::FullRange(g) => g.has_next(),
            Self::Id(g) => g.has_next(),
            Self::Random(g) => g.has_next(),
            Self::Selection(g) => g.has_next(),
            Self::ExplicitList(g) => g.has_next(),
        }
    }

    fn pull(&mut self) -> Value {
        match self {
            Self::FullRange(g) => g.pull(),
            Self::Id(g) => g.pull(),
            Self::Random(g) => g.pull(),
            Self::Selection(g) => g.pull(),
            Self::ExplicitList(g) => g.pull(),
        }
    }
}

/// A named column generator.
///
/// Every call to [`next_value`](Self::next_value) consumes exactly one raw
/// value from the underlying variant before the null decision is made, so a
/// nulled row advances the variant's cursor like any other row.
#[derive(Debug, Clone)]
pub struct ColumnGenerator {
    name: String,
    kind: GeneratorKind,
    nulls: PercentNullManager,
}

impl ColumnGenerator {
    pub fn new(name: impl Into<String>, kind: GeneratorKind, nulls: PercentNullManager) -> Self {
        Self {
            name: name.into(),
            kind,
            nulls,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.kind.column_type()
    }

    pub fn kind(&self) -> &GeneratorKind {
        &self.kind
    }

    pub fn nulls(&self) -> &PercentNullManager {
        &self.nulls
    }

    /// Sink schema entry for this column.
    pub fn schema(&self) -> ColumnSchema {
        ColumnSchema::new(self.name.clone(), self.column_type())
    }

    pub fn has_next(&self) -> bool {
        self.kind.has_next()
    }

    /// Next value, `Value::Null` if the null layer fires, or `None` once
    /// the variant is exhausted.
    pub fn next_value(&mut self) -> Option<Value> {
        if !self.kind.has_next() {
            return None;
        }
        let value = self.kind.pull();
        if self.nulls.test() {
            Some(Value::Null)
        } else {
            Some(value)
        }
    }
}

impl Iterator for ColumnGenerator {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Increment, Ordering};

    fn list(values: Vec<Value>, count: Option<u64>, pct: f64) -> ColumnGenerator {
        ColumnGenerator::new(
            "l",
            GeneratorKind::ExplicitList(
                ExplicitListGenerator::new("l", ColumnType::Int64, values, count, false, 1)
                    .unwrap(),
            ),
            PercentNullManager::from_percentage(pct, 1).unwrap(),
        )
    }

    #[test]
    fn test_exhaustion_yields_none() {
        let mut g = list(vec![Value::Int64(1), Value::Int64(2)], None, 0.0);
        assert_eq!(g.next_value(), Some(Value::Int64(1)));
        assert_eq!(g.next_value(), Some(Value::Int64(2)));
        assert!(!g.has_next());
        assert_eq!(g.next_value(), None);
        assert_eq!(g.next_value(), None);
    }

    #[test]
    fn test_nulled_rows_still_advance_cursor() {
        let mut g = list(vec![Value::Int64(1), Value::Int64(2)], Some(4), 100.0);
        let values: Vec<Value> = g.by_ref().collect();
        assert_eq!(values, vec![Value::Null; 4]);
        let GeneratorKind::ExplicitList(inner) = g.kind() else {
            panic!("expected list generator");
        };
        assert_eq!(inner.emitted(), 4);
    }

    #[test]
    fn test_nulls_do_not_perturb_values() {
        let make = |pct| {
            ColumnGenerator::new(
                "r",
                GeneratorKind::Random(RandomGenerator::uniform_int64("r", 0, 1000, 9).unwrap()),
                PercentNullManager::from_percentage(pct, 9).unwrap(),
            )
        };
        let plain: Vec<Value> = make(0.0).take(500).collect();
        let nulled: Vec<Value> = make(40.0).take(500).collect();
        assert!(nulled.iter().any(Value::is_null));
        for (p, n) in plain.iter().zip(&nulled) {
            assert!(n.is_null() || n == p);
        }
    }

    #[test]
    fn test_schema_and_kind_names() {
        let id = ColumnGenerator::new(
            "id",
            GeneratorKind::Id(
                IdGenerator::new("id", ColumnType::Int32, 0, Increment::Increasing, false)
                    .unwrap(),
            ),
            PercentNullManager::default(),
        );
        assert_eq!(id.schema(), ColumnSchema::new("id", ColumnType::Int32));
        assert_eq!(id.kind().name(), "id");

        let range = GeneratorKind::FullRange(
            FullRangeGenerator::new("r", ColumnType::Double, 0, 1, Ordering::Increasing, 0)
                .unwrap(),
        );
        assert_eq!(range.name(), "full_range");
        assert_eq!(range.column_type(), ColumnType::Double);
    }
}
