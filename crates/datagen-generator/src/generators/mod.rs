//! Individual column generators.
//!
//! Each generator owns a private seeded PRNG and produces raw values of its
//! column type. Null injection is layered on top by
//! [`ColumnGenerator`](crate::ColumnGenerator) through [`PercentNullManager`].

pub mod explicit_list;
pub mod full_range;
pub mod id;
pub mod null;
pub mod random;
pub mod selection;

pub use explicit_list::ExplicitListGenerator;
pub use full_range::{FullRangeGenerator, Ordering};
pub use id::{IdGenerator, Increment};
pub use null::PercentNullManager;
pub use random::{NormalSampler, RandomGenerator, WeightedPick};
pub use selection::{SelectionDistribution, SelectionGenerator};

use datagen_core::{ColumnType, ConfigError, Value};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Create the PRNG for a generator's value stream.
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Parse textual literals for a column, naming the source on failure.
pub(crate) fn parse_values<I, S>(
    column: &str,
    column_type: ColumnType,
    source: &str,
    texts: I,
) -> Result<Vec<Value>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(idx, text)| {
            column_type
                .parse_literal(text.as_ref())
                .map_err(|e| ConfigError::invalid(column, format!("{source} entry {}: {e}", idx + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        let values = parse_values("c", ColumnType::Int64, "values", ["1", "2"]).unwrap();
        assert_eq!(values, vec![Value::Int64(1), Value::Int64(2)]);
    }

    #[test]
    fn test_parse_values_names_bad_entry() {
        let err = parse_values("c", ColumnType::Int32, "values", ["1", "x"]).unwrap_err();
        assert!(err.to_string().contains("values entry 2"));
    }
}
