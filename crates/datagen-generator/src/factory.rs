//! Builds column generators from their JSON definitions.
//!
//! Every column node carries `generation_type`, `type`, `seed` and an
//! optional `percent_null`; the remaining keys depend on the generation
//! type. All validation happens here, before any row is produced.

use crate::generator::{ColumnGenerator, GeneratorError, GeneratorKind};
use crate::generators::{
    parse_values, ExplicitListGenerator, FullRangeGenerator, IdGenerator, Increment, Ordering,
    PercentNullManager, RandomGenerator, SelectionDistribution, SelectionGenerator,
};
use datagen_core::{locate_file, ColumnDefinition, ColumnType, ConfigError, ConfigNode};
use serde_json::Value as JsonValue;
use std::path::Path;
use std::str::FromStr;

/// Value of `generation_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationType {
    FullRange,
    Selection,
    Random,
    File,
    List,
    Id,
}

impl FromStr for GenerationType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full_range" => Ok(Self::FullRange),
            "selection" => Ok(Self::Selection),
            "random" => Ok(Self::Random),
            "file" => Ok(Self::File),
            "list" => Ok(Self::List),
            "id" => Ok(Self::Id),
            _ => Err(()),
        }
    }
}

/// Build the generator for one column of a generation document.
pub fn generator_from_definition(
    column: &ColumnDefinition,
    base_dir: &Path,
) -> Result<ColumnGenerator, GeneratorError> {
    generator_from_json(&column.name, &column.node, base_dir)
}

/// Build a column generator from its JSON node.
///
/// Relative `source_file` paths are resolved against `base_dir`, then its
/// parent.
pub fn generator_from_json(
    column: &str,
    node: &JsonValue,
    base_dir: &Path,
) -> Result<ColumnGenerator, GeneratorError> {
    let node = ConfigNode::new(column, node)?;

    let type_name = node.required_str("generation_type")?;
    let generation_type: GenerationType =
        type_name
            .trim()
            .parse()
            .map_err(|_| ConfigError::UnknownGenerationType {
                column: column.to_string(),
                generation_type: type_name.clone(),
            })?;

    let column_type = node.column_type()?;
    let seed = node.seed()?;
    let nulls = PercentNullManager::from_percentage(node.percent_null()?, seed)
        .map_err(|e| ConfigError::invalid(column, e.to_string()))?;

    let kind = match generation_type {
        GenerationType::FullRange => full_range(&node, column_type, seed)?,
        GenerationType::Id => id(&node, column_type)?,
        GenerationType::Random => random(&node, column_type, seed)?,
        GenerationType::Selection => selection(&node, column_type, seed, base_dir)?,
        GenerationType::File => file_list(&node, column_type, seed, base_dir)?,
        GenerationType::List => inline_list(&node, column_type, seed)?,
    };

    tracing::debug!(
        "{}: built {} generator ({}, nulls: {})",
        column,
        kind.name(),
        column_type,
        nulls.may_null()
    );

    Ok(ColumnGenerator::new(column, kind, nulls))
}

/// Parse an optional enum-valued key, logging the default when absent.
fn optional_choice<T>(node: &ConfigNode<'_>, key: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = String> + Default + std::fmt::Debug,
{
    match node.optional_str(key)? {
        None => {
            let value = T::default();
            tracing::debug!("{}: no {} specified, defaulting to {:?}", node.column(), key, value);
            Ok(value)
        }
        Some(text) => text
            .trim()
            .parse()
            .map_err(|message: String| ConfigError::invalid(node.column(), message)),
    }
}

fn full_range(
    node: &ConfigNode<'_>,
    column_type: ColumnType,
    seed: u64,
) -> Result<GeneratorKind, ConfigError> {
    let start = node.required_i64("range_start")?;
    let stop = node.required_i64("range_stop")?;
    let order: Ordering = optional_choice(node, "order")?;
    FullRangeGenerator::new(node.column(), column_type, start, stop, order, seed)
        .map(GeneratorKind::FullRange)
}

fn id(node: &ConfigNode<'_>, column_type: ColumnType) -> Result<GeneratorKind, ConfigError> {
    let start_id = node.required_i64("start_id")?;
    let increment: Increment = optional_choice(node, "increment")?;
    let hex = node.bool_or("hex", false)?;
    IdGenerator::new(node.column(), column_type, start_id, increment, hex).map(GeneratorKind::Id)
}

fn require_type(
    node: &ConfigNode<'_>,
    column_type: ColumnType,
    allowed: &[ColumnType],
    distribution: &str,
) -> Result<(), ConfigError> {
    if allowed.contains(&column_type) {
        Ok(())
    } else {
        Err(ConfigError::UnsupportedType {
            column: node.column().to_string(),
            column_type,
            generator: format!("{distribution} distribution"),
        })
    }
}

fn random(
    node: &ConfigNode<'_>,
    column_type: ColumnType,
    seed: u64,
) -> Result<GeneratorKind, ConfigError> {
    let column = node.column();
    let distribution = node.required_str("distribution")?.trim().to_ascii_lowercase();

    let generator = match distribution.as_str() {
        "uniform" => match column_type {
            ColumnType::Int32 => RandomGenerator::uniform_int32(
                column,
                node.required_i32("lower_bound")?,
                node.required_i32("upper_bound")?,
                seed,
            )?,
            ColumnType::Int64 => RandomGenerator::uniform_int64(
                column,
                node.required_i64("lower_bound")?,
                node.required_i64("upper_bound")?,
                seed,
            )?,
            ColumnType::Double => RandomGenerator::uniform_double(
                column,
                node.required_f64("lower_bound")?,
                node.required_f64("upper_bound")?,
                seed,
            )?,
            _ => {
                return Err(ConfigError::UnsupportedType {
                    column: column.to_string(),
                    column_type,
                    generator: "uniform distribution".to_string(),
                })
            }
        },
        "normal" => {
            require_type(node, column_type, &[ColumnType::Double], "normal")?;
            RandomGenerator::normal(
                column,
                node.required_f64("mean")?,
                node.required_f64("stddev")?,
                seed,
            )?
        }
        "exponential" => {
            require_type(node, column_type, &[ColumnType::Double], "exponential")?;
            RandomGenerator::exponential(column, node.required_f64("lambda")?, seed)?
        }
        "poisson_wait" => {
            require_type(node, column_type, &[ColumnType::TimestampNanos], "poisson_wait")?;
            let start_text = node.required_str("start_nanos")?;
            let start_nanos = ColumnType::TimestampNanos
                .parse_literal(&start_text)
                .ok()
                .and_then(|v| v.as_timestamp_nanos())
                .ok_or_else(|| ConfigError::Malformed {
                    column: column.to_string(),
                    key: "start_nanos".to_string(),
                    expected: "a nanosecond count or ISO-8601 timestamp",
                    value: start_text.clone(),
                })?;
            RandomGenerator::poisson_wait(
                column,
                start_nanos,
                node.required_i64("mean_wait_nanos")?,
                seed,
            )?
        }
        "random_walk" => match column_type {
            ColumnType::Int32 => RandomGenerator::random_walk_int32(
                node.required_i32("initial")?,
                node.required_i32("step")?,
                seed,
            ),
            ColumnType::Int64 => RandomGenerator::random_walk_int64(
                node.required_i64("initial")?,
                node.required_i64("step")?,
                seed,
            ),
            ColumnType::Double => RandomGenerator::random_walk_double(
                node.required_f64("initial")?,
                node.required_f64("step")?,
                seed,
            ),
            _ => {
                return Err(ConfigError::UnsupportedType {
                    column: column.to_string(),
                    column_type,
                    generator: "random_walk distribution".to_string(),
                })
            }
        },
        "random_pick" => {
            let texts = node.required_str_list("options")?;
            let options = parse_values(column, column_type, "options", &texts)?;
            let weights =
                node.optional_list::<u64>("weights", "a list of non-negative integers")?;
            RandomGenerator::random_pick(column, column_type, options, weights, seed)?
        }
        other => {
            return Err(ConfigError::invalid(
                column,
                format!(
                    "distribution must be one of uniform, normal, exponential, poisson_wait, random_walk or random_pick; found \"{other}\""
                ),
            ))
        }
    };

    Ok(GeneratorKind::Random(generator))
}

fn selection(
    node: &ConfigNode<'_>,
    column_type: ColumnType,
    seed: u64,
    base_dir: &Path,
) -> Result<GeneratorKind, GeneratorError> {
    let distribution: SelectionDistribution = optional_choice(node, "distribution")?;
    let path = locate_file(base_dir, &node.required_str("source_file")?)?;
    SelectionGenerator::from_file(node.column(), column_type, &path, distribution, seed)
        .map(GeneratorKind::Selection)
}

fn file_list(
    node: &ConfigNode<'_>,
    column_type: ColumnType,
    seed: u64,
    base_dir: &Path,
) -> Result<GeneratorKind, GeneratorError> {
    let path = locate_file(base_dir, &node.required_str("source_file")?)?;
    let count = node.optional_u64("count")?;
    let random = node.bool_or("random", false)?;
    ExplicitListGenerator::from_file(node.column(), column_type, &path, count, random, seed)
        .map(GeneratorKind::ExplicitList)
}

fn inline_list(
    node: &ConfigNode<'_>,
    column_type: ColumnType,
    seed: u64,
) -> Result<GeneratorKind, ConfigError> {
    let texts = node.required_str_list("values")?;
    let values = parse_values(node.column(), column_type, "values", &texts)?;
    let count = node.optional_u64("count")?;
    let random = node.bool_or("random", false)?;
    ExplicitListGenerator::new(node.column(), column_type, values, count, random, seed)
        .map(GeneratorKind::ExplicitList)
}
