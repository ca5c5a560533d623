//! Infinite selection from a file-backed pool of values.

use super::random::NormalSampler;
use super::{parse_values, seeded_rng};
use crate::GeneratorError;
use datagen_core::{read_lines, ColumnType, ConfigError, Value};
use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;
use std::str::FromStr;

/// How the next pool index is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionDistribution {
    #[default]
    Uniform,

    /// Clipped Gaussian centred on the middle of the pool.
    Normal,
}

impl FromStr for SelectionDistribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "normal" => Ok(Self::Normal),
            "indicated" => Err("indicated distribution is not supported".to_string()),
            _ => Err(format!(
                "distribution must be one of normal or uniform; found \"{s}\""
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionGenerator {
    column_type: ColumnType,
    values: Vec<Value>,
    distribution: SelectionDistribution,
    rng: StdRng,
    normal: NormalSampler,
}

impl SelectionGenerator {
    pub fn new(
        column: &str,
        column_type: ColumnType,
        values: Vec<Value>,
        distribution: SelectionDistribution,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if values.is_empty() {
            return Err(ConfigError::invalid(column, "selection source is empty"));
        }
        if let Some(bad) = values.iter().find(|v| !v.matches(column_type)) {
            return Err(ConfigError::invalid(
                column,
                format!("selection value {bad:?} is not a {column_type} value"),
            ));
        }

        Ok(Self {
            column_type,
            values,
            distribution,
            rng: seeded_rng(seed),
            normal: NormalSampler::standard(),
        })
    }

    /// Load the pool from a newline-delimited file, one literal per line.
    pub fn from_file(
        column: &str,
        column_type: ColumnType,
        path: &Path,
        distribution: SelectionDistribution,
        seed: u64,
    ) -> Result<Self, GeneratorError> {
        let lines = read_lines(path)?;
        let source = path.display().to_string();
        let values = parse_values(column, column_type, &source, &lines)?;
        tracing::debug!(
            "{}: loaded {} selection values from {}",
            column,
            values.len(),
            source
        );
        Ok(Self::new(column, column_type, values, distribution, seed)?)
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn distribution(&self) -> SelectionDistribution {
        self.distribution
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn has_next(&self) -> bool {
        true
    }

    fn next_index(&mut self) -> usize {
        let size = self.values.len();
        match self.distribution {
            SelectionDistribution::Uniform => self.rng.gen_range(0..size),
            SelectionDistribution::Normal => {
                let dev = size as f64 / 0.15;
                let mean = size as f64 / 2.0;
                loop {
                    let idx = (self.normal.sample(&mut self.rng) * dev + mean + 0.5).floor();
                    if idx >= 0.0 && idx < size as f64 {
                        return idx as usize;
                    }
                }
            }
        }
    }

    pub(crate) fn pull(&mut self) -> Value {
        let idx = self.next_index();
        self.values[idx].clone()
    }
}
