//! Pseudo-random generators.
//!
//! Every distribution produces an infinite, seed-reproducible stream:
//!
//! - `uniform` - `[lower_bound, upper_bound)` for `Int32`, `Int64`, `Double`
//! - `normal` - polar Box-Muller, `Double` only
//! - `exponential` - inverse CDF `-ln(u) / lambda`, `Double` only
//! - `poisson_wait` - running timestamp advanced by exponential waits, `TimestampNanos` only
//! - `random_walk` - `current += ±step`, `Int32`, `Int64`, `Double`
//! - `random_pick` - weighted choice from `options`, any column type

use super::seeded_rng;
use datagen_core::{ColumnType, ConfigError, Value};
use rand::rngs::StdRng;
use rand::Rng;

// ============================================================================
// Samplers
// ============================================================================

/// Normal sampler using the polar Box-Muller transform.
///
/// Each accepted `(x, y)` pair yields two deviates; the second is cached and
/// returned by the following call before any new draws are made.
#[derive(Debug, Clone)]
pub struct NormalSampler {
    mean: f64,
    stddev: f64,
    cached: Option<f64>,
}

impl NormalSampler {
    pub fn new(mean: f64, stddev: f64) -> Self {
        Self {
            mean,
            stddev,
            cached: None,
        }
    }

    /// Mean 0, standard deviation 1.
    pub fn standard() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if let Some(companion) = self.cached.take() {
            return self.mean + self.stddev * companion;
        }

        let (x, y, s) = loop {
            let x = 2.0 * rng.gen::<f64>() - 1.0;
            let y = 2.0 * rng.gen::<f64>() - 1.0;
            let s = x * x + y * y;
            if s < 1.0 && s != 0.0 {
                break (x, y, s);
            }
        };

        let z = (-2.0 * s.ln() / s).sqrt();
        self.cached = Some(x * z);
        self.mean + self.stddev * y * z
    }
}

/// Exponential deviate with mean `inverse_lambda`. `u == 0.0` is redrawn.
pub fn sample_exponential<R: Rng + ?Sized>(rng: &mut R, inverse_lambda: f64) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u != 0.0 {
            return -u.ln() * inverse_lambda;
        }
    }
}

/// Weighted discrete choice over a list of options.
///
/// Weights are accumulated into a prefix-sum array; a uniform draw in
/// `[1, total]` selects the first option whose cumulative weight reaches it,
/// so option `i` is chosen with probability `weights[i] / total`.
#[derive(Debug, Clone)]
pub struct WeightedPick {
    options: Vec<Value>,
    cumulative: Vec<u64>,
}

impl WeightedPick {
    /// Build a picker. Without weights every option weighs 1.
    pub fn new(options: Vec<Value>, weights: Option<Vec<u64>>) -> Result<Self, String> {
        if options.is_empty() {
            return Err("options list must not be empty".to_string());
        }

        let weights = match weights {
            Some(w) if w.len() != options.len() => {
                return Err(format!(
                    "length of options list ({}) and weights list ({}) should match",
                    options.len(),
                    w.len()
                ))
            }
            Some(w) => w,
            None => vec![1; options.len()],
        };

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total: u64 = 0;
        for w in weights {
            total = total
                .checked_add(w)
                .ok_or_else(|| "sum of weights overflows".to_string())?;
            cumulative.push(total);
        }
        if total == 0 {
            return Err("weights must not all be zero".to_string());
        }

        Ok(Self {
            options,
            cumulative,
        })
    }

    pub fn total_weight(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn options(&self) -> &[Value] {
        &self.options
    }

    /// Index of the first option whose cumulative weight is `>= draw`.
    fn index_for(&self, draw: u64) -> usize {
        self.cumulative.partition_point(|&c| c < draw)
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &Value {
        let draw = rng.gen_range(1..=self.total_weight());
        &self.options[self.index_for(draw)]
    }
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen::<bool>()
}

#[derive(Debug, Clone)]
enum Sampler {
    UniformInt32 { low: i32, high: i32 },
    UniformInt64 { low: i64, high: i64 },
    UniformDouble { low: f64, high: f64 },
    Normal(NormalSampler),
    Exponential { inverse_lambda: f64 },
    PoissonWait { current: i64, mean_wait: f64 },
    WalkInt32 { current: i32, step: i32 },
    WalkInt64 { current: i64, step: i64 },
    WalkDouble { current: f64, step: f64 },
    Pick(WeightedPick),
}

// ============================================================================
// Generator
// ============================================================================

/// Infinite generator drawing from one distribution.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    column_type: ColumnType,
    distribution: &'static str,
    rng: StdRng,
    sampler: Sampler,
}

impl RandomGenerator {
    fn with_sampler(
        column_type: ColumnType,
        distribution: &'static str,
        seed: u64,
        sampler: Sampler,
    ) -> Self {
        Self {
            column_type,
            distribution,
            rng: seeded_rng(seed),
            sampler,
        }
    }

    /// Uniform `Int32` over `[low, high)`.
    pub fn uniform_int32(column: &str, low: i32, high: i32, seed: u64) -> Result<Self, ConfigError> {
        if low >= high {
            return Err(empty_bounds(column, low, high));
        }
        Ok(Self::with_sampler(
            ColumnType::Int32,
            "uniform",
            seed,
            Sampler::UniformInt32 { low, high },
        ))
    }

    /// Uniform `Int64` over `[low, high)`.
    pub fn uniform_int64(column: &str, low: i64, high: i64, seed: u64) -> Result<Self, ConfigError> {
        if low >= high {
            return Err(empty_bounds(column, low, high));
        }
        Ok(Self::with_sampler(
            ColumnType::Int64,
            "uniform",
            seed,
            Sampler::UniformInt64 { low, high },
        ))
    }

    /// Uniform `Double` over `[low, high)`.
    pub fn uniform_double(column: &str, low: f64, high: f64, seed: u64) -> Result<Self, ConfigError> {
        if !(low < high) || !(high - low).is_finite() {
            return Err(empty_bounds(column, low, high));
        }
        Ok(Self::with_sampler(
            ColumnType::Double,
            "uniform",
            seed,
            Sampler::UniformDouble { low, high },
        ))
    }

    /// Normal `Double` with the given mean and standard deviation.
    pub fn normal(column: &str, mean: f64, stddev: f64, seed: u64) -> Result<Self, ConfigError> {
        if !mean.is_finite() || !stddev.is_finite() || stddev < 0.0 {
            return Err(ConfigError::invalid(
                column,
                format!("normal distribution needs a finite mean and stddev >= 0; read mean={mean}, stddev={stddev}"),
            ));
        }
        Ok(Self::with_sampler(
            ColumnType::Double,
            "normal",
            seed,
            Sampler::Normal(NormalSampler::new(mean, stddev)),
        ))
    }

    /// Exponential `Double` with rate `lambda`.
    pub fn exponential(column: &str, lambda: f64, seed: u64) -> Result<Self, ConfigError> {
        if !(lambda > 0.0) || !lambda.is_finite() {
            return Err(ConfigError::invalid(
                column,
                format!("lambda (={lambda}) should be > 0"),
            ));
        }
        Ok(Self::with_sampler(
            ColumnType::Double,
            "exponential",
            seed,
            Sampler::Exponential {
                inverse_lambda: 1.0 / lambda,
            },
        ))
    }

    /// `TimestampNanos` arrivals starting at `start_nanos` with exponential
    /// waits of mean `mean_wait_nanos`.
    pub fn poisson_wait(
        column: &str,
        start_nanos: i64,
        mean_wait_nanos: i64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if mean_wait_nanos <= 0 {
            return Err(ConfigError::invalid(
                column,
                format!("mean_wait_nanos (={mean_wait_nanos}) should be > 0"),
            ));
        }
        Ok(Self::with_sampler(
            ColumnType::TimestampNanos,
            "poisson_wait",
            seed,
            Sampler::PoissonWait {
                current: start_nanos,
                mean_wait: mean_wait_nanos as f64,
            },
        ))
    }

    /// `Int32` random walk.
    pub fn random_walk_int32(initial: i32, step: i32, seed: u64) -> Self {
        Self::with_sampler(
            ColumnType::Int32,
            "random_walk",
            seed,
            Sampler::WalkInt32 {
                current: initial,
                step,
            },
        )
    }

    /// `Int64` random walk.
    pub fn random_walk_int64(initial: i64, step: i64, seed: u64) -> Self {
        Self::with_sampler(
            ColumnType::Int64,
            "random_walk",
            seed,
            Sampler::WalkInt64 {
                current: initial,
                step,
            },
        )
    }

    /// `Double` random walk.
    pub fn random_walk_double(initial: f64, step: f64, seed: u64) -> Self {
        Self::with_sampler(
            ColumnType::Double,
            "random_walk",
            seed,
            Sampler::WalkDouble {
                current: initial,
                step,
            },
        )
    }

    /// Weighted pick from `options`, which must all be of `column_type`.
    pub fn random_pick(
        column: &str,
        column_type: ColumnType,
        options: Vec<Value>,
        weights: Option<Vec<u64>>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if let Some(bad) = options.iter().find(|v| v.is_null() || !v.matches(column_type)) {
            return Err(ConfigError::invalid(
                column,
                format!("option {bad:?} is not a {column_type} value"),
            ));
        }
        let pick = WeightedPick::new(options, weights).map_err(|m| ConfigError::invalid(column, m))?;
        Ok(Self::with_sampler(
            column_type,
            "random_pick",
            seed,
            Sampler::Pick(pick),
        ))
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Name of the distribution, as written in generation documents.
    pub fn distribution(&self) -> &'static str {
        self.distribution
    }

    pub fn has_next(&self) -> bool {
        true
    }

    pub(crate) fn pull(&mut self) -> Value {
        let rng = &mut self.rng;
        match &mut self.sampler {
            Sampler::UniformInt32 { low, high } => Value::Int32(rng.gen_range(*low..*high)),
            Sampler::UniformInt64 { low, high } => Value::Int64(rng.gen_range(*low..*high)),
            Sampler::UniformDouble { low, high } => Value::Double(rng.gen_range(*low..*high)),
            Sampler::Normal(normal) => Value::Double(normal.sample(rng)),
            Sampler::Exponential { inverse_lambda } => {
                Value::Double(sample_exponential(rng, *inverse_lambda))
            }
            Sampler::PoissonWait { current, mean_wait } => {
                let wait = sample_exponential(rng, *mean_wait).floor() as i64;
                *current = current.saturating_add(wait);
                Value::TimestampNanos(*current)
            }
            Sampler::WalkInt32 { current, step } => {
                let delta = if random_sign(rng) { *step } else { step.wrapping_neg() };
                *current = current.wrapping_add(delta);
                Value::Int32(*current)
            }
            Sampler::WalkInt64 { current, step } => {
                let delta = if random_sign(rng) { *step } else { step.wrapping_neg() };
                *current = current.wrapping_add(delta);
                Value::Int64(*current)
            }
            Sampler::WalkDouble { current, step } => {
                let delta = if random_sign(rng) { *step } else { -*step };
                *current += delta;
                Value::Double(*current)
            }
            Sampler::Pick(pick) => pick.pick(rng).clone(),
        }
    }
}

fn empty_bounds<T: std::fmt::Display>(column: &str, low: T, high: T) -> ConfigError {
    ConfigError::invalid(
        column,
        format!("lower_bound {low} must be less than upper_bound {high}"),
    )
}
