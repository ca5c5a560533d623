//! Null injection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Offset mixed into a column seed to derive the null-decision stream.
///
/// The null stream and the value stream share the configured seed but never
/// share a PRNG, so nulling a row does not perturb the values drawn for it.
const NULL_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Rolls, once per row, whether a generated value is replaced by `Null`.
#[derive(Debug, Clone, Default)]
pub enum PercentNullManager {
    /// `percent_null == 0`: never nulls, holds no PRNG.
    #[default]
    Never,

    /// Nulls each row with probability `threshold`.
    Percent { rng: StdRng, threshold: f64 },
}

/// Percentage outside `[0, 100]`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("percent_null must be between 0 and 100 inclusive; read {0}")]
pub struct PercentOutOfRange(pub f64);

impl PercentNullManager {
    /// Build a manager from a percentage in `[0, 100]` (50 means half the rows).
    pub fn from_percentage(percent: f64, seed: u64) -> Result<Self, PercentOutOfRange> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(PercentOutOfRange(percent));
        }
        if percent == 0.0 {
            return Ok(Self::Never);
        }
        Ok(Self::Percent {
            rng: StdRng::seed_from_u64(seed.wrapping_add(NULL_STREAM_SALT)),
            threshold: percent / 100.0,
        })
    }

    /// Roll for nullness. Consumes one uniform `[0, 1)` draw unless `Never`.
    pub fn test(&mut self) -> bool {
        match self {
            Self::Never => false,
            Self::Percent { rng, threshold } => rng.gen::<f64>() < *threshold,
        }
    }

    /// Whether this manager can ever produce a null.
    pub fn may_null(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_percent_never_nulls() {
        let mut mgr = PercentNullManager::from_percentage(0.0, 42).unwrap();
        assert!(!mgr.may_null());
        assert!((0..10_000).all(|_| !mgr.test()));
    }

    #[test]
    fn test_hundred_percent_always_nulls() {
        let mut mgr = PercentNullManager::from_percentage(100.0, 42).unwrap();
        assert!(mgr.may_null());
        assert!((0..10_000).all(|_| mgr.test()));
    }

    #[test]
    fn test_out_of_range() {
        assert!(PercentNullManager::from_percentage(-0.5, 1).is_err());
        assert!(PercentNullManager::from_percentage(100.1, 1).is_err());
        assert!(PercentNullManager::from_percentage(f64::NAN, 1).is_err());
    }

    #[test]
    fn test_rate_is_close_to_percentage() {
        let mut mgr = PercentNullManager::from_percentage(25.0, 7).unwrap();
        let nulls = (0..100_000).filter(|_| mgr.test()).count();
        let rate = nulls as f64 / 100_000.0;
        assert!((rate - 0.25).abs() < 0.01, "rate was {rate}");
    }

    #[test]
    fn test_deterministic() {
        let mut a = PercentNullManager::from_percentage(50.0, 99).unwrap();
        let mut b = PercentNullManager::from_percentage(50.0, 99).unwrap();
        let rolls_a: Vec<bool> = (0..1000).map(|_| a.test()).collect();
        let rolls_b: Vec<bool> = (0..1000).map(|_| b.test()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_stream_differs_from_value_stream() {
        // A value PRNG with the same seed must not dictate the null decisions.
        let mut values = StdRng::seed_from_u64(5);
        let mut mgr = PercentNullManager::from_percentage(50.0, 5).unwrap();
        let from_values: Vec<bool> = (0..256).map(|_| values.gen::<f64>() < 0.5).collect();
        let from_mgr: Vec<bool> = (0..256).map(|_| mgr.test()).collect();
        assert_ne!(from_values, from_mgr);
    }
}
