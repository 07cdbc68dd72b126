//! Seeded random sources and simple random experiments.
//!
//! Every sampler in this crate takes a caller-owned `&mut R: Rng`, so the
//! same seed always replays the same experiment on the same platform.
//!
//! # Reproducibility
//!
//! Use [`create_rng`] with a fixed seed. `SmallRng` is not
//! cryptographically secure and its stream may change between `rand`
//! releases; pin the seed, not the output.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{ProbError, Result};

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_prob::random::create_rng;
/// use rand::Rng;
/// let mut a = create_rng(7);
/// let mut b = create_rng(7);
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Flips `n` coins that each land heads with probability `p`.
///
/// Returns `true` for heads. Each flip is an independent Bernoulli(p)
/// trial, so counting the `true` entries gives one Binomial(p, n) draw.
///
/// # Errors
/// Returns `Err` if `p` is outside `[0, 1]` or NaN.
///
/// # Examples
/// ```
/// use u_prob::random::{coin_flips, create_rng};
/// let mut rng = create_rng(42);
/// let flips = coin_flips(10, 0.5, &mut rng).unwrap();
/// assert_eq!(flips.len(), 10);
/// ```
pub fn coin_flips<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> Result<Vec<bool>> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ProbError::InvalidParameter(format!(
            "coin probability must be in [0, 1], got {p}"
        )));
    }
    tracing::trace!(n, p, "flipping coins");
    Ok((0..n).map(|_| rng.random_bool(p)).collect())
}

/// Pre-computed table for drawing indices in proportion to their weights.
///
/// Builds the running totals once, then each draw is a binary search.
/// Used to draw elementary events from an
/// [`EventSpace`](crate::events::EventSpace).
///
/// # Complexity
/// - Construction: O(n)
/// - Sampling: O(log n)
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl WeightedSampler {
    /// Returns `None` if `weights` is empty or no weight is positive.
    /// Negative and NaN weights count as zero.
    pub fn new(weights: &[f64]) -> Option<Self> {
        let mut total = 0.0;
        let cumulative: Vec<f64> = weights
            .iter()
            .map(|&w| {
                if w > 0.0 {
                    total += w;
                }
                total
            })
            .collect();
        if cumulative.is_empty() || total <= 0.0 || !total.is_finite() {
            return None;
        }
        Some(Self { cumulative, total })
    }

    /// Draws one index; zero-weight indices are never returned.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let threshold = rng.random_range(0.0..self.total);
        // first index whose running total exceeds the threshold
        let i = self.cumulative.partition_point(|&c| c <= threshold);
        i.min(self.cumulative.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rng_deterministic() {
        let mut a = create_rng(42);
        let mut b = create_rng(42);
        let xs: Vec<f64> = (0..10).map(|_| a.random()).collect();
        let ys: Vec<f64> = (0..10).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_coin_flips_degenerate() {
        let mut rng = create_rng(1);
        assert!(coin_flips(50, 0.0, &mut rng).unwrap().iter().all(|h| !h));
        assert!(coin_flips(50, 1.0, &mut rng).unwrap().iter().all(|h| *h));
        assert!(coin_flips(0, 0.5, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_coin_flips_invalid() {
        let mut rng = create_rng(1);
        assert!(matches!(
            coin_flips(5, 1.5, &mut rng),
            Err(ProbError::InvalidParameter(_))
        ));
        assert!(coin_flips(5, -0.1, &mut rng).is_err());
        assert!(coin_flips(5, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_coin_flips_frequency() {
        let mut rng = create_rng(2024);
        let flips = coin_flips(20_000, 0.3, &mut rng).unwrap();
        let heads = flips.iter().filter(|h| **h).count() as f64;
        assert!((heads / 20_000.0 - 0.3).abs() < 0.02);
    }

    #[test]
    fn test_weighted_sampler_skips_zero_weights() {
        let sampler = WeightedSampler::new(&[0.0, 3.0, 0.0]).unwrap();
        let mut rng = create_rng(42);
        for _ in 0..200 {
            assert_eq!(sampler.sample(&mut rng), 1);
        }
        assert_eq!(sampler.len(), 3);
    }

    #[test]
    fn test_weighted_sampler_rejects_empty() {
        assert!(WeightedSampler::new(&[]).is_none());
        assert!(WeightedSampler::new(&[0.0, -1.0]).is_none());
    }

    #[test]
    fn test_weighted_sampler_frequencies() {
        let sampler = WeightedSampler::new(&[0.1, 0.6, 0.3]).unwrap();
        let mut rng = create_rng(99);
        let mut counts = [0usize; 3];
        let n = 30_000;
        for _ in 0..n {
            counts[sampler.sample(&mut rng)] += 1;
        }
        for (c, w) in counts.iter().zip([0.1, 0.6, 0.3]) {
            assert!((*c as f64 / n as f64 - w).abs() < 0.02);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn coin_flips_length(n in 0_usize..500, p in 0.0_f64..=1.0, seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            prop_assert_eq!(coin_flips(n, p, &mut rng).unwrap().len(), n);
        }

        #[test]
        fn weighted_sample_in_range(
            weights in proptest::collection::vec(0.01_f64..10.0, 1..20),
            seed in any::<u64>(),
        ) {
            let sampler = WeightedSampler::new(&weights).unwrap();
            let mut rng = create_rng(seed);
            for _ in 0..20 {
                prop_assert!(sampler.sample(&mut rng) < weights.len());
            }
        }
    }
}
