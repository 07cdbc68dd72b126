use rand::Rng;
use rand_distr::Distribution as RandDistribution;

use super::{check_probability, sampler_error, Univariate};
use crate::error::{ProbError, Result};
use crate::special::{ln_choose, regularized_incomplete_beta};

/// Binomial distribution: number of successes in `N` independent trials,
/// each succeeding with probability `θ`.
///
/// # Mathematical Definition
/// - PMF: P(X = k) = C(N, k) θᵏ (1−θ)ᴺ⁻ᵏ, k = 0..N
/// - CDF: I₁₋θ(N−k, k+1) = 1 − I_θ(k+1, N−k)
/// - Mean: Nθ
/// - Variance: Nθ(1−θ)
///
/// # Examples
/// ```
/// use u_prob::distributions::{Binomial, Univariate};
///
/// // Rolling 20 dice and counting skulls (one face in six).
/// let skulls = Binomial::new(1.0 / 6.0, 20).unwrap();
/// assert!((skulls.pmf(4) - 0.2022).abs() < 1e-4);
/// assert_eq!(skulls.quantile(0.75).unwrap(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Binomial {
    p: f64,
    n: u64,
}

impl Binomial {
    /// Creates a binomial distribution with success probability `p` and
    /// `trials` trials.
    ///
    /// # Errors
    /// Returns `Err` if `p` is NaN or outside `[0, 1]`.
    pub fn new(p: f64, trials: u64) -> Result<Self> {
        if p.is_nan() || !(0.0..=1.0).contains(&p) {
            return Err(ProbError::InvalidParameter(format!(
                "Binomial success probability must be in [0, 1], got {p}"
            )));
        }
        Ok(Self { p, n: trials })
    }

    /// Creates a binomial distribution from a real-valued trial count.
    ///
    /// # Errors
    /// Returns `Err` if `trials` is negative, non-integral, or not finite,
    /// or if `p` is invalid.
    pub fn from_real(p: f64, trials: f64) -> Result<Self> {
        if !trials.is_finite() || trials < 0.0 || trials.fract() != 0.0 || trials > u64::MAX as f64 {
            return Err(ProbError::InvalidParameter(format!(
                "Binomial trials must be a non-negative integer, got {trials}"
            )));
        }
        Self::new(p, trials as u64)
    }

    pub fn success_probability(&self) -> f64 {
        self.p
    }

    pub fn trials(&self) -> u64 {
        self.n
    }

    /// Probability of exactly `k` successes.
    pub fn pmf(&self, k: u64) -> f64 {
        if k > self.n {
            return 0.0;
        }
        if self.p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p == 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }
        let kf = k as f64;
        let nf = self.n as f64;
        (ln_choose(self.n, k) + kf * self.p.ln() + (nf - kf) * (-self.p).ln_1p()).exp()
    }

    /// Probability of at most `k` successes.
    ///
    /// Evaluated through the regularized incomplete beta, choosing the side
    /// whose continued fraction gives the smaller tail directly, so both
    /// tails keep their relative precision.
    pub fn cdf(&self, k: u64) -> f64 {
        if k >= self.n || self.p == 0.0 {
            return 1.0;
        }
        if self.p == 1.0 {
            return 0.0;
        }
        let a = (k + 1) as f64;
        let b = (self.n - k) as f64;
        let value = if self.p < (a + 1.0) / (a + b + 2.0) {
            1.0 - regularized_incomplete_beta(self.p, a, b)
        } else {
            regularized_incomplete_beta(1.0 - self.p, b, a)
        };
        value.clamp(0.0, 1.0)
    }

    /// Lazily draws `count` success counts.
    ///
    /// # Examples
    /// ```
    /// use u_prob::distributions::Binomial;
    /// use u_prob::random::create_rng;
    ///
    /// let coins = Binomial::new(0.5, 20).unwrap();
    /// let mut rng = create_rng(42);
    /// let heads: Vec<u64> = coins.sample_counts(1000, &mut rng).unwrap().collect();
    /// assert_eq!(heads.len(), 1000);
    /// assert!(heads.iter().all(|&h| h <= 20));
    /// ```
    pub fn sample_counts<'a, R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &'a mut R,
    ) -> Result<impl Iterator<Item = u64> + 'a> {
        let sampler = rand_distr::Binomial::new(self.n, self.p).map_err(sampler_error)?;
        Ok((0..count).map(move |_| sampler.sample(&mut *rng)))
    }
}

impl Univariate for Binomial {
    /// P(X = x); zero for non-integral or out-of-support `x`.
    fn density(&self, x: f64) -> f64 {
        if x.is_nan() || x < 0.0 || x.fract() != 0.0 || x > self.n as f64 {
            return 0.0;
        }
        self.pmf(x as u64)
    }

    /// P(X ≤ x), with `x` floored to the nearest count below.
    fn cumulative(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x < 0.0 {
            return 0.0;
        }
        if x >= self.n as f64 {
            return 1.0;
        }
        self.cdf(x.floor() as u64)
    }

    /// Smallest count `k` with P(X ≤ k) ≥ p, found by binary search over
    /// [`cdf`](Binomial::cdf). Never interpolates; `quantile(1)` is `n`.
    fn quantile(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        if p == 0.0 {
            return Ok(0.0);
        }
        if p == 1.0 {
            return Ok(self.n as f64);
        }
        let mut lo = 0_u64;
        let mut hi = self.n;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.cdf(mid) < p {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        tracing::trace!(k = lo, p, "binomial quantile found");
        Ok(lo as f64)
    }

    fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }

    fn variance(&self) -> f64 {
        self.n as f64 * self.p * (1.0 - self.p)
    }

    fn is_discrete(&self) -> bool {
        true
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn pmf_sums_to_one(p in 0.0_f64..=1.0, n in 0_u64..200) {
            let b = Binomial::new(p, n).unwrap();
            let total: f64 = (0..=n).map(|k| b.pmf(k)).sum();
            prop_assert!((total - 1.0).abs() < 1e-9, "sum={}", total);
        }

        #[test]
        fn pmf_is_probability(p in 0.0_f64..=1.0, n in 0_u64..200, k in 0_u64..200) {
            let b = Binomial::new(p, n).unwrap();
            let v = b.pmf(k);
            prop_assert!((0.0..=1.0).contains(&v));
        }

        #[test]
        fn cdf_monotonic(p in 0.0_f64..=1.0, n in 1_u64..150, k in 0_u64..150) {
            let b = Binomial::new(p, n).unwrap();
            prop_assert!(b.cdf(k + 1) >= b.cdf(k));
        }

        #[test]
        fn quantile_rounds_upward(p in 0.01_f64..0.99, n in 1_u64..80, x in 0_u64..80) {
            let b = Binomial::new(p, n).unwrap();
            let x = x.min(n);
            let c = b.cumulative(x as f64);
            let q = b.quantile(c).unwrap();
            prop_assert!(q >= x as f64, "quantile(F({})) = {} < {}", x, q, x);
            prop_assert!(b.cumulative(q) >= c);
        }

        #[test]
        fn quantile_is_smallest(prob in 0.001_f64..0.999, p in 0.01_f64..0.99, n in 1_u64..80) {
            let b = Binomial::new(p, n).unwrap();
            let q = b.quantile(prob).unwrap();
            prop_assert!(b.cumulative(q) >= prob);
            if q >= 1.0 {
                prop_assert!(b.cumulative(q - 1.0) < prob);
            }
        }
    }
}
