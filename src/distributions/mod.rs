//! Probability distributions.
//!
//! Every family exposes the same four operations through the
//! [`Univariate`] trait and the [`Distribution`] facade:
//!
//! | operation | discrete (binomial) | continuous |
//! |---|---|---|
//! | [`density`](Univariate::density) | P(X = x), a probability | f(x), unbounded above |
//! | [`cumulative`](Univariate::cumulative) | P(X ≤ x) | P(X ≤ x) |
//! | [`quantile`](Univariate::quantile) | smallest k with F(k) ≥ p | F⁻¹(p) |
//! | [`sample`](Distribution::sample) | lazy iterator of draws | lazy iterator of draws |
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Binomial`] | θ, N | Nθ | Nθ(1−θ) |
//! | [`Normal`] | μ, σ | μ | σ² |
//! | [`StudentT`] | ν | 0 (ν > 1) | ν/(ν−2) (ν > 2) |
//! | [`ChiSquared`] | k | k | 2k |
//! | [`FisherF`] | d₁, d₂ | d₂/(d₂−2) | see docs |

mod binomial;
mod chi_squared;
mod fisher_f;
mod normal;
mod student_t;

pub use binomial::Binomial;
pub use chi_squared::ChiSquared;
pub use fisher_f::FisherF;
pub use normal::Normal;
pub use student_t::StudentT;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::Distribution as RandDistribution;

use crate::error::{ProbError, Result};

/// Shared interface of all distribution families.
pub trait Univariate {
    /// Probability mass (discrete) or probability density (continuous) at `x`.
    fn density(&self, x: f64) -> f64;

    /// Cumulative probability P(X ≤ x), non-decreasing in `x`.
    fn cumulative(&self, x: f64) -> f64;

    /// Smallest `x` with `cumulative(x) ≥ p`.
    ///
    /// # Errors
    /// [`ProbError::InvalidArgument`] if `p` is NaN or outside `[0, 1]`.
    fn quantile(&self, p: f64) -> Result<f64>;

    fn mean(&self) -> f64;

    fn variance(&self) -> f64;

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    fn is_discrete(&self) -> bool {
        false
    }

    /// P(a < X ≤ b) = F(b) − F(a).
    ///
    /// # Errors
    /// [`ProbError::InvalidArgument`] if `a > b` or either bound is NaN.
    fn probability_between(&self, a: f64, b: f64) -> Result<f64> {
        if a.is_nan() || b.is_nan() || a > b {
            return Err(ProbError::InvalidArgument(format!(
                "interval requires lower <= upper, got [{a}, {b}]"
            )));
        }
        Ok((self.cumulative(b) - self.cumulative(a)).max(0.0))
    }
}

// ============================================================================
// Family
// ============================================================================

/// Distribution family tag, used to build a [`Distribution`] from raw
/// real-valued parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Binomial,
    Normal,
    StudentT,
    ChiSquared,
    FisherF,
}

impl Family {
    /// Names of the parameters expected by [`Distribution::from_parts`],
    /// in order.
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            Family::Binomial => &["success_probability", "trials"],
            Family::Normal => &["mean", "sd"],
            Family::StudentT => &["df"],
            Family::ChiSquared => &["df"],
            Family::FisherF => &["df1", "df2"],
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Binomial => "binomial",
            Family::Normal => "normal",
            Family::StudentT => "t",
            Family::ChiSquared => "chisq",
            Family::FisherF => "f",
        };
        f.write_str(name)
    }
}

impl FromStr for Family {
    type Err = ProbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "binomial" | "binom" => Ok(Family::Binomial),
            "normal" | "norm" | "gaussian" => Ok(Family::Normal),
            "t" | "student_t" | "student-t" => Ok(Family::StudentT),
            "chisq" | "chi_squared" | "chi-squared" | "chi2" => Ok(Family::ChiSquared),
            "f" | "fisher_f" | "fisher-f" => Ok(Family::FisherF),
            other => Err(ProbError::InvalidArgument(format!(
                "unknown distribution family '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Distribution facade
// ============================================================================

/// A fully parameterized distribution: the single entry point for
/// density, cumulative, quantile, and sampling across all families.
///
/// # Examples
/// ```
/// use u_prob::distributions::{Distribution, Univariate};
///
/// let skulls = Distribution::binomial(1.0 / 6.0, 20).unwrap();
/// assert!((skulls.density(4.0) - 0.2022).abs() < 1e-4);
/// assert!((skulls.cumulative(4.0) - 0.769).abs() < 1e-3);
/// assert_eq!(skulls.quantile(0.75).unwrap(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Binomial(Binomial),
    Normal(Normal),
    StudentT(StudentT),
    ChiSquared(ChiSquared),
    FisherF(FisherF),
}

impl Distribution {
    pub fn binomial(success_probability: f64, trials: u64) -> Result<Self> {
        Binomial::new(success_probability, trials).map(Self::Binomial)
    }

    pub fn normal(mean: f64, sd: f64) -> Result<Self> {
        Normal::new(mean, sd).map(Self::Normal)
    }

    pub fn student_t(df: f64) -> Result<Self> {
        StudentT::new(df).map(Self::StudentT)
    }

    pub fn chi_squared(df: f64) -> Result<Self> {
        ChiSquared::new(df).map(Self::ChiSquared)
    }

    pub fn fisher_f(df1: f64, df2: f64) -> Result<Self> {
        FisherF::new(df1, df2).map(Self::FisherF)
    }

    /// Builds a distribution from a family tag and its real-valued
    /// parameters, in the order given by [`Family::parameter_names`].
    ///
    /// The binomial trial count arrives as a real number here and must be
    /// a non-negative integer.
    ///
    /// # Errors
    /// [`ProbError::InvalidParameter`] on a wrong parameter count or any
    /// parameter constraint violation.
    ///
    /// # Examples
    /// ```
    /// use u_prob::distributions::{Distribution, Family};
    /// assert!(Distribution::from_parts(Family::Binomial, &[0.5, 10.0]).is_ok());
    /// assert!(Distribution::from_parts(Family::Binomial, &[0.5, 2.5]).is_err());
    /// assert!(Distribution::from_parts(Family::FisherF, &[3.0]).is_err());
    /// ```
    pub fn from_parts(family: Family, params: &[f64]) -> Result<Self> {
        let expected = family.parameter_names();
        if params.len() != expected.len() {
            return Err(ProbError::InvalidParameter(format!(
                "{family} takes {} parameter(s) ({}), got {}",
                expected.len(),
                expected.join(", "),
                params.len()
            )));
        }
        match family {
            Family::Binomial => Binomial::from_real(params[0], params[1]).map(Self::Binomial),
            Family::Normal => Self::normal(params[0], params[1]),
            Family::StudentT => Self::student_t(params[0]),
            Family::ChiSquared => Self::chi_squared(params[0]),
            Family::FisherF => Self::fisher_f(params[0], params[1]),
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Distribution::Binomial(_) => Family::Binomial,
            Distribution::Normal(_) => Family::Normal,
            Distribution::StudentT(_) => Family::StudentT,
            Distribution::ChiSquared(_) => Family::ChiSquared,
            Distribution::FisherF(_) => Family::FisherF,
        }
    }

    fn inner(&self) -> &dyn Univariate {
        match self {
            Distribution::Binomial(d) => d,
            Distribution::Normal(d) => d,
            Distribution::StudentT(d) => d,
            Distribution::ChiSquared(d) => d,
            Distribution::FisherF(d) => d,
        }
    }

    /// Lazily draws `n` independent samples using `rng`.
    ///
    /// Binomial draws are yielded as integral `f64` values. The iterator
    /// is finite and reports its exact length; drawing the same sequence
    /// again requires reseeding the generator.
    ///
    /// # Errors
    /// Propagates sampler construction failures as
    /// [`ProbError::InvalidParameter`]; validated descriptors never hit
    /// this in practice.
    ///
    /// # Examples
    /// ```
    /// use u_prob::distributions::Distribution;
    /// use u_prob::random::create_rng;
    ///
    /// let mut rng = create_rng(7);
    /// let dist = Distribution::normal(0.0, 1.0).unwrap();
    /// let draws: Vec<f64> = dist.sample(5, &mut rng).unwrap().collect();
    /// assert_eq!(draws.len(), 5);
    /// ```
    pub fn sample<'a, R: Rng + ?Sized>(&self, n: usize, rng: &'a mut R) -> Result<Samples<'a, R>> {
        let sampler = Sampler::for_distribution(self)?;
        tracing::debug!(distribution = %self, n, "drawing samples");
        Ok(Samples {
            sampler,
            rng,
            remaining: n,
        })
    }
}

impl Univariate for Distribution {
    fn density(&self, x: f64) -> f64 {
        self.inner().density(x)
    }

    fn cumulative(&self, x: f64) -> f64 {
        self.inner().cumulative(x)
    }

    fn quantile(&self, p: f64) -> Result<f64> {
        self.inner().quantile(p)
    }

    fn mean(&self) -> f64 {
        self.inner().mean()
    }

    fn variance(&self) -> f64 {
        self.inner().variance()
    }

    fn is_discrete(&self) -> bool {
        self.inner().is_discrete()
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Binomial(d) => {
                write!(f, "Binomial(p={}, n={})", d.success_probability(), d.trials())
            }
            Distribution::Normal(d) => write!(f, "Normal(mean={}, sd={})", d.mu(), d.sigma()),
            Distribution::StudentT(d) => write!(f, "StudentT(df={})", d.df()),
            Distribution::ChiSquared(d) => write!(f, "ChiSquared(df={})", d.df()),
            Distribution::FisherF(d) => write!(f, "F(df1={}, df2={})", d.df1(), d.df2()),
        }
    }
}

macro_rules! impl_from_family {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Distribution {
            fn from(d: $ty) -> Self {
                Distribution::$ty(d)
            }
        })*
    };
}

impl_from_family!(Binomial, Normal, StudentT, ChiSquared, FisherF);

// ============================================================================
// Sampling
// ============================================================================

#[derive(Debug, Clone)]
enum Sampler {
    Binomial(rand_distr::Binomial),
    Normal(rand_distr::Normal<f64>),
    StudentT(rand_distr::StudentT<f64>),
    ChiSquared(rand_distr::ChiSquared<f64>),
    FisherF(rand_distr::FisherF<f64>),
}

impl Sampler {
    fn for_distribution(dist: &Distribution) -> Result<Self> {
        Ok(match dist {
            Distribution::Binomial(d) => Sampler::Binomial(
                rand_distr::Binomial::new(d.trials(), d.success_probability())
                    .map_err(sampler_error)?,
            ),
            Distribution::Normal(d) => {
                Sampler::Normal(rand_distr::Normal::new(d.mu(), d.sigma()).map_err(sampler_error)?)
            }
            Distribution::StudentT(d) => {
                Sampler::StudentT(rand_distr::StudentT::new(d.df()).map_err(sampler_error)?)
            }
            Distribution::ChiSquared(d) => {
                Sampler::ChiSquared(rand_distr::ChiSquared::new(d.df()).map_err(sampler_error)?)
            }
            Distribution::FisherF(d) => Sampler::FisherF(
                rand_distr::FisherF::new(d.df1(), d.df2()).map_err(sampler_error)?,
            ),
        })
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Binomial(d) => d.sample(rng) as f64,
            Sampler::Normal(d) => d.sample(rng),
            Sampler::StudentT(d) => d.sample(rng),
            Sampler::ChiSquared(d) => d.sample(rng),
            Sampler::FisherF(d) => d.sample(rng),
        }
    }
}

pub(crate) fn sampler_error<E: fmt::Display>(e: E) -> ProbError {
    ProbError::InvalidParameter(e.to_string())
}

/// Lazy, finite iterator of independent draws, created by
/// [`Distribution::sample`].
pub struct Samples<'a, R: ?Sized> {
    sampler: Sampler,
    rng: &'a mut R,
    remaining: usize,
}

impl<R: Rng + ?Sized> Iterator for Samples<'_, R> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.sampler.draw(&mut *self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng + ?Sized> ExactSizeIterator for Samples<'_, R> {}

impl<R: ?Sized> fmt::Debug for Samples<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Samples")
            .field("sampler", &self.sampler)
            .field("remaining", &self.remaining)
            .finish()
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn check_probability(p: f64) -> Result<()> {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(ProbError::InvalidArgument(format!(
            "probability must be in [0, 1], got {p}"
        )));
    }
    Ok(())
}

pub(crate) fn check_degrees_of_freedom(name: &str, df: f64) -> Result<()> {
    if !df.is_finite() || df <= 0.0 {
        return Err(ProbError::InvalidParameter(format!(
            "{name} must be positive and finite, got {df}"
        )));
    }
    Ok(())
}

/// Numerically inverts a continuous, non-decreasing CDF.
///
/// Brackets the root by doubling outward from `guess`, then bisects until
/// the bracket collapses to adjacent floats. `lower_bound` is the left end
/// of the support (`0.0` or `-∞`). Requires `0 < p < 1`.
pub(crate) fn invert_cdf<F: Fn(f64) -> f64>(cdf: F, p: f64, lower_bound: f64, guess: f64) -> f64 {
    const MAX_BISECTIONS: usize = 2_000;
    const LIMIT: f64 = 1e300;

    let (mut lo, mut hi) = if lower_bound.is_finite() {
        let mut hi = guess.max(lower_bound + 1.0);
        let mut lo = lower_bound;
        while cdf(hi) < p {
            lo = hi;
            hi *= 2.0;
            if hi > LIMIT {
                return f64::INFINITY;
            }
        }
        (lo, hi)
    } else {
        let mut step = 1.0;
        let mut lo = guess - step;
        while cdf(lo) >= p {
            lo -= step;
            step *= 2.0;
            if lo < -LIMIT {
                return f64::NEG_INFINITY;
            }
        }
        step = 1.0;
        let mut hi = guess + step;
        while cdf(hi) < p {
            hi += step;
            step *= 2.0;
            if hi > LIMIT {
                return f64::INFINITY;
            }
        }
        (lo, hi)
    };
    tracing::trace!(lo, hi, p, "bracketed quantile");

    let mut iterations = 0;
    while iterations < MAX_BISECTIONS {
        let mid = lo + (hi - lo) / 2.0;
        if mid <= lo || mid >= hi {
            break;
        }
        if cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        iterations += 1;
    }
    tracing::trace!(iterations, quantile = hi, "bisection converged");
    hi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_family_parse() {
        assert_eq!("binomial".parse::<Family>().unwrap(), Family::Binomial);
        assert_eq!("Normal".parse::<Family>().unwrap(), Family::Normal);
        assert_eq!("t".parse::<Family>().unwrap(), Family::StudentT);
        assert_eq!("chisq".parse::<Family>().unwrap(), Family::ChiSquared);
        assert_eq!("F".parse::<Family>().unwrap(), Family::FisherF);
        assert!(matches!(
            "cauchy".parse::<Family>(),
            Err(ProbError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_family_display_roundtrip() {
        for family in [
            Family::Binomial,
            Family::Normal,
            Family::StudentT,
            Family::ChiSquared,
            Family::FisherF,
        ] {
            assert_eq!(family.to_string().parse::<Family>().unwrap(), family);
        }
    }

    #[test]
    fn test_from_parts_binomial_trials() {
        let d = Distribution::from_parts(Family::Binomial, &[1.0 / 6.0, 20.0]).unwrap();
        assert_eq!(d.family(), Family::Binomial);
        for bad in [-1.0, 2.5, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    Distribution::from_parts(Family::Binomial, &[0.5, bad]),
                    Err(ProbError::InvalidParameter(_))
                ),
                "trials={bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_parts_arity() {
        assert!(Distribution::from_parts(Family::Normal, &[0.0]).is_err());
        assert!(Distribution::from_parts(Family::StudentT, &[3.0, 1.0]).is_err());
        let f = Distribution::from_parts(Family::FisherF, &[3.0, 5.0]).unwrap();
        assert_eq!(f.family(), Family::FisherF);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            Distribution::binomial(1.5, 10),
            Err(ProbError::InvalidParameter(_))
        ));
        assert!(Distribution::binomial(-0.1, 10).is_err());
        assert!(Distribution::normal(0.0, 0.0).is_err());
        assert!(Distribution::student_t(0.0).is_err());
        assert!(Distribution::chi_squared(-3.0).is_err());
        assert!(Distribution::fisher_f(3.0, 0.0).is_err());
    }

    #[test]
    fn test_quantile_invalid_argument() {
        let dists = [
            Distribution::binomial(0.3, 10).unwrap(),
            Distribution::normal(0.0, 1.0).unwrap(),
            Distribution::student_t(3.0).unwrap(),
            Distribution::chi_squared(3.0).unwrap(),
            Distribution::fisher_f(3.0, 5.0).unwrap(),
        ];
        for d in &dists {
            for p in [-0.01, 1.01, f64::NAN] {
                assert!(
                    matches!(d.quantile(p), Err(ProbError::InvalidArgument(_))),
                    "{d} accepted p={p}"
                );
            }
        }
    }

    #[test]
    fn test_is_discrete() {
        assert!(Distribution::binomial(0.5, 4).unwrap().is_discrete());
        assert!(!Distribution::normal(0.0, 1.0).unwrap().is_discrete());
        assert!(!Distribution::fisher_f(3.0, 5.0).unwrap().is_discrete());
    }

    #[test]
    fn test_display() {
        let d = Distribution::binomial(0.5, 20).unwrap();
        assert_eq!(d.to_string(), "Binomial(p=0.5, n=20)");
        let d = Distribution::fisher_f(3.0, 5.0).unwrap();
        assert_eq!(d.to_string(), "F(df1=3, df2=5)");
    }

    #[test]
    fn test_sample_exact_length() {
        let mut rng = create_rng(1);
        let dists = [
            Distribution::binomial(1.0 / 6.0, 20).unwrap(),
            Distribution::normal(5.0, 2.0).unwrap(),
            Distribution::student_t(3.0).unwrap(),
            Distribution::chi_squared(3.0).unwrap(),
            Distribution::fisher_f(3.0, 20.0).unwrap(),
        ];
        for d in &dists {
            let it = d.sample(250, &mut rng).unwrap();
            assert_eq!(it.len(), 250);
            assert_eq!(it.count(), 250);
        }
        let d = Distribution::normal(0.0, 1.0).unwrap();
        assert_eq!(d.sample(0, &mut rng).unwrap().count(), 0);
    }

    #[test]
    fn test_sample_deterministic_given_seed() {
        let d = Distribution::chi_squared(3.0).unwrap();
        let a: Vec<f64> = d.sample(20, &mut create_rng(42)).unwrap().collect();
        let b: Vec<f64> = d.sample(20, &mut create_rng(42)).unwrap().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_binomial_samples_in_support() {
        let d = Distribution::binomial(1.0 / 6.0, 20).unwrap();
        let mut rng = create_rng(3);
        for x in d.sample(1_000, &mut rng).unwrap() {
            assert!((0.0..=20.0).contains(&x));
            assert_eq!(x, x.floor());
        }
    }

    #[test]
    fn test_law_of_large_numbers_binomial() {
        let d = Distribution::binomial(1.0 / 6.0, 20).unwrap();
        let mut rng = create_rng(2024);
        let n = 100_000;
        let total: f64 = d.sample(n, &mut rng).unwrap().sum();
        let mean = total / n as f64;
        assert!(
            (mean - 20.0 / 6.0).abs() < 0.03,
            "empirical mean {mean} too far from 3.33"
        );
    }

    #[test]
    fn test_probability_between() {
        let d = Distribution::normal(0.0, 1.0).unwrap();
        let p = d.probability_between(-1.0, 1.0).unwrap();
        assert!((p - 0.6826894921370859).abs() < 1e-10);
        assert!(d.probability_between(1.0, -1.0).is_err());

        let b = Distribution::binomial(0.5, 10).unwrap();
        // P(3 < X ≤ 5) = pmf(4) + pmf(5)
        let expected = b.density(4.0) + b.density(5.0);
        assert!((b.probability_between(3.0, 5.0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invert_cdf_exponential() {
        // F(x) = 1 − e^{−x}, F⁻¹(p) = −ln(1 − p)
        let cdf = |x: f64| if x <= 0.0 { 0.0 } else { 1.0 - (-x).exp() };
        for &p in &[0.01, 0.5, 0.99] {
            let q = invert_cdf(cdf, p, 0.0, 1.0);
            assert!((q + (1.0 - p).ln()).abs() < 1e-10);
        }
    }
}
