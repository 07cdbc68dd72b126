use super::{check_probability, Univariate};
use crate::error::{ProbError, Result};
use crate::special::{erf, inverse_normal_cdf, standard_normal_cdf, standard_normal_pdf};

/// Normal (Gaussian) distribution N(μ, σ).
///
/// # Mathematical Definition
/// - PDF: f(x) = (1/(σ√(2π))) exp(−(x−μ)²/(2σ²))
/// - CDF: Φ((x−μ)/σ)
/// - Mean: μ
/// - Variance: σ²
///
/// The density is not a probability: a narrow normal has density well
/// above 1 near its mean.
///
/// ```
/// use u_prob::distributions::{Normal, Univariate};
/// let narrow = Normal::new(1.0, 0.1).unwrap();
/// assert!((narrow.density(1.0) - 3.989422804014327).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates a normal distribution with mean `mu` and standard deviation `sigma`.
    ///
    /// # Errors
    /// Returns `Err` if `sigma <= 0` or either parameter is not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(ProbError::InvalidParameter(format!(
                "Normal requires finite mean and sd > 0, got mean={mu}, sd={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    /// The standard normal N(0, 1).
    pub fn standard() -> Self {
        Self {
            mu: 0.0,
            sigma: 1.0,
        }
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Probability that an observation falls within `k` standard
    /// deviations of the mean, P(|X − μ| ≤ kσ) = erf(k/√2).
    ///
    /// Independent of μ and σ: about 68.3%, 95.4% and 99.7% for
    /// k = 1, 2, 3.
    ///
    /// # Errors
    /// Returns `Err` if `k` is negative or NaN.
    ///
    /// ```
    /// use u_prob::distributions::Normal;
    /// let n = Normal::new(100.0, 15.0).unwrap();
    /// assert!((n.within_sd(1.0).unwrap() - 0.683).abs() < 1e-3);
    /// assert!((n.within_sd(2.0).unwrap() - 0.954).abs() < 1e-3);
    /// ```
    pub fn within_sd(&self, k: f64) -> Result<f64> {
        if k.is_nan() || k < 0.0 {
            return Err(ProbError::InvalidArgument(format!(
                "number of standard deviations must be >= 0, got {k}"
            )));
        }
        Ok(erf(k / std::f64::consts::SQRT_2))
    }

    fn standardize(&self, x: f64) -> f64 {
        (x - self.mu) / self.sigma
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::standard()
    }
}

impl Univariate for Normal {
    fn density(&self, x: f64) -> f64 {
        standard_normal_pdf(self.standardize(x)) / self.sigma
    }

    fn cumulative(&self, x: f64) -> f64 {
        standard_normal_cdf(self.standardize(x)).clamp(0.0, 1.0)
    }

    /// μ + σ Φ⁻¹(p); `−∞` at p = 0 and `+∞` at p = 1.
    fn quantile(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        Ok(self.mu + self.sigma * inverse_normal_cdf(p))
    }

    fn mean(&self) -> f64 {
        self.mu
    }

    fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    fn std_dev(&self) -> f64 {
        self.sigma
    }
}
