use super::{check_degrees_of_freedom, check_probability, invert_cdf, Univariate};
use crate::error::Result;
use crate::special::{inverse_normal_cdf, ln_gamma, regularized_incomplete_beta};

/// Student's t-distribution with `ν` degrees of freedom.
///
/// Bell-shaped like the standard normal but with heavier tails; it
/// approaches N(0, 1) as ν grows.
///
/// # Mathematical Definition
/// - PDF: Γ((ν+1)/2) / (√(νπ) Γ(ν/2)) · (1 + t²/ν)^(−(ν+1)/2)
/// - CDF: 1 − I_x(ν/2, 1/2)/2 for t ≥ 0, with x = ν/(ν + t²)
/// - Mean: 0 for ν > 1
/// - Variance: ν/(ν−2) for ν > 2, ∞ for 1 < ν ≤ 2
#[derive(Debug, Clone, PartialEq)]
pub struct StudentT {
    df: f64,
}

impl StudentT {
    /// # Errors
    /// Returns `Err` if `df` is not positive and finite.
    pub fn new(df: f64) -> Result<Self> {
        check_degrees_of_freedom("StudentT degrees of freedom", df)?;
        Ok(Self { df })
    }

    pub fn df(&self) -> f64 {
        self.df
    }
}

impl Univariate for StudentT {
    fn density(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        let half = self.df / 2.0;
        let ln_pdf = ln_gamma(half + 0.5)
            - 0.5 * (self.df * std::f64::consts::PI).ln()
            - ln_gamma(half)
            - (half + 0.5) * (t * t / self.df).ln_1p();
        ln_pdf.exp()
    }

    fn cumulative(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        if t == 0.0 {
            return 0.5;
        }
        let x = self.df / (self.df + t * t);
        let tail = 0.5 * regularized_incomplete_beta(x, self.df / 2.0, 0.5);
        let cdf = if t > 0.0 { 1.0 - tail } else { tail };
        cdf.clamp(0.0, 1.0)
    }

    /// Inverse CDF by bracketing and bisection, seeded with the normal quantile.
    fn quantile(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        if p == 0.0 {
            return Ok(f64::NEG_INFINITY);
        }
        if p == 1.0 {
            return Ok(f64::INFINITY);
        }
        if p == 0.5 {
            return Ok(0.0);
        }
        let guess = inverse_normal_cdf(p);
        let q = invert_cdf(|t| self.cumulative(t), p, f64::NEG_INFINITY, guess);
        tracing::debug!(df = self.df, p, quantile = q, "t quantile");
        Ok(q)
    }

    fn mean(&self) -> f64 {
        if self.df > 1.0 {
            0.0
        } else {
            f64::NAN
        }
    }

    fn variance(&self) -> f64 {
        if self.df > 2.0 {
            self.df / (self.df - 2.0)
        } else if self.df > 1.0 {
            f64::INFINITY
        } else {
            f64::NAN
        }
    }
}
