use super::{check_degrees_of_freedom, check_probability, invert_cdf, Univariate};
use crate::error::Result;
use crate::special::{ln_beta, regularized_incomplete_beta};

/// F-distribution with `d₁` and `d₂` degrees of freedom: the ratio of two
/// independent scaled chi-squared variables, (χ²_{d₁}/d₁) / (χ²_{d₂}/d₂).
///
/// # Mathematical Definition
/// - PDF: √((d₁x)^{d₁} d₂^{d₂} / (d₁x + d₂)^{d₁+d₂}) / (x B(d₁/2, d₂/2))
/// - CDF: I_y(d₁/2, d₂/2), with y = d₁x / (d₁x + d₂)
/// - Mean: d₂/(d₂−2) for d₂ > 2
/// - Variance: 2d₂²(d₁+d₂−2) / (d₁(d₂−2)²(d₂−4)) for d₂ > 4
#[derive(Debug, Clone, PartialEq)]
pub struct FisherF {
    d1: f64,
    d2: f64,
}

impl FisherF {
    /// # Errors
    /// Returns `Err` if either degree of freedom is not positive and finite.
    pub fn new(d1: f64, d2: f64) -> Result<Self> {
        check_degrees_of_freedom("F numerator degrees of freedom", d1)?;
        check_degrees_of_freedom("F denominator degrees of freedom", d2)?;
        Ok(Self { d1, d2 })
    }

    pub fn df1(&self) -> f64 {
        self.d1
    }

    pub fn df2(&self) -> f64 {
        self.d2
    }
}

impl Univariate for FisherF {
    fn density(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x < 0.0 || x == f64::INFINITY {
            return 0.0;
        }
        let (d1, d2) = (self.d1, self.d2);
        if x == 0.0 {
            return match d1.partial_cmp(&2.0) {
                Some(std::cmp::Ordering::Less) => f64::INFINITY,
                Some(std::cmp::Ordering::Equal) => 1.0,
                _ => 0.0,
            };
        }
        let ln_pdf = 0.5 * (d1 * (d1 * x).ln() + d2 * d2.ln() - (d1 + d2) * (d1 * x + d2).ln())
            - x.ln()
            - ln_beta(d1 / 2.0, d2 / 2.0);
        ln_pdf.exp()
    }

    fn cumulative(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        if x <= 0.0 {
            return 0.0;
        }
        if x == f64::INFINITY {
            return 1.0;
        }
        let y = self.d1 * x / (self.d1 * x + self.d2);
        regularized_incomplete_beta(y, self.d1 / 2.0, self.d2 / 2.0).clamp(0.0, 1.0)
    }

    fn quantile(&self, p: f64) -> Result<f64> {
        check_probability(p)?;
        if p == 0.0 {
            return Ok(0.0);
        }
        if p == 1.0 {
            return Ok(f64::INFINITY);
        }
        let q = invert_cdf(|x| self.cumulative(x), p, 0.0, 1.0);
        tracing::debug!(df1 = self.d1, df2 = self.d2, p, quantile = q, "F quantile");
        Ok(q)
    }

    fn mean(&self) -> f64 {
        if self.d2 > 2.0 {
            self.d2 / (self.d2 - 2.0)
        } else {
            f64::NAN
        }
    }

    fn variance(&self) -> f64 {
        let (d1, d2) = (self.d1, self.d2);
        if d2 > 4.0 {
            2.0 * d2 * d2 * (d1 + d2 - 2.0) / (d1 * (d2 - 2.0).powi(2) * (d2 - 4.0))
        } else {
            f64::NAN
        }
    }
}
