//! Descriptive statistics for simulated samples.
//!
//! Used to set sample moments against the analytical moments of a
//! [`Distribution`](crate::distributions::Distribution): the sample mean
//! of many Binomial(1/6, 20) draws should settle near 20/6, and so on.
//!
//! # Algorithms
//!
//! - **Sum/Mean**: Neumaier compensated summation, error O(ε) independent
//!   of n. Reference: Neumaier (1974), *ZAMM* 54(1).
//! - **Variance and higher moments**: one-pass Welford updates extended to
//!   the third and fourth central moments. References: Welford (1962),
//!   *Technometrics* 4(3); Pébay (2008), SAND2008-6212.

/// Compensated sum of `data`.
///
/// Keeps the low-order bits that plain `+` drops, including the case
/// where the addend is larger than the running total.
///
/// # Examples
/// ```
/// use u_prob::stats::kahan_sum;
/// let v = [1e16, 1.0, -1e16];
/// assert_eq!(kahan_sum(&v), 1.0);
/// ```
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut carry = 0.0_f64;
    for &x in data {
        let next = sum + x;
        carry += if sum.abs() >= x.abs() {
            (sum - next) + x
        } else {
            (x - next) + sum
        };
        sum = next;
    }
    sum + carry
}

/// Arithmetic mean, or `None` if `data` is empty or has a NaN/Inf.
///
/// # Examples
/// ```
/// use u_prob::stats::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Sample variance (denominator `n − 1`).
///
/// Returns `None` if fewer than two values are given or any is NaN/Inf.
///
/// # Examples
/// ```
/// use u_prob::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 32.0 / 7.0).abs() < 1e-12);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    data.iter().copied().collect::<WelfordAccumulator>().sample_variance()
}

/// Sample standard deviation, `sqrt(variance(data))`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

// ---------------------------------------------------------------------------
// Streaming moments
// ---------------------------------------------------------------------------

/// One-pass accumulator for count, mean, variance, skewness and excess
/// kurtosis.
///
/// Holds the central moment sums M₂, M₃, M₄. Can be fed one draw at a time
/// from a [`Samples`](crate::distributions::Samples) iterator without
/// buffering.
///
/// # Examples
/// ```
/// use u_prob::stats::WelfordAccumulator;
/// let acc: WelfordAccumulator = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
///     .into_iter()
///     .collect();
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WelfordAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation.
    pub fn update(&mut self, value: f64) {
        let prev = self.count as f64;
        self.count += 1;
        if self.count == 1 {
            // avoids squaring a huge first delta
            self.mean = value;
            return;
        }
        let n = self.count as f64;
        let delta = value - self.mean;
        let dn = delta / n;
        let dn2 = dn * dn;
        let term = delta * dn * prev;

        // M₄ then M₃ then M₂: each reads the previous lower moments
        self.m4 += term * dn2 * (n * n - 3.0 * n + 3.0) + 6.0 * dn2 * self.m2 - 4.0 * dn * self.m3;
        self.m3 += term * dn * (n - 2.0) - 3.0 * dn * self.m2;
        self.m2 += term;
        self.mean += dn;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Variance with denominator `n − 1`; `None` below two observations.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Variance with denominator `n`; `None` when empty.
    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    /// Moment skewness g₁ = √n M₃ / M₂^{3/2}.
    ///
    /// `None` below three observations or when every value is equal.
    pub fn skewness(&self) -> Option<f64> {
        if self.count < 3 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        Some(n.sqrt() * self.m3 / self.m2.powf(1.5))
    }

    /// Moment excess kurtosis g₂ = n M₄ / M₂² − 3; zero for a normal.
    ///
    /// `None` below four observations or when every value is equal.
    pub fn kurtosis(&self) -> Option<f64> {
        if self.count < 4 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        Some(n * self.m4 / (self.m2 * self.m2) - 3.0)
    }
}

impl Extend<f64> for WelfordAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.update(x);
        }
    }
}

impl FromIterator<f64> for WelfordAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
