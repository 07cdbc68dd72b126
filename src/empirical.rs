//! Empirical summaries of simulated data.
//!
//! - [`EmpiricalSummary`]: a sequence of success/failure outcomes with its
//!   running proportion of successes, the long-run frequency picture of
//!   probability.
//! - [`Histogram`]: equal-width binning of real-valued draws, normalized to
//!   a density so it can be laid over a model [`Univariate::density`].

use serde::Serialize;

use crate::distributions::Univariate;
use crate::error::{ProbError, Result};

// ============================================================================
// Running proportion
// ============================================================================

/// Ordered success/failure outcomes with a running count and running
/// proportion of successes.
///
/// As the number of outcomes grows, the running proportion settles near
/// the underlying success probability.
///
/// # Examples
/// ```
/// use u_prob::empirical::EmpiricalSummary;
/// let summary = EmpiricalSummary::from_outcomes([true, false, true, true]);
/// assert_eq!(summary.successes(), 3);
/// assert_eq!(summary.running_proportions(), &[1.0, 0.5, 2.0 / 3.0, 0.75]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmpiricalSummary {
    samples: Vec<bool>,
    #[serde(rename = "running_proportions")]
    running: Vec<f64>,
    successes: u64,
}

impl EmpiricalSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_outcomes<I: IntoIterator<Item = bool>>(outcomes: I) -> Self {
        let mut summary = Self::new();
        summary.extend(outcomes);
        summary
    }

    /// Records one outcome; `true` is a success.
    pub fn push(&mut self, success: bool) {
        self.samples.push(success);
        if success {
            self.successes += 1;
        }
        self.running
            .push(self.successes as f64 / self.samples.len() as f64);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    /// Overall proportion of successes, `None` before the first outcome.
    pub fn proportion(&self) -> Option<f64> {
        self.running.last().copied()
    }

    /// Entry `i` is the proportion of successes among the first `i + 1`
    /// outcomes.
    pub fn running_proportions(&self) -> &[f64] {
        &self.running
    }

    pub fn samples(&self) -> &[bool] {
        &self.samples
    }
}

impl Extend<bool> for EmpiricalSummary {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for outcome in iter {
            self.push(outcome);
        }
    }
}

impl FromIterator<bool> for EmpiricalSummary {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_outcomes(iter)
    }
}

// ============================================================================
// Histogram
// ============================================================================

/// Equal-width histogram over `[lo, hi)`.
///
/// Values below `lo` land in the underflow count, values at or above `hi`
/// (and NaN) in the overflow count. Densities are normalized by the total
/// number of values seen, flows included, so they are comparable with a
/// model density even when part of the mass lies outside the range.
///
/// # Examples
/// ```
/// use u_prob::empirical::Histogram;
/// let mut h = Histogram::new(0.0, 4.0, 4).unwrap();
/// h.extend([0.5, 1.5, 1.7, 3.9, 7.0]);
/// assert_eq!(h.counts(), &[1, 2, 0, 1]);
/// assert_eq!(h.outside(), 1);
/// assert_eq!(h.bin_centers(), vec![0.5, 1.5, 2.5, 3.5]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    lo: f64,
    hi: f64,
    width: f64,
    counts: Vec<u64>,
    underflow: u64,
    overflow: u64,
}

impl Histogram {
    /// # Errors
    /// [`ProbError::InvalidParameter`] if `bins == 0`, either bound is not
    /// finite, or `lo >= hi`.
    pub fn new(lo: f64, hi: f64, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(ProbError::InvalidParameter(
                "histogram needs at least one bin".into(),
            ));
        }
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(ProbError::InvalidParameter(format!(
                "histogram range must be finite with lo < hi, got [{lo}, {hi})"
            )));
        }
        Ok(Self {
            lo,
            hi,
            width: (hi - lo) / bins as f64,
            counts: vec![0; bins],
            underflow: 0,
            overflow: 0,
        })
    }

    pub fn add(&mut self, x: f64) {
        match self.bin_index(x) {
            Some(i) => self.counts[i] += 1,
            None if x < self.lo => self.underflow += 1,
            None => self.overflow += 1,
        }
    }

    fn bin_index(&self, x: f64) -> Option<usize> {
        if x.is_nan() || x < self.lo || x >= self.hi {
            return None;
        }
        let i = ((x - self.lo) / self.width) as usize;
        // x just below hi can round up to the bin count
        Some(i.min(self.counts.len() - 1))
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.width
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of values that fell outside `[lo, hi)`.
    pub fn outside(&self) -> u64 {
        self.underflow + self.overflow
    }

    /// Number of values added, inside or outside the range.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.outside()
    }

    /// Left edge of bin `i`; `i == bins()` gives `hi`.
    fn edge(&self, i: usize) -> f64 {
        if i == self.counts.len() {
            self.hi
        } else {
            self.lo + i as f64 * self.width
        }
    }

    pub fn bin_centers(&self) -> Vec<f64> {
        (0..self.bins())
            .map(|i| self.lo + (i as f64 + 0.5) * self.width)
            .collect()
    }

    /// count / (total × width) per bin; all zeros while empty.
    pub fn densities(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.bins()];
        }
        let scale = total as f64 * self.width;
        self.counts.iter().map(|&c| c as f64 / scale).collect()
    }

    /// Largest absolute gap between the empirical density and the model's
    /// average density over each bin, (F(right) − F(left)) / width.
    ///
    /// The bin average stays finite where the density itself is unbounded,
    /// e.g. ChiSquared(1) at zero.
    pub fn max_density_error<D: Univariate + ?Sized>(&self, model: &D) -> f64 {
        let empirical = self.densities();
        empirical
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let mass = model.cumulative(self.edge(i + 1)) - model.cumulative(self.edge(i));
                (d - mass / self.width).abs()
            })
            .fold(0.0, f64::max)
    }
}

impl Extend<f64> for Histogram {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
