//! # u-prob
//!
//! Probability distributions for the U-Engine ecosystem.
//!
//! One facade, [`Distribution`], covers the five families that carry most
//! of introductory inferential statistics (binomial, normal, Student's t,
//! chi-squared and F) with the same four operations: density,
//! cumulative probability, quantile, and seeded sampling.
//!
//! ## Modules
//!
//! - [`distributions`]: per-family types, the [`Univariate`] trait and the
//!   [`Distribution`] facade
//! - [`special`]: ln Γ, incomplete beta/gamma, erf, Φ and Φ⁻¹
//! - [`random`]: seeded RNGs, coin flips, weighted draws
//! - [`stats`]: compensated sums and streaming moments
//! - [`empirical`]: running proportions and density histograms
//! - [`events`]: finite sample spaces and the rules of probability
//! - [`relations`]: t, chi-squared and F variates built from normals
//!
//! ## Design Philosophy
//!
//! - **Validate at construction**: a [`Distribution`] that exists has legal
//!   parameters, so density and cumulative never fail
//! - **Caller-owned randomness**: every sampler takes `&mut impl Rng`
//! - **Property-based testing**: mathematical invariants verified via proptest
//!
//! ```
//! use u_prob::{Distribution, Univariate};
//!
//! let iq = Distribution::normal(100.0, 15.0).unwrap();
//! assert!((iq.cumulative(130.0) - 0.97725).abs() < 1e-5);
//! assert!((iq.quantile(0.5).unwrap() - 100.0).abs() < 1e-9);
//! ```

pub mod distributions;
pub mod empirical;
pub mod error;
pub mod events;
pub mod random;
pub mod relations;
pub mod special;
pub mod stats;

pub use distributions::{Distribution, Family, Univariate};
pub use error::{ProbError, Result};
