//! Derived variates built from standard normal draws.
//!
//! The t, chi-squared and F families all arise from normals:
//!
//! - χ²_k: the sum of k squared independent standard normals
//! - t_k: Z / √(χ²_k / k), with Z independent of the chi-square
//! - F_{a,b}: (χ²_a / a) / (χ²_b / b), two independent chi-squares
//!
//! Simulating them this way and binning the results into a
//! [`Histogram`](crate::empirical::Histogram) should reproduce the
//! analytical densities of the corresponding
//! [`Distribution`](crate::distributions::Distribution).

use rand::Rng;
use rand_distr::{ChiSquared, Distribution as RandDistribution, StandardNormal};

use crate::distributions::sampler_error;
use crate::error::{ProbError, Result};

fn check_df(name: &str, df: usize) -> Result<()> {
    if df == 0 {
        return Err(ProbError::InvalidParameter(format!(
            "{name} must be at least 1"
        )));
    }
    Ok(())
}

fn sum_of_squared_normals<R: Rng + ?Sized>(df: usize, rng: &mut R) -> f64 {
    (0..df)
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut *rng);
            z * z
        })
        .sum()
}

/// `n` draws, each the sum of `df` squared standard normals.
///
/// # Errors
/// [`ProbError::InvalidParameter`] if `df == 0`.
///
/// # Examples
/// ```
/// use u_prob::random::create_rng;
/// use u_prob::relations::chi_squared_from_normals;
/// let mut rng = create_rng(1);
/// let draws = chi_squared_from_normals(3, 100, &mut rng).unwrap();
/// assert_eq!(draws.len(), 100);
/// assert!(draws.iter().all(|&x| x >= 0.0));
/// ```
pub fn chi_squared_from_normals<R: Rng + ?Sized>(
    df: usize,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    check_df("chi-squared degrees of freedom", df)?;
    tracing::debug!(df, n, "chi-squared from normals");
    Ok((0..n).map(|_| sum_of_squared_normals(df, &mut *rng)).collect())
}

/// `n` draws of Z / √(χ²_df / df).
///
/// # Errors
/// [`ProbError::InvalidParameter`] if `df == 0`.
pub fn t_from_normals<R: Rng + ?Sized>(df: usize, n: usize, rng: &mut R) -> Result<Vec<f64>> {
    check_df("t degrees of freedom", df)?;
    tracing::debug!(df, n, "t from normals");
    let k = df as f64;
    Ok((0..n)
        .map(|_| {
            let z: f64 = StandardNormal.sample(&mut *rng);
            let chi = sum_of_squared_normals(df, &mut *rng);
            z / (chi / k).sqrt()
        })
        .collect())
}

/// `n` draws of (χ²_df1 / df1) / (χ²_df2 / df2).
///
/// The numerator comes from squared normals and the denominator from the
/// gamma-based chi-squared sampler, so the two are independent.
///
/// # Errors
/// [`ProbError::InvalidParameter`] if either degree of freedom is 0.
pub fn f_from_chi_squared<R: Rng + ?Sized>(
    df1: usize,
    df2: usize,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    check_df("F numerator degrees of freedom", df1)?;
    check_df("F denominator degrees of freedom", df2)?;
    tracing::debug!(df1, df2, n, "F from chi-squares");
    let (a, b) = (df1 as f64, df2 as f64);
    let denominator = ChiSquared::new(b).map_err(sampler_error)?;
    Ok((0..n)
        .map(|_| {
            let num = sum_of_squared_normals(df1, &mut *rng) / a;
            let den = denominator.sample(&mut *rng) / b;
            num / den
        })
        .collect())
}
