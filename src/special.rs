//! Special mathematical functions.
//!
//! Numerical building blocks behind the distribution types: log-gamma,
//! log-beta, the regularized incomplete beta and gamma functions, the error
//! function, and the standard normal pdf/cdf/quantile.
//!
//! These functions never fail. Inputs outside their domain produce `NaN`
//! (or the appropriate limit), and validation happens one layer up in
//! [`crate::distributions`].

/// 1/√(2π) ≈ 0.3989422804014327
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

const MAX_ITER: usize = 500;
const EPS: f64 = 1e-15;
const TINY: f64 = 1e-300;

// ============================================================================
// Gamma and Beta
// ============================================================================

/// Lanczos approximation of ln Γ(x).
///
/// Uses the reflection formula `Γ(x)Γ(1−x) = π / sin(πx)` for `x < 0.5`.
///
/// Reference: Lanczos (1964), "A Precision Approximation of the Gamma
/// Function", *SIAM Journal on Numerical Analysis* 1(1).
///
/// # Accuracy
/// Relative error around 1e-15 for x > 0.
///
/// # Examples
/// ```
/// use u_prob::special::ln_gamma;
/// // Γ(5) = 24
/// assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-12);
/// ```
pub fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const LANCZOS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;

    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 && x == x.floor() {
        return f64::INFINITY;
    }
    if x < 0.5 {
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin().abs()).ln() - ln_gamma(1.0 - x);
    }

    let z = x - 1.0;
    let series = LANCZOS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS[0], |acc, (i, &c)| acc + c / (z + i as f64 + 1.0));

    let t = z + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (z + 0.5) * t.ln() - t + series.ln()
}

/// Log of the Beta function: `ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a+b)`.
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Log of the binomial coefficient, `ln C(n, k)`.
///
/// Returns `-∞` when `k > n` (the coefficient is zero).
///
/// # Examples
/// ```
/// use u_prob::special::ln_choose;
/// assert!((ln_choose(20, 4) - 4845.0_f64.ln()).abs() < 1e-10);
/// ```
pub fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0 || k == n {
        return 0.0;
    }
    let nf = n as f64;
    let kf = k as f64;
    ln_gamma(nf + 1.0) - ln_gamma(kf + 1.0) - ln_gamma(nf - kf + 1.0)
}

// ============================================================================
// Regularized Incomplete Beta
// ============================================================================

/// Regularized incomplete beta function I_x(a, b).
///
/// # Algorithm
/// Continued fraction (modified Lentz) evaluated on whichever side of the
/// mean converges fastest, using `I_x(a,b) = 1 − I_{1−x}(b,a)`.
///
/// Reference: Press et al. (2007), *Numerical Recipes*, 3rd ed., §6.4.
///
/// # Examples
/// ```
/// use u_prob::special::regularized_incomplete_beta;
/// assert_eq!(regularized_incomplete_beta(0.0, 2.0, 3.0), 0.0);
/// assert_eq!(regularized_incomplete_beta(1.0, 2.0, 3.0), 1.0);
/// assert!((regularized_incomplete_beta(0.5, 1.0, 1.0) - 0.5).abs() < 1e-12);
/// ```
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x.is_nan() || a.is_nan() || b.is_nan() || a <= 0.0 || b <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(1.0 - x, b, a);
    }

    let ln_front = a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b);
    ln_front.exp() * beta_continued_fraction(x, a, b) / a
}

fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let clamp = |v: f64| if v.abs() < TINY { TINY } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / clamp(1.0 - (a + b) * x / (a + 1.0));
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let two_m = 2.0 * m;

        let even = m * (b - m) * x / ((a + two_m - 1.0) * (a + two_m));
        d = 1.0 / clamp(1.0 + even * d);
        c = clamp(1.0 + even / c);
        h *= d * c;

        let odd = -(a + m) * (a + b + m) * x / ((a + two_m) * (a + two_m + 1.0));
        d = 1.0 / clamp(1.0 + odd * d);
        c = clamp(1.0 + odd / c);
        let step = d * c;
        h *= step;

        if (step - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

// ============================================================================
// Regularized Incomplete Gamma
// ============================================================================

/// Regularized lower incomplete gamma function P(a, x) = γ(a, x) / Γ(a).
///
/// Series expansion for `x < a + 1`, continued fraction otherwise.
///
/// # Examples
/// ```
/// use u_prob::special::regularized_lower_gamma;
/// // P(1, x) = 1 − e^{−x}
/// let p = regularized_lower_gamma(1.0, 2.0);
/// assert!((p - (1.0 - (-2.0_f64).exp())).abs() < 1e-12);
/// ```
pub fn regularized_lower_gamma(a: f64, x: f64) -> f64 {
    if a.is_nan() || x.is_nan() || a <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x < a + 1.0 {
        lower_gamma_series(a, x)
    } else {
        1.0 - upper_gamma_continued_fraction(a, x)
    }
}

/// Regularized upper incomplete gamma function Q(a, x) = 1 − P(a, x).
///
/// Computed directly in the tail so that small values keep full
/// relative precision.
pub fn regularized_upper_gamma(a: f64, x: f64) -> f64 {
    if a.is_nan() || x.is_nan() || a <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    if x == f64::INFINITY {
        return 0.0;
    }
    if x < a + 1.0 {
        1.0 - lower_gamma_series(a, x)
    } else {
        upper_gamma_continued_fraction(a, x)
    }
}

fn lower_gamma_series(a: f64, x: f64) -> f64 {
    let mut denom = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..MAX_ITER {
        denom += 1.0;
        term *= x / denom;
        sum += term;
        if term.abs() < sum.abs() * EPS {
            break;
        }
    }
    sum * (a * x.ln() - x - ln_gamma(a)).exp()
}

fn upper_gamma_continued_fraction(a: f64, x: f64) -> f64 {
    let clamp = |v: f64| if v.abs() < TINY { TINY } else { v };

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / clamp(b);
    let mut h = d;
    for i in 1..=MAX_ITER {
        let i = i as f64;
        let an = -i * (i - a);
        b += 2.0;
        d = 1.0 / clamp(an * d + b);
        c = clamp(b + an / c);
        let step = d * c;
        h *= step;
        if (step - 1.0).abs() < EPS {
            break;
        }
    }
    h * (a * x.ln() - x - ln_gamma(a)).exp()
}

// ============================================================================
// Error Function
// ============================================================================

/// Error function, `erf(x) = (2/√π) ∫₀ˣ exp(−t²) dt`.
///
/// Evaluated through `erf(x) = sign(x) · P(1/2, x²)`.
///
/// # Examples
/// ```
/// use u_prob::special::erf;
/// assert_eq!(erf(0.0), 0.0);
/// assert!((erf(1.0) - 0.8427007929497149).abs() < 1e-12);
/// ```
pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let p = regularized_lower_gamma(0.5, x * x);
    if x < 0.0 {
        -p
    } else {
        p
    }
}

/// Complementary error function, `erfc(x) = 1 − erf(x)`.
///
/// Keeps relative precision for large positive `x`, where `1 − erf(x)`
/// would cancel to zero.
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x < 0.0 {
        1.0 + regularized_lower_gamma(0.5, x * x)
    } else {
        regularized_upper_gamma(0.5, x * x)
    }
}

// ============================================================================
// Standard Normal
// ============================================================================

/// Standard normal PDF φ(x) = (1/√(2π)) exp(−x²/2).
///
/// # Examples
/// ```
/// use u_prob::special::standard_normal_pdf;
/// assert!((standard_normal_pdf(0.0) - 0.3989422804014327).abs() < 1e-15);
/// ```
pub fn standard_normal_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF Φ(x) = P(Z ≤ x) for Z ~ N(0,1).
///
/// # Examples
/// ```
/// use u_prob::special::standard_normal_cdf;
/// assert_eq!(standard_normal_cdf(0.0), 0.5);
/// assert!((standard_normal_cdf(1.96) - 0.9750021048517795).abs() < 1e-12);
/// ```
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Inverse standard normal CDF (quantile function).
///
/// # Algorithm
/// Acklam's rational approximation (relative error 1.15e-9), then one
/// Halley step against [`standard_normal_cdf`], which brings the result to
/// near machine precision.
///
/// # Returns
/// - `NaN` if `p` is NaN or outside `[0, 1]`.
/// - `-∞` for `p = 0`, `+∞` for `p = 1`.
///
/// # Examples
/// ```
/// use u_prob::special::inverse_normal_cdf;
/// assert!(inverse_normal_cdf(0.5).abs() < 1e-15);
/// assert!((inverse_normal_cdf(0.975) - 1.959963984540054).abs() < 1e-12);
/// ```
pub fn inverse_normal_cdf(p: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    #[allow(clippy::excessive_precision)]
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    #[allow(clippy::excessive_precision)]
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    #[allow(clippy::excessive_precision)]
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    if p == 0.5 {
        return 0.0;
    }

    let z = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    // Halley: f = Φ(z) − p, f' = φ(z), f'' = −z φ(z)
    let pdf = standard_normal_pdf(z);
    if pdf <= 0.0 {
        return z;
    }
    let u = (standard_normal_cdf(z) - p) / pdf;
    z - u / (1.0 + 0.5 * z * u)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn normal_cdf_roundtrip(x in -5.0_f64..5.0) {
            let back = inverse_normal_cdf(standard_normal_cdf(x));
            prop_assert!((back - x).abs() < 1e-8, "x={}, back={}", x, back);
        }

        #[test]
        fn erf_is_odd(x in -6.0_f64..6.0) {
            prop_assert!((erf(x) + erf(-x)).abs() < 1e-15);
        }

        #[test]
        fn inc_beta_in_unit_interval(
            x in 0.0_f64..=1.0,
            a in 0.1_f64..50.0,
            b in 0.1_f64..50.0,
        ) {
            let v = regularized_incomplete_beta(x, a, b);
            prop_assert!((-1e-12..=1.0 + 1e-12).contains(&v), "I={}", v);
        }

        #[test]
        fn lower_gamma_monotone_in_x(
            a in 0.1_f64..30.0,
            x1 in 0.0_f64..60.0,
            dx in 0.0_f64..10.0,
        ) {
            let lo = regularized_lower_gamma(a, x1);
            let hi = regularized_lower_gamma(a, x1 + dx);
            prop_assert!(hi >= lo - 1e-13, "P({}, {}) = {} > P({}, {}) = {}", a, x1, lo, a, x1 + dx, hi);
        }
    }
}
