//! End-to-end checks of the distribution facade against published values.

use approx::{assert_abs_diff_eq, assert_relative_eq};

use u_prob::distributions::Normal;
use u_prob::empirical::{EmpiricalSummary, Histogram};
use u_prob::events::EventSpace;
use u_prob::random::{coin_flips, create_rng};
use u_prob::relations::chi_squared_from_normals;
use u_prob::{Distribution, Family, ProbError, Univariate};

#[test]
fn skulls_on_twenty_dice() {
    let skulls = Distribution::binomial(1.0 / 6.0, 20).unwrap();
    assert_abs_diff_eq!(skulls.density(4.0), 0.2022036, epsilon = 1e-7);
    assert_abs_diff_eq!(skulls.cumulative(4.0), 0.7687492, epsilon = 1e-7);
    assert_eq!(skulls.quantile(0.75).unwrap(), 4.0);
    let total: f64 = (0..=20).map(|k| skulls.density(k as f64)).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-12);
}

#[test]
fn sample_mean_settles_on_expectation() {
    let skulls = Distribution::binomial(1.0 / 6.0, 20).unwrap();
    let mut rng = create_rng(42);
    let draws = skulls.sample(100_000, &mut rng).unwrap();
    assert_eq!(draws.len(), 100_000);
    let mean = u_prob::stats::mean(&draws.collect::<Vec<_>>()).unwrap();
    assert_abs_diff_eq!(mean, 20.0 / 6.0, epsilon = 0.03);
}

#[test]
fn every_family_through_from_parts() {
    let cases: [(&str, &[f64], f64, f64); 5] = [
        ("binomial", &[0.5, 10.0], 5.0, 0.623046875),
        ("normal", &[0.0, 1.0], 1.96, 0.9750021048517795),
        ("t", &[3.0], 2.0, 0.930337),
        ("chisq", &[3.0], 3.0, 0.6083748),
        ("f", &[3.0, 5.0], 2.0, 0.767376),
    ];
    for (name, params, x, expected) in cases {
        let family: Family = name.parse().unwrap();
        let dist = Distribution::from_parts(family, params).unwrap();
        assert_eq!(dist.family(), family);
        assert_abs_diff_eq!(dist.cumulative(x), expected, epsilon = 1e-6);
    }
}

#[test]
fn quantile_errors_are_invalid_argument() {
    let dist = Distribution::chi_squared(2.0).unwrap();
    for p in [-0.1, 1.1, f64::NAN] {
        assert!(matches!(dist.quantile(p), Err(ProbError::InvalidArgument(_))));
    }
    assert!(matches!(
        Distribution::from_parts(Family::Binomial, &[0.5, -1.0]),
        Err(ProbError::InvalidParameter(_))
    ));
}

#[test]
fn normal_density_can_exceed_one() {
    let narrow = Normal::new(1.0, 0.1).unwrap();
    assert_relative_eq!(narrow.density(1.0), 3.989422804014327, max_relative = 1e-12);
    assert_abs_diff_eq!(narrow.within_sd(3.0).unwrap(), 0.997, epsilon = 1e-3);
}

#[test]
fn squared_normals_look_like_chi_squared() {
    let mut rng = create_rng(5);
    let draws = chi_squared_from_normals(3, 50_000, &mut rng).unwrap();
    let mut hist = Histogram::new(0.0, 12.0, 24).unwrap();
    hist.extend(draws);
    let model = Distribution::chi_squared(3.0).unwrap();
    assert!(hist.max_density_error(&model) < 0.02);
}

#[test]
fn fair_coin_long_run() {
    let mut rng = create_rng(42);
    let summary: EmpiricalSummary = coin_flips(10_000, 0.5, &mut rng).unwrap().into_iter().collect();
    assert_abs_diff_eq!(summary.proportion().unwrap(), 0.5, epsilon = 0.03);
}

#[test]
fn pants_rules() {
    let pants = EventSpace::new(vec![
        ("blue jeans", 0.5),
        ("grey jeans", 0.3),
        ("black jeans", 0.1),
        ("black suit", 0.0),
        ("blue tracksuit", 0.1),
    ])
    .unwrap();
    let jeans = pants.event(&["blue jeans", "grey jeans", "black jeans"]).unwrap();
    assert_abs_diff_eq!(pants.probability(&jeans), 0.9, epsilon = 1e-12);
    assert_abs_diff_eq!(
        pants.probability(&pants.complement(&jeans)),
        1.0 - pants.probability(&jeans),
        epsilon = 1e-12
    );
}
