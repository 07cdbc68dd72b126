//! u-prob CLI

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use u_prob::distributions::{Distribution, Family, Normal, Univariate};
use u_prob::empirical::{EmpiricalSummary, Histogram};
use u_prob::events::EventSpace;
use u_prob::random::{coin_flips, create_rng};
use u_prob::relations;
use u_prob::stats::WelfordAccumulator;

#[derive(Debug, Parser)]
#[command(name = "u-prob")]
#[command(about = "u-prob - Probability distributions: density, cumulative, quantile, sampling")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    /// Seed for every random draw
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate one operation on a distribution
    Dist {
        /// binomial, normal, t, chisq or f
        family: Family,

        /// Family parameters in order (binomial: p, trials; normal: mean, sd;
        /// t/chisq: df; f: df1, df2)
        #[arg(long = "param", required = true, allow_negative_numbers = true)]
        params: Vec<f64>,

        #[arg(value_enum)]
        operation: Operation,

        /// x for density/cumulative, p for quantile, count for sample
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Running proportion of heads over repeated coin-flip runs
    Coins {
        #[arg(long, default_value_t = 1000)]
        flips: usize,

        #[arg(long, default_value_t = 0.5)]
        probability: f64,

        #[arg(long, default_value_t = 4)]
        runs: usize,
    },
    /// The pants distribution and the basic rules of probability
    Events,
    /// Build chi-squared, t and F variates from normals and compare with the densities
    Relations {
        #[arg(long, default_value_t = 10_000)]
        draws: usize,

        #[arg(long, default_value_t = 30)]
        bins: usize,

        #[arg(long, default_value_t = 3)]
        df: usize,

        #[arg(long, default_value_t = 3)]
        df1: usize,

        #[arg(long, default_value_t = 20)]
        df2: usize,
    },
    /// Area under a normal curve between two bounds
    Area {
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        mean: f64,

        #[arg(long, default_value_t = 1.0)]
        sd: f64,

        #[arg(long, allow_negative_numbers = true)]
        lower: f64,

        #[arg(long, allow_negative_numbers = true)]
        upper: f64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Operation {
    Density,
    Cumulative,
    Quantile,
    Sample,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Dist { family, params, operation, value } => {
            cmd_dist(family, &params, operation, value, cli.seed)
        }
        Commands::Coins { flips, probability, runs } => {
            cmd_coins(flips, probability, runs, cli.seed)
        }
        Commands::Events => cmd_events(),
        Commands::Relations { draws, bins, df, df1, df2 } => {
            cmd_relations(draws, bins, df, df1, df2, cli.seed)
        }
        Commands::Area { mean, sd, lower, upper } => cmd_area(mean, sd, lower, upper),
    }
}

fn cmd_dist(family: Family, params: &[f64], operation: Operation, value: f64, seed: u64) -> Result<()> {
    write_json(dist_report(family, params, operation, value, seed)?)
}

fn dist_report(
    family: Family,
    params: &[f64],
    operation: Operation,
    value: f64,
    seed: u64,
) -> Result<serde_json::Value> {
    let dist = Distribution::from_parts(family, params)
        .with_context(|| format!("building {family} distribution from {params:?}"))?;
    tracing::info!(distribution = %dist, ?operation, value, "evaluating");

    let mut report = serde_json::json!({
        "distribution": dist.to_string(),
        "operation": format!("{operation:?}").to_lowercase(),
        "input": number(value),
        "mean": number(dist.mean()),
        "variance": number(dist.variance()),
    });

    match operation {
        Operation::Density => report["result"] = number(dist.density(value)),
        Operation::Cumulative => report["result"] = number(dist.cumulative(value)),
        Operation::Quantile => report["result"] = number(dist.quantile(value)?),
        Operation::Sample => {
            ensure!(
                value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64,
                "sample count must be a non-negative integer, got {value}"
            );
            let mut rng = create_rng(seed);
            let draws: Vec<f64> = dist.sample(value as usize, &mut rng)?.collect();
            let moments: WelfordAccumulator = draws.iter().copied().collect();
            let moment = |m: Option<f64>| m.map_or(serde_json::Value::Null, number);
            report["sample_moments"] = serde_json::json!({
                "mean": moment(moments.mean()),
                "variance": moment(moments.sample_variance()),
                "skewness": moment(moments.skewness()),
                "excess_kurtosis": moment(moments.kurtosis()),
            });
            report["result"] = serde_json::json!(draws);
        }
    }
    Ok(report)
}

fn cmd_coins(flips: usize, probability: f64, runs: usize, seed: u64) -> Result<()> {
    let mut rng = create_rng(seed);
    let mut out = Vec::with_capacity(runs);
    for run in 0..runs {
        let summary: EmpiricalSummary = coin_flips(flips, probability, &mut rng)?.into_iter().collect();
        tracing::info!(run, heads = summary.successes(), "coin run complete");
        out.push(summary);
    }

    write_json(serde_json::json!({
        "probability": probability,
        "flips": flips,
        "runs": out,
    }))
}

fn cmd_events() -> Result<()> {
    let pants = EventSpace::new(vec![
        ("blue jeans", 0.5),
        ("grey jeans", 0.3),
        ("black jeans", 0.1),
        ("black suit", 0.0),
        ("blue tracksuit", 0.1),
    ])?;
    let jeans = pants.event(&["blue jeans", "grey jeans", "black jeans"])?;
    let blue = pants.event(&["blue jeans", "blue tracksuit"])?;
    let both = pants.intersection(&jeans, &blue);

    write_json(serde_json::json!({
        "space": pants,
        "jeans": pants.probability(&jeans),
        "blue": pants.probability(&blue),
        "rules": {
            "not_jeans": pants.probability(&pants.complement(&jeans)),
            "jeans_or_blue": pants.probability(&pants.union(&jeans, &blue)),
            "jeans_and_blue": pants.probability(&both),
            "blue_given_jeans": pants.conditional(&blue, &jeans)?,
        },
    }))
}

fn density_comparison(draws: &[f64], model: &Distribution, lo: f64, hi: f64, bins: usize) -> Result<serde_json::Value> {
    let mut hist = Histogram::new(lo, hi, bins)?;
    hist.extend(draws.iter().copied());
    let centers = hist.bin_centers();
    let model_density: Vec<f64> = centers.iter().map(|&x| model.density(x)).collect();
    let error = hist.max_density_error(model);
    tracing::info!(model = %model, max_density_error = error, "histogram compared");
    Ok(serde_json::json!({
        "model": model.to_string(),
        "bin_centers": centers,
        "empirical_density": hist.densities(),
        "model_density": model_density,
        "max_density_error": error,
        "histogram": hist,
    }))
}

fn cmd_relations(draws: usize, bins: usize, df: usize, df1: usize, df2: usize, seed: u64) -> Result<()> {
    let mut rng = create_rng(seed);

    let chi = relations::chi_squared_from_normals(df, draws, &mut rng)?;
    let chi_model = Distribution::chi_squared(df as f64)?;
    let chi_hi = chi_model.quantile(0.995)?;

    let t = relations::t_from_normals(df, draws, &mut rng)?;
    let t_model = Distribution::student_t(df as f64)?;
    let t_hi = t_model.quantile(0.995)?;

    let f = relations::f_from_chi_squared(df1, df2, draws, &mut rng)?;
    let f_model = Distribution::fisher_f(df1 as f64, df2 as f64)?;
    let f_hi = f_model.quantile(0.99)?;

    write_json(serde_json::json!({
        "draws": draws,
        "chi_squared": density_comparison(&chi, &chi_model, 0.0, chi_hi, bins)?,
        "t": density_comparison(&t, &t_model, -t_hi, t_hi, bins)?,
        "f": density_comparison(&f, &f_model, 0.0, f_hi, bins)?,
    }))
}

fn cmd_area(mean: f64, sd: f64, lower: f64, upper: f64) -> Result<()> {
    let normal = Normal::new(mean, sd).context("building the normal curve")?;
    let area = normal.probability_between(lower, upper)?;
    write_json(serde_json::json!({
        "distribution": Distribution::from(normal.clone()).to_string(),
        "lower": lower,
        "upper": upper,
        "probability": area,
        "within_1_sd": normal.within_sd(1.0)?,
        "within_2_sd": normal.within_sd(2.0)?,
        "within_3_sd": normal.within_sd(3.0)?,
    }))
}

/// JSON has no infinities or NaN, so those are written as "inf", "-inf"
/// and "NaN" strings rather than `null`.
fn number(x: f64) -> serde_json::Value {
    if x.is_finite() {
        serde_json::json!(x)
    } else if x.is_nan() {
        serde_json::json!("NaN")
    } else if x > 0.0 {
        serde_json::json!("inf")
    } else {
        serde_json::json!("-inf")
    }
}

fn write_json(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("u-prob").chain(args.iter().copied())).unwrap()
    }

    fn report(cli: Cli) -> serde_json::Value {
        match cli.command {
            Commands::Dist { family, params, operation, value } => {
                dist_report(family, &params, operation, value, cli.seed).unwrap()
            }
            other => panic!("expected dist, got {other:?}"),
        }
    }

    #[test]
    fn test_dist_accepts_negative_params_and_value() {
        let cli = parse(&["dist", "normal", "--param", "-1", "--param", "2", "cumulative", "-1"]);
        match &cli.command {
            Commands::Dist { family, params, value, .. } => {
                assert_eq!(*family, Family::Normal);
                assert_eq!(params, &[-1.0, 2.0]);
                assert_eq!(*value, -1.0);
            }
            other => panic!("expected dist, got {other:?}"),
        }
        let out = report(cli);
        assert_eq!(out["distribution"], "Normal(mean=-1, sd=2)");
        assert!((out["result"].as_f64().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(out["mean"], -1.0);
        assert_eq!(out["variance"], 4.0);
    }

    #[test]
    fn test_dist_binomial_quantile() {
        let out = report(parse(&[
            "dist", "binomial", "--param", "0.1666666666666667", "--param", "20", "quantile", "0.75",
        ]));
        assert_eq!(out["operation"], "quantile");
        assert_eq!(out["result"], 4.0);
    }

    #[test]
    fn test_dist_non_finite_results_are_strings() {
        let out = report(parse(&["dist", "normal", "--param", "0", "--param", "1", "quantile", "1"]));
        assert_eq!(out["result"], "inf");
        let out = report(parse(&["dist", "normal", "--param", "0", "--param", "1", "quantile", "0"]));
        assert_eq!(out["result"], "-inf");
        let out = report(parse(&["dist", "t", "--param", "1", "density", "0"]));
        assert_eq!(out["mean"], "NaN");
        assert_eq!(out["variance"], "NaN");
    }

    #[test]
    fn test_dist_sample_reports_moments() {
        let cli = parse(&[
            "--seed", "7", "--log-level", "debug", "dist", "chisq", "--param", "4", "sample", "20000",
        ]);
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        let out = report(cli);
        assert_eq!(out["result"].as_array().unwrap().len(), 20_000);
        let mean = out["sample_moments"]["mean"].as_f64().unwrap();
        assert!((mean - 4.0).abs() < 0.1, "mean={mean}");
        assert!(out["sample_moments"]["skewness"].as_f64().unwrap() > 0.5);
    }

    #[test]
    fn test_dist_rejects_bad_input() {
        let cli = parse(&["dist", "binomial", "--param", "0.5", "--param", "2.5", "density", "1"]);
        let Commands::Dist { family, params, operation, value } = cli.command else {
            panic!("expected dist");
        };
        assert!(dist_report(family, &params, operation, value, 0).is_err());
        assert!(dist_report(Family::Normal, &[0.0, 1.0], Operation::Sample, 2.5, 0).is_err());
        assert!(Cli::try_parse_from(["u-prob", "dist", "normal", "cumulative", "0"]).is_err());
        assert!(Cli::try_parse_from(["u-prob", "dist", "gamma", "--param", "1", "density", "0"]).is_err());
    }

    #[test]
    fn test_number_encoding() {
        assert_eq!(number(0.25), serde_json::json!(0.25));
        assert_eq!(number(f64::INFINITY), "inf");
        assert_eq!(number(f64::NEG_INFINITY), "-inf");
        assert_eq!(number(f64::NAN), "NaN");
    }
}
