//! Command-line parsing for the `arrhenius` binary.
//!
//! Argument parsing and command dispatch are kept separate from the numerical
//! code: nothing under `integrate`, `threshold` or `fit` depends on clap
//! beyond the value enums it derives.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{FitMethod, Quadrature};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "arrhenius", version, about = "Arrhenius thermal damage calculator and coefficient fitter")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Integrate profiles with more samples than this in parallel.
    #[arg(long, global = true, value_name = "N")]
    pub parallel_threshold: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the damage integral and threshold scale factor of each profile.
    Calc(CalcArgs),
    /// Fit A and Ea to a set of threshold profiles.
    Fit(FitArgs),
    /// Print the rate at one or more temperatures.
    Rate(RateArgs),
    /// Print the critical temperature (rate = 1/s).
    Tcrit(CoefficientArgs),
    /// Write threshold-normalized square-pulse profiles for validating `fit`.
    Synth(SynthArgs),
}

/// Rate law coefficients.
#[derive(Debug, Args, Clone)]
pub struct CoefficientArgs {
    /// Frequency factor A [1/s].
    #[arg(short = 'A', long = "a", default_value_t = 3.1e99)]
    pub a: f64,

    /// Activation energy Ea [J/mol].
    #[arg(short = 'E', long = "ea", default_value_t = 6.28e5)]
    pub ea: f64,

    /// Temperature exponent of the prefactor (0 for the plain form).
    #[arg(short = 'n', long = "n", default_value_t = 0.0, allow_negative_numbers = true)]
    pub n: f64,
}

#[derive(Debug, Args, Clone)]
pub struct CalcArgs {
    /// Profile files (`time temperature` per line).
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub coefficients: CoefficientArgs,

    /// Offset added to every temperature on load (e.g. 273.15 for Celsius input).
    #[arg(long = "t0", default_value_t = 0.0, allow_negative_numbers = true)]
    pub t0: f64,

    /// Damage value defining the threshold.
    #[arg(long, default_value_t = 1.0)]
    pub omega: f64,

    /// Quadrature used for the damage integral.
    #[arg(long, value_enum, default_value_t = Quadrature::Trapezoid)]
    pub quadrature: Quadrature,

    /// Write `<file>.threshold` with the threshold-scaled temperatures.
    #[arg(long)]
    pub write_threshold_profiles: bool,

    /// Write `<file>.rate` with the per-sample rate.
    #[arg(long)]
    pub write_rate_profiles: bool,

    /// Write `<file>.damage` with the running damage integral.
    #[arg(long)]
    pub write_damage_profiles: bool,

    /// Write a JSON summary of the results.
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Threshold profile files.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Fitting strategy; repeat to run several. Defaults to all of them.
    #[arg(short, long = "method", value_enum)]
    pub methods: Vec<FitMethod>,

    /// Lower bound on Ea [J/mol].
    #[arg(long)]
    pub min_ea: Option<f64>,

    /// Upper bound on Ea [J/mol].
    #[arg(long)]
    pub max_ea: Option<f64>,

    /// Lower bound on A [1/s].
    #[arg(long)]
    pub min_a: Option<f64>,

    /// Upper bound on A [1/s].
    #[arg(long)]
    pub max_a: Option<f64>,

    /// Offset added to every temperature on load.
    #[arg(long = "t0", default_value_t = 0.0, allow_negative_numbers = true)]
    pub t0: f64,

    /// Baseline temperature uncertainty [K]; enables uncertainty estimates.
    #[arg(long = "dt0", value_name = "K")]
    pub dt0: Option<f64>,

    /// Relative uncertainty of the temperature rise; enables uncertainty estimates.
    #[arg(long, value_name = "FRAC")]
    pub rise: Option<f64>,

    /// Write a JSON summary of the results.
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RateArgs {
    #[command(flatten)]
    pub coefficients: CoefficientArgs,

    /// Temperatures [K].
    #[arg(required = true, value_name = "TEMP")]
    pub temperatures: Vec<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    #[command(flatten)]
    pub coefficients: CoefficientArgs,

    /// Pulse durations [s], one profile each.
    #[arg(long, required = true, num_args = 1.., value_name = "S")]
    pub durations: Vec<f64>,

    /// Temperature rise of the unscaled pulse [K].
    #[arg(long, default_value_t = 10.0)]
    pub rise: f64,

    /// Baseline temperature [K].
    #[arg(long, default_value_t = 310.0)]
    pub baseline: f64,

    /// Samples per profile.
    #[arg(long, default_value_t = 400)]
    pub samples: usize,

    /// Standard deviation of additive temperature noise [K].
    #[arg(long, value_name = "K")]
    pub noise: Option<f64>,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Directory the profiles are written to.
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calc() {
        let cli = Cli::parse_from([
            "arrhenius",
            "-vv",
            "calc",
            "a.txt",
            "b.txt",
            "--ea",
            "5e5",
            "--quadrature",
            "exponential-integral",
            "--write-threshold-profiles",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Calc(args) = cli.command else {
            panic!("expected calc");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.coefficients.a, 3.1e99);
        assert_eq!(args.coefficients.ea, 5e5);
        assert_eq!(args.quadrature, Quadrature::ExponentialIntegral);
        assert!(args.write_threshold_profiles && !args.write_rate_profiles);
    }

    #[test]
    fn parses_repeated_fit_methods_and_global_flags() {
        let cli = Cli::parse_from([
            "arrhenius",
            "fit",
            "p1",
            "--method",
            "grid",
            "-m",
            "constant-temperature",
            "--dt0",
            "0.5",
            "--parallel-threshold",
            "100",
        ]);
        assert_eq!(cli.parallel_threshold, Some(100));
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.methods, vec![FitMethod::Grid, FitMethod::ConstantTemperature]);
        assert_eq!(args.dt0, Some(0.5));
        assert_eq!(args.rise, None);
    }

    #[test]
    fn parses_rate_and_negative_exponent() {
        let cli = Cli::parse_from(["arrhenius", "rate", "--n", "-2", "320", "330"]);
        let Command::Rate(args) = cli.command else {
            panic!("expected rate");
        };
        assert_eq!(args.coefficients.n, -2.0);
        assert_eq!(args.temperatures, vec![320.0, 330.0]);
    }

    #[test]
    fn synth_requires_output_directory() {
        assert!(Cli::try_parse_from(["arrhenius", "synth", "--durations", "1"]).is_err());
        let cli = Cli::parse_from(["arrhenius", "synth", "--durations", "0.1", "1", "--out-dir", "out"]);
        let Command::Synth(args) = cli.command else {
            panic!("expected synth");
        };
        assert_eq!(args.durations, vec![0.1, 1.0]);
        assert_eq!(args.samples, 400);
    }
}
