//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - resolves the solver configuration (defaults, environment, flags)
//! - runs the requested command
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{CalcArgs, Cli, Command, CoefficientArgs, FitArgs, RateArgs, SynthArgs};
use crate::domain::{RateParameters, SolverConfig};
use crate::error::AppError;
use crate::integrate::{ArrheniusIntegral, critical_temperature};

pub mod pipeline;

/// Entry point for the `arrhenius` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = SolverConfig::from_env()?;
    if let Some(threshold) = cli.parallel_threshold {
        cfg.parallel_threshold = threshold;
    }
    tracing::debug!(?cfg, "solver configuration");

    match cli.command {
        Command::Calc(args) => handle_calc(&args, &cfg),
        Command::Fit(args) => handle_fit(&args, &cfg),
        Command::Rate(args) => handle_rate(&args),
        Command::Tcrit(args) => handle_tcrit(&args, &cfg),
        Command::Synth(args) => handle_synth(&args, &cfg),
    }
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter)
        .try_init();
}

fn parameters(c: &CoefficientArgs) -> RateParameters<f64> {
    RateParameters::new(c.a, c.ea).with_exponent(c.n)
}

fn handle_calc(args: &CalcArgs, cfg: &SolverConfig) -> Result<(), AppError> {
    let summary = pipeline::run_calc(args, cfg)?;
    print!("{}", crate::report::format_calc_table(&summary.rows));

    if let Some(path) = &args.export_json {
        crate::io::write_json(path, &summary)?;
    }
    Ok(())
}

fn handle_fit(args: &FitArgs, cfg: &SolverConfig) -> Result<(), AppError> {
    let summary = pipeline::run_fit(args, cfg)?;
    print!("{}", crate::report::format_fit_table(&summary.rows));

    if let Some(path) = &args.export_json {
        crate::io::write_json(path, &summary)?;
    }
    if !summary.rows.iter().any(|r| r.succeeded()) {
        tracing::error!("every fitting strategy failed");
        return Err(AppError::new(4, "No fitting strategy produced coefficients."));
    }
    Ok(())
}

fn handle_rate(args: &RateArgs) -> Result<(), AppError> {
    let params = parameters(&args.coefficients);
    params.validate()?;
    let integral = ArrheniusIntegral::from_parameters(params);
    let rates: Vec<f64> = args.temperatures.iter().map(|&t| integral.rate(t)).collect();
    print!("{}", crate::report::format_rates(&args.temperatures, &rates));
    Ok(())
}

fn handle_tcrit(args: &CoefficientArgs, cfg: &SolverConfig) -> Result<(), AppError> {
    let tcrit = critical_temperature(&parameters(args), cfg)?;
    print!("{}", crate::report::format_critical_temperature(tcrit));
    Ok(())
}

fn handle_synth(args: &SynthArgs, cfg: &SolverConfig) -> Result<(), AppError> {
    let written = pipeline::run_synth(args, cfg)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
