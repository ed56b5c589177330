//! Command workflows, separated from printing.
//!
//! Each function loads its inputs, drives the numerical core and returns the
//! rows the front-end prints or exports:
//!
//! - `calc`: profile -> Ω -> threshold scale factor -> optional sequence files
//! - `fit`: profiles -> each requested strategy (with uncertainty reruns)
//! - `synth`: known coefficients -> threshold pulses -> profile files

use std::fs;
use std::path::PathBuf;

use crate::cli::{CalcArgs, FitArgs, SynthArgs};
use crate::data::synthetic::{SynthConfig, generate_profiles};
use crate::domain::{FitBounds, FitMethod, RateParameters, SolverConfig};
use crate::error::AppError;
use crate::fit::{Perturbation, fit_with_uncertainty};
use crate::integrate::ArrheniusIntegral;
use crate::io::{read_profiles, sibling_path, write_profile, write_two_column};
use crate::report::{CalcRow, CalcSummary, FitRow, FitSummary};
use crate::threshold::ThresholdCalculator;

pub fn run_calc(args: &CalcArgs, cfg: &SolverConfig) -> Result<CalcSummary, AppError> {
    let c = &args.coefficients;
    let params = RateParameters::new(c.a, c.ea).with_exponent(c.n);
    params.validate()?;

    let integral = ArrheniusIntegral::from_parameters(params).with_quadrature(args.quadrature);
    let mut calc = ThresholdCalculator::new(integral, cfg.clone());
    calc.set_threshold_omega(args.omega);

    let profiles = read_profiles(&args.files, args.t0)?;
    let mut rows = Vec::with_capacity(profiles.len());
    for (path, profile) in args.files.iter().zip(&profiles) {
        let view = profile.view();
        let omega = calc.omega(view)?;
        let (threshold, error) = match calc.solve(view) {
            Ok(x) => (Some(x), None),
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "threshold solve failed");
                (None, Some(err.to_string()))
            }
        };

        if args.write_threshold_profiles {
            if let Some(x) = threshold {
                let scaled = calc.threshold_profile(view, x);
                write_two_column(&sibling_path(path, "threshold"), view.time(), &scaled)?;
            }
        }
        if args.write_rate_profiles {
            let rates = calc.integral().rate_profile(view);
            write_two_column(&sibling_path(path, "rate"), view.time(), &rates)?;
        }
        if args.write_damage_profiles {
            let damage = calc.integral().cumulative_damage(view)?;
            write_two_column(&sibling_path(path, "damage"), view.time(), &damage)?;
        }

        rows.push(CalcRow {
            file: path.display().to_string(),
            omega,
            threshold,
            error,
        });
    }

    Ok(CalcSummary {
        parameters: params,
        quadrature: args.quadrature,
        threshold_omega: args.omega,
        rows,
    })
}

/// Run every requested strategy. A failing strategy becomes a failed row.
pub fn run_fit(args: &FitArgs, cfg: &SolverConfig) -> Result<FitSummary, AppError> {
    let profiles = read_profiles(&args.files, args.t0)?;
    let bounds = FitBounds {
        min_ea: args.min_ea,
        max_ea: args.max_ea,
        min_a: args.min_a,
        max_a: args.max_a,
    };
    let perturbation = Perturbation {
        offset: args.dt0,
        rise: args.rise,
    };
    let methods = if args.methods.is_empty() {
        FitMethod::all().to_vec()
    } else {
        args.methods.clone()
    };

    let mut rows = Vec::with_capacity(methods.len());
    for method in methods {
        tracing::info!(method = method.display_name(), profiles = profiles.len(), "fitting");
        let row = match fit_with_uncertainty(method, cfg, &bounds, &profiles, &perturbation) {
            Ok((result, spread)) => {
                let uncertainty = (!perturbation.is_empty()).then_some(spread);
                FitRow::success(method, result, uncertainty)
            }
            Err(err) => {
                tracing::warn!(method = method.display_name(), error = %err, "fit failed");
                FitRow::failure(method, &err)
            }
        };
        rows.push(row);
    }

    Ok(FitSummary {
        profiles: profiles.iter().filter_map(|p| p.name.clone()).collect(),
        bounds,
        rows,
    })
}

/// Generate the profiles and write them as `pulse-<duration>.txt` under `out_dir`.
pub fn run_synth(args: &SynthArgs, cfg: &SolverConfig) -> Result<Vec<PathBuf>, AppError> {
    let c = &args.coefficients;
    let config = SynthConfig {
        params: RateParameters::new(c.a, c.ea).with_exponent(c.n),
        durations: args.durations.clone(),
        baseline: args.baseline,
        rise: args.rise,
        samples: args.samples,
        noise: args.noise,
        seed: args.seed,
    };
    let profiles = generate_profiles(&config, cfg)?;

    fs::create_dir_all(&args.out_dir).map_err(|e| {
        AppError::new(2, format!("Failed to create output directory '{}': {e}", args.out_dir.display()))
    })?;
    let mut written = Vec::with_capacity(profiles.len());
    for profile in &profiles {
        let name = profile.name.as_deref().unwrap_or("pulse");
        let path = args.out_dir.join(format!("{name}.txt"));
        write_profile(&path, profile)?;
        written.push(path);
    }
    Ok(written)
}
