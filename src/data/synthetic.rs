//! Synthetic threshold profiles for validating the fitters.
//!
//! A set of square pulses of different lengths is scaled so that each one
//! accumulates exactly the threshold damage for known `(A, Ea)`. Fitting the
//! output should give those coefficients back. Optional Gaussian noise models
//! thermometer error.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{RateParameters, SolverConfig, ThermalProfile};
use crate::error::{AppError, KineticsError};
use crate::integrate::ArrheniusIntegral;
use crate::math::real::{Real, from_usize, to_f64};
use crate::threshold::ThresholdCalculator;

/// Rectangular pulse sampled at `samples` equally spaced times over `[0, duration]`.
///
/// The first sample sits at `baseline`, every later one at `baseline + rise`.
pub fn square_pulse<T: Real>(
    duration: T,
    baseline: T,
    rise: T,
    samples: usize,
) -> Result<ThermalProfile<T>, KineticsError> {
    if samples < 2 {
        return Err(KineticsError::precondition(format!(
            "a pulse needs at least 2 samples, got {samples}"
        )));
    }
    if !(duration.is_finite() && duration > T::zero()) {
        return Err(KineticsError::precondition(format!(
            "pulse duration must be finite and > 0, got {}",
            to_f64(&duration)
        )));
    }
    let last = from_usize::<T>(samples - 1);
    let time = (0..samples)
        .map(|i| duration.clone() * from_usize::<T>(i) / last.clone())
        .collect();
    let peak = baseline.clone() + rise;
    let temperature = (0..samples)
        .map(|i| if i == 0 { baseline.clone() } else { peak.clone() })
        .collect();
    ThermalProfile::new(time, temperature)
}

/// Scale the rise of `profile` so that it reaches the calculator's target damage.
pub fn threshold_normalize<T: Real>(
    profile: &ThermalProfile<T>,
    calc: &ThresholdCalculator<T>,
) -> Result<ThermalProfile<T>, KineticsError> {
    let x = calc.solve(profile.view())?;
    Ok(profile.scale_rise(x))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub params: RateParameters<f64>,
    pub durations: Vec<f64>,
    pub baseline: f64,
    pub rise: f64,
    pub samples: usize,
    /// Standard deviation of additive temperature noise, K.
    pub noise: Option<f64>,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            params: RateParameters::new(3.1e99, 6.28e5),
            durations: vec![0.001, 0.01, 0.1, 1.0, 10.0],
            baseline: 310.0,
            rise: 10.0,
            samples: 400,
            noise: None,
            seed: 42,
        }
    }
}

/// Threshold-normalized pulses, one per duration, named `pulse-<duration>`.
pub fn generate_profiles(config: &SynthConfig, solver: &SolverConfig) -> Result<Vec<ThermalProfile<f64>>, AppError> {
    if config.durations.is_empty() {
        return Err(AppError::new(2, "At least one pulse duration is required."));
    }
    config.params.validate()?;

    let integral = ArrheniusIntegral::from_parameters(config.params);
    let calc = ThresholdCalculator::new(integral, solver.clone());

    let noise = match config.noise {
        Some(sigma) if sigma > 0.0 => Some(
            Normal::new(0.0, sigma).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?,
        ),
        _ => None,
    };
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut profiles = Vec::with_capacity(config.durations.len());
    for &duration in &config.durations {
        let pulse = square_pulse(duration, config.baseline, config.rise, config.samples)?;
        let threshold = threshold_normalize(&pulse, &calc)?;
        tracing::debug!(
            duration,
            peak = threshold.view().max_temperature(),
            "generated threshold pulse"
        );

        let profile = match &noise {
            Some(normal) => {
                let noisy = threshold
                    .temperature()
                    .iter()
                    .map(|&t| t + normal.sample(&mut rng))
                    .collect();
                ThermalProfile::new(threshold.time().to_vec(), noisy)?
            }
            None => threshold,
        };
        profiles.push(profile.with_name(format!("pulse-{duration}")));
    }
    Ok(profiles)
}
