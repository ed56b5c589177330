//! Fitting `(A, Ea)` to threshold profiles.
//!
//! Every profile added to a fitter is assumed to be a *threshold* exposure:
//! one that produced exactly the damage criterion (`Ω = 1`). A fitter borrows
//! the profiles, never copies them, and `exec` does not mutate anything.
//!
//! Strategies:
//!
//! - [`VarianceFit`]: minimize the spread of implied `ln A` over `Ea`, then the
//!   threshold error over `A`
//! - [`EffectiveExposureFit`]: per-profile effective exposure time and
//!   temperature, then a line through `(1/T_eff, ln τ_eff)`
//! - [`ConstantTemperatureFit`]: same line, with each profile treated as a
//!   square pulse at its peak temperature
//! - [`GridFit`]: brute-force threshold error over an `(A, Ea)` grid

use crate::domain::{FitBounds, FitMethod, FitResult, ProfileView, SolverConfig};
use crate::error::KineticsError;
use crate::math::ols::linear_regression;
use crate::math::real::{Real, gas_constant, to_f64};

pub mod bounds;
pub mod constant_temperature;
pub mod effective_exposure;
pub mod scaling_grid;
pub mod uncertainty;
pub mod variance;

pub use constant_temperature::ConstantTemperatureFit;
pub use effective_exposure::EffectiveExposureFit;
pub use scaling_grid::GridFit;
pub use uncertainty::{Perturbation, fit_with_uncertainty};
pub use variance::VarianceFit;

/// Profiles, bounds and configuration shared by all strategies.
#[derive(Debug, Clone)]
pub struct FitState<'a, T> {
    pub profiles: Vec<ProfileView<'a, T>>,
    pub bounds: FitBounds<T>,
    pub cfg: SolverConfig,
}

impl<'a, T: Real> FitState<'a, T> {
    pub fn new(cfg: SolverConfig) -> Self {
        Self {
            profiles: Vec::new(),
            bounds: FitBounds::default(),
            cfg,
        }
    }

    pub(crate) fn require_profiles(&self) -> Result<(), KineticsError> {
        if self.profiles.is_empty() {
            return Err(KineticsError::NoUsableProfiles("no profiles were added".into()));
        }
        Ok(())
    }
}

/// Common contract of the fitting strategies.
pub trait ArrheniusFit<'a, T: Real> {
    fn method(&self) -> FitMethod;

    fn state(&self) -> &FitState<'a, T>;

    fn state_mut(&mut self) -> &mut FitState<'a, T>;

    /// Estimate `(A, Ea)` from the profiles added so far.
    fn exec(&self) -> Result<FitResult<T>, KineticsError>;

    fn add_profile(&mut self, profile: ProfileView<'a, T>) {
        self.state_mut().profiles.push(profile);
    }

    fn clear(&mut self) {
        self.state_mut().profiles.clear();
    }

    fn profile_count(&self) -> usize {
        self.state().profiles.len()
    }

    fn set_bounds(&mut self, bounds: FitBounds<T>) {
        self.state_mut().bounds = bounds;
    }

    fn set_min_ea(&mut self, value: T) {
        self.state_mut().bounds.min_ea = Some(value);
    }

    fn set_max_ea(&mut self, value: T) {
        self.state_mut().bounds.max_ea = Some(value);
    }

    fn set_min_a(&mut self, value: T) {
        self.state_mut().bounds.min_a = Some(value);
    }

    fn set_max_a(&mut self, value: T) {
        self.state_mut().bounds.max_a = Some(value);
    }

    fn min_ea(&self) -> Option<T> {
        self.state().bounds.min_ea.clone()
    }

    fn max_ea(&self) -> Option<T> {
        self.state().bounds.max_ea.clone()
    }

    fn min_a(&self) -> Option<T> {
        self.state().bounds.min_a.clone()
    }

    fn max_a(&self) -> Option<T> {
        self.state().bounds.max_a.clone()
    }
}

/// Build the fitter for `method`.
pub fn fitter_for<'a, T: Real>(method: FitMethod, cfg: SolverConfig) -> Box<dyn ArrheniusFit<'a, T> + 'a> {
    match method {
        FitMethod::Variance => Box::new(VarianceFit::new(cfg)),
        FitMethod::EffectiveExposure => Box::new(EffectiveExposureFit::new(cfg)),
        FitMethod::ConstantTemperature => Box::new(ConstantTemperatureFit::new(cfg)),
        FitMethod::Grid => Box::new(GridFit::new(cfg)),
    }
}

/// Fit `ln τ = -ln A + (Ea/R)·(1/T)` through per-profile effective exposures.
pub(crate) fn regress_exposures<T: Real>(inv_t: &[T], ln_tau: &[T]) -> Result<FitResult<T>, KineticsError> {
    let line = linear_regression(inv_t, ln_tau)?;
    let a = (-line.intercept).exp();
    let ea = line.slope * gas_constant::<T>();
    tracing::debug!(a = to_f64(&a), ea = to_f64(&ea), "regressed effective exposures");
    Ok(FitResult::new(a, ea))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::data::synthetic::{square_pulse, threshold_normalize};
    use crate::domain::{SolverConfig, ThermalProfile};
    use crate::integrate::ArrheniusIntegral;
    use crate::threshold::ThresholdCalculator;

    pub const A: f64 = 3.1e99;
    pub const EA: f64 = 6.28e5;
    pub const DURATIONS: [f64; 5] = [0.001, 0.01, 0.1, 1.0, 10.0];

    /// Square pulses above 310 K, each scaled so that `Ω(A, EA) = 1`.
    pub fn threshold_pulses() -> Vec<ThermalProfile<f64>> {
        let calc = ThresholdCalculator::new(ArrheniusIntegral::new(A, EA), SolverConfig::default());
        DURATIONS
            .iter()
            .map(|&d| {
                let pulse = square_pulse(d, 310.0, 10.0, 200).unwrap();
                threshold_normalize(&pulse, &calc).unwrap()
            })
            .collect()
    }

    pub fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_manages_profiles_and_bounds() {
        let profiles = fixtures::threshold_pulses();
        let mut fit = fitter_for::<f64>(FitMethod::ConstantTemperature, SolverConfig::default());
        assert_eq!(fit.method(), FitMethod::ConstantTemperature);
        for p in &profiles {
            fit.add_profile(p.view());
        }
        assert_eq!(fit.profile_count(), 5);

        fit.set_min_ea(1.0e5);
        fit.set_max_a(1.0e101);
        assert_eq!(fit.min_ea(), Some(1.0e5));
        assert_eq!(fit.max_ea(), None);
        assert_eq!(fit.max_a(), Some(1.0e101));

        fit.clear();
        assert_eq!(fit.profile_count(), 0);
        assert!(matches!(fit.exec(), Err(KineticsError::NoUsableProfiles(_))));
    }

    #[test]
    fn exposure_regression_recovers_coefficients() {
        let (a, ea) = (3.1e99_f64, 6.28e5_f64);
        let inv_t: Vec<f64> = [320.0, 330.0, 340.0].iter().map(|t| 1.0 / t).collect();
        let ln_tau: Vec<f64> = inv_t.iter().map(|v| -a.ln() + ea / crate::math::GAS_CONSTANT * v).collect();
        let fit = regress_exposures(&inv_t, &ln_tau).unwrap();
        assert!(fixtures::rel(fit.ea.unwrap(), ea) < 1e-8);
        assert!(fixtures::rel(fit.a.unwrap(), a) < 1e-5);
    }
}
