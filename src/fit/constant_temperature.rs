//! Constant-temperature linear regression.
//!
//! Each profile is reduced to a square pulse at its peak temperature, lasting
//! as long as the profile spends above half of its temperature rise. The
//! `(1/T_eff, ln τ_eff)` pairs are then regressed like the effective-exposure
//! strategy. No damage integrals are evaluated.

use crate::domain::{FitMethod, FitResult, ProfileView, SolverConfig};
use crate::error::KineticsError;
use crate::fit::{ArrheniusFit, FitState, regress_exposures};
use crate::math::real::{Real, lit, to_f64};

#[derive(Debug, Clone)]
pub struct ConstantTemperatureFit<'a, T> {
    state: FitState<'a, T>,
}

impl<'a, T: Real> ConstantTemperatureFit<'a, T> {
    pub fn new(cfg: SolverConfig) -> Self {
        Self {
            state: FitState::new(cfg),
        }
    }
}

/// `(τ_eff, T_eff)`: time with segment midpoint strictly above half rise, and peak temperature.
pub fn square_pulse_equivalent<T: Real>(profile: ProfileView<'_, T>) -> (T, T) {
    let t_max = profile.max_temperature();
    let t_min = profile.min_temperature();
    let half = lit::<T>(0.5);
    let level = (t_max.clone() + t_min) * half.clone();

    let time = profile.time();
    let temp = profile.temperature();
    let mut tau = T::zero();
    for i in 1..profile.len() {
        if (temp[i].clone() + temp[i - 1].clone()) * half.clone() > level {
            tau += time[i].clone() - time[i - 1].clone();
        }
    }
    (tau, t_max)
}

impl<'a, T: Real> ArrheniusFit<'a, T> for ConstantTemperatureFit<'a, T> {
    fn method(&self) -> FitMethod {
        FitMethod::ConstantTemperature
    }

    fn state(&self) -> &FitState<'a, T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FitState<'a, T> {
        &mut self.state
    }

    fn exec(&self) -> Result<FitResult<T>, KineticsError> {
        tracing::trace!("constant temperature regression: determining peak temperatures and exposure times");
        self.state.require_profiles()?;

        let mut ln_tau = Vec::with_capacity(self.state.profiles.len());
        let mut inv_t = Vec::with_capacity(self.state.profiles.len());
        for (i, profile) in self.state.profiles.iter().enumerate() {
            let (tau, peak) = square_pulse_equivalent(*profile);
            tracing::debug!(profile = i, tau = to_f64(&tau), peak = to_f64(&peak), "square pulse equivalent");
            if !(tau > T::zero()) {
                return Err(KineticsError::precondition(format!(
                    "profile {i} never exceeds half of its temperature rise"
                )));
            }
            ln_tau.push(tau.ln());
            inv_t.push(T::one() / peak);
        }
        regress_exposures(&inv_t, &ln_tau)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fixtures::{self, A, EA, rel};

    #[test]
    fn half_rise_duration() {
        // 310 -> 330 K ramp up over 1 s, hold 2 s, ramp down over 1 s.
        let t = [0.0, 1.0, 3.0, 4.0];
        let temp = [310.0, 330.0, 330.0, 310.0];
        let (tau, peak) = square_pulse_equivalent(ProfileView::new(&t, &temp).unwrap());
        assert_eq!(peak, 330.0);
        assert_eq!(tau, 2.0);
    }

    #[test]
    fn recovers_coefficients_from_threshold_pulses() {
        let profiles = fixtures::threshold_pulses();
        let mut fit = ConstantTemperatureFit::new(SolverConfig::default());
        for p in &profiles {
            fit.add_profile(p.view());
        }
        let result = fit.exec().unwrap();
        let (a, ea) = (result.a.unwrap(), result.ea.unwrap());
        assert!(rel(ea, EA) < 0.1, "Ea={ea}");
        assert!(rel(a, A) < 0.1, "A={a}");
    }

    #[test]
    fn flat_profile_has_no_exposure() {
        let t = [0.0, 1.0, 2.0];
        let temp = [330.0, 330.0, 330.0];
        let mut fit = ConstantTemperatureFit::new(SolverConfig::default());
        fit.add_profile(ProfileView::new(&t, &temp).unwrap());
        assert!(matches!(fit.exec(), Err(KineticsError::Precondition(_))));
    }
}
