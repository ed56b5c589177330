//! Effective-exposure linear regression.
//!
//! A square pulse of length `τ` at temperature `T` has
//! `-ln Ω(1, Ea) = -ln τ + Ea/(R·T)`, a straight line in `Ea`. Any profile is
//! fitted to that line to obtain its effective exposure `(τ_eff, T_eff)`. The
//! threshold condition `A·τ·exp(-Ea/(R·T)) = 1` then makes `ln τ_eff` linear
//! in `1/T_eff` across profiles, with intercept `-ln A` and slope `Ea/R`.

use crate::domain::{FitMethod, FitResult, ProfileView, SolverConfig};
use crate::error::KineticsError;
use crate::fit::bounds::ea_upper_bound;
use crate::fit::{ArrheniusFit, FitState, regress_exposures};
use crate::integrate::ArrheniusIntegral;
use crate::math::ols::linear_regression;
use crate::math::real::{Real, gas_constant, lit, to_f64};

/// Decimal exponent step of the `Ea` sampling grid.
const DECADE_STEP: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct EffectiveExposureFit<'a, T> {
    state: FitState<'a, T>,
}

impl<'a, T: Real> EffectiveExposureFit<'a, T> {
    pub fn new(cfg: SolverConfig) -> Self {
        Self {
            state: FitState::new(cfg),
        }
    }

    /// `Ea = 10^(0.1·j)` from `10^0` to `10^floor(log10 ea_ub)`, clipped to caller bounds.
    fn ea_grid(&self, ea_ub: T) -> Result<Vec<T>, KineticsError> {
        let bounds = &self.state.bounds;
        let emax = to_f64(&ea_ub.clone().log10()).floor();
        if !(emax >= 0.0) {
            return Err(KineticsError::precondition(format!(
                "Ea upper bound {} leaves no grid to regress over",
                to_f64(&ea_ub)
            )));
        }
        let count = (emax / DECADE_STEP).round() as usize + 1;
        let ten = lit::<T>(10.0);
        let grid: Vec<T> = (0..count)
            .map(|j| ten.clone().powf(lit(DECADE_STEP * j as f64)))
            .filter(|ea| bounds.min_ea.as_ref().is_none_or(|m| ea >= m))
            .filter(|ea| bounds.max_ea.as_ref().is_none_or(|m| ea <= m))
            .collect();
        if grid.len() < 2 {
            return Err(KineticsError::precondition(
                "fewer than 2 Ea grid points inside the caller bounds",
            ));
        }
        Ok(grid)
    }
}

/// `(ln τ_eff, 1/T_eff)` of one profile from `-ln Ω(1, Ea)` over `grid`.
pub fn effective_exposure<T: Real>(
    profile: ProfileView<'_, T>,
    grid: &[T],
    cfg: &SolverConfig,
) -> Result<(T, T), KineticsError> {
    let mut integral = ArrheniusIntegral::new(T::one(), T::zero()).with_config(cfg);
    let mut eas = Vec::with_capacity(grid.len());
    let mut log_omegas = Vec::with_capacity(grid.len());
    for ea in grid {
        integral.set_ea(ea.clone());
        let omega = integral.evaluate(profile)?;
        if omega > T::zero() && omega.is_finite() {
            eas.push(ea.clone());
            log_omegas.push(-omega.ln());
        }
    }
    let line = linear_regression(&eas, &log_omegas)?;
    Ok((-line.intercept, line.slope * gas_constant::<T>()))
}

impl<'a, T: Real> ArrheniusFit<'a, T> for EffectiveExposureFit<'a, T> {
    fn method(&self) -> FitMethod {
        FitMethod::EffectiveExposure
    }

    fn state(&self) -> &FitState<'a, T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FitState<'a, T> {
        &mut self.state
    }

    fn exec(&self) -> Result<FitResult<T>, KineticsError> {
        tracing::trace!("effective exposure regression: executing fit");
        self.state.require_profiles()?;
        let cfg = &self.state.cfg;
        let ea_ub = ea_upper_bound(&self.state.profiles, cfg)?;
        let grid = self.ea_grid(ea_ub)?;

        let mut ln_tau = Vec::with_capacity(self.state.profiles.len());
        let mut inv_t = Vec::with_capacity(self.state.profiles.len());
        for (i, profile) in self.state.profiles.iter().enumerate() {
            let (log_tau, inv_temp) = effective_exposure(*profile, &grid, cfg)?;
            tracing::debug!(
                profile = i,
                tau_eff = to_f64(&log_tau.clone().exp()),
                t_eff = to_f64(&(T::one() / inv_temp.clone())),
                "effective exposure"
            );
            ln_tau.push(log_tau);
            inv_t.push(inv_temp);
        }
        regress_exposures(&inv_t, &ln_tau)
    }
}
