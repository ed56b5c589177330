//! Variance minimization followed by scaling-factor minimization.
//!
//! Stage 1 finds `Ea`. For a threshold profile `Ω(A, Ea) = 1`, so every
//! profile implies `ln A = -ln Ω(1, Ea)`. At the true `Ea` these implied values
//! agree, so `Ea` minimizes their sum of squared deviations. The minimum is
//! located with a log-spaced scan over `Ea` and then refined with Brent over `Ea`.
//!
//! Stage 2 finds `A`. With `Ea` fixed, `A` minimizes `Σ (x_i - 1)²` where `x_i`
//! is each profile's threshold scale factor.

use crate::domain::{FitMethod, FitResult, ProfileView, SolverConfig};
use crate::error::KineticsError;
use crate::fit::bounds::ea_upper_bound;
use crate::fit::{ArrheniusFit, FitState};
use crate::integrate::ArrheniusIntegral;
use crate::math::grid::log_space;
use crate::math::minima::brent_find_minima;
use crate::math::real::{Real, from_usize, infinity, lit, to_f64};
use crate::threshold::ThresholdCalculator;

#[derive(Debug, Clone)]
pub struct VarianceFit<'a, T> {
    state: FitState<'a, T>,
}

impl<'a, T: Real> VarianceFit<'a, T> {
    pub fn new(cfg: SolverConfig) -> Self {
        Self {
            state: FitState::new(cfg),
        }
    }
}

/// Sum of squared deviations of `-ln Ω(1, Ea)` across profiles, `+∞` if any saturates.
pub(crate) fn log_a_spread<T: Real>(
    integral: &mut ArrheniusIntegral<T>,
    profiles: &[ProfileView<'_, T>],
    ea: T,
) -> T {
    integral.set_a(T::one());
    integral.set_ea(ea);

    let mut log_as = Vec::with_capacity(profiles.len());
    for profile in profiles {
        match integral.evaluate(*profile) {
            Ok(omega) if omega > T::zero() && omega.is_finite() => log_as.push(-omega.ln()),
            _ => return infinity(),
        }
    }
    let mean = log_as.iter().fold(T::zero(), |acc, v| acc + v.clone()) / from_usize::<T>(log_as.len());
    log_as.into_iter().fold(T::zero(), |acc, v| {
        let d = v - mean.clone();
        acc + d.clone() * d
    })
}

/// `Σ (x_i - 1)²` over threshold scale factors, `+∞` if any solve fails.
pub(crate) fn scaling_error<T: Real>(calc: &mut ThresholdCalculator<T>, profiles: &[ProfileView<'_, T>], a: T, ea: T) -> T {
    calc.set_a(a);
    calc.set_ea(ea);
    let mut total = T::zero();
    for profile in profiles {
        match calc.solve(*profile) {
            Ok(x) => {
                let d = x - T::one();
                total += d.clone() * d;
            }
            Err(_) => return infinity(),
        }
    }
    total
}

impl<'a, T: Real> VarianceFit<'a, T> {
    fn fit_ea(&self) -> Result<T, KineticsError> {
        let FitState { profiles, bounds, cfg } = &self.state;
        let ea_ub = ea_upper_bound(profiles, cfg)?;

        let mut min_ln = T::zero();
        let mut max_ln = ea_ub.ln();
        if let Some(min_ea) = &bounds.min_ea {
            min_ln = min_ln.max(min_ea.clone().ln());
        }
        if let Some(max_ea) = &bounds.max_ea {
            max_ln = max_ln.min(max_ea.clone().ln());
        }
        if !(max_ln > min_ln) {
            return Err(KineticsError::precondition(format!(
                "empty Ea search range [{}, {}]",
                to_f64(&min_ln.exp()),
                to_f64(&max_ln.exp())
            )));
        }

        let step = lit::<T>(cfg.ea_scan_step);
        let steps = to_f64(&((max_ln.clone() - min_ln.clone()) / step).floor()).max(0.0) as usize + 1;
        let grid = log_space(min_ln.exp(), max_ln.exp(), steps.max(3))?;
        tracing::trace!(
            min = to_f64(&grid[0]),
            max = to_f64(&grid[grid.len() - 1]),
            points = grid.len(),
            "scanning Ea for the minimum spread of ln A"
        );

        let mut integral = ArrheniusIntegral::new(T::one(), T::zero()).with_config(cfg);
        let mut best = 0;
        let mut best_cost = log_a_spread(&mut integral, profiles, grid[0].clone());
        for (i, ea) in grid.iter().enumerate().skip(1) {
            let cost = log_a_spread(&mut integral, profiles, ea.clone());
            if cost < best_cost {
                best = i;
                best_cost = cost;
            }
        }
        if !best_cost.is_finite() {
            tracing::error!("ln A spread saturated over the whole Ea scan");
            return Err(KineticsError::NoUsableProfiles(
                "damage integral saturated at every scanned Ea".into(),
            ));
        }

        let lo = grid[best.saturating_sub(1)].clone();
        let hi = grid[(best + 1).min(grid.len() - 1)].clone();
        tracing::trace!(lo = to_f64(&lo), hi = to_f64(&hi), "refining Ea with Brent");
        let (ea, cost) = brent_find_minima(
            |ea| log_a_spread(&mut integral, profiles, ea),
            lo,
            hi,
            cfg.root_bits::<T>(),
            cfg.minimize_max_iterations,
        )?;
        tracing::debug!(ea = to_f64(&ea), cost = to_f64(&cost), "Ea from ln A spread");
        Ok(ea)
    }

    fn fit_a(&self, ea: T) -> Result<T, KineticsError> {
        let FitState { profiles, bounds, cfg } = &self.state;

        let (mut lo, mut hi) = (bounds.min_a.clone(), bounds.max_a.clone());
        if lo.is_none() || hi.is_none() {
            let integral = ArrheniusIntegral::new(T::one(), ea.clone()).with_config(cfg);
            let mut implied_min: Option<T> = None;
            let mut implied_max: Option<T> = None;
            for profile in profiles {
                let implied = T::one() / integral.evaluate(*profile)?;
                if !(implied.is_finite() && implied > T::zero()) {
                    continue;
                }
                implied_min = Some(match implied_min {
                    Some(m) => m.min(implied.clone()),
                    None => implied.clone(),
                });
                implied_max = Some(match implied_max {
                    Some(m) => m.max(implied),
                    None => implied,
                });
            }
            lo = lo.or(implied_min);
            hi = hi.or(implied_max);
        }
        let (Some(lo), Some(hi)) = (lo, hi) else {
            return Err(KineticsError::NoUsableProfiles(
                "no profile gives a finite A estimate".into(),
            ));
        };
        if lo == hi {
            return Ok(lo);
        }
        if lo > hi {
            return Err(KineticsError::precondition(format!(
                "empty A search range [{}, {}]",
                to_f64(&lo),
                to_f64(&hi)
            )));
        }

        tracing::trace!(lo = to_f64(&lo), hi = to_f64(&hi), "minimizing threshold error over A");
        let mut calc = ThresholdCalculator::new(ArrheniusIntegral::new(T::one(), ea.clone()), cfg.clone());
        let (a, cost) = brent_find_minima(
            |a| scaling_error(&mut calc, profiles, a, ea.clone()),
            lo,
            hi,
            cfg.root_bits::<T>(),
            cfg.minimize_max_iterations,
        )?;
        tracing::debug!(a = to_f64(&a), cost = to_f64(&cost), "A from scaling factors");
        Ok(a)
    }
}

impl<'a, T: Real> ArrheniusFit<'a, T> for VarianceFit<'a, T> {
    fn method(&self) -> FitMethod {
        FitMethod::Variance
    }

    fn state(&self) -> &FitState<'a, T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FitState<'a, T> {
        &mut self.state
    }

    fn exec(&self) -> Result<FitResult<T>, KineticsError> {
        tracing::trace!("variance minimization: executing fit");
        self.state.require_profiles()?;
        let ea = self.fit_ea()?;
        let a = self.fit_a(ea.clone())?;
        Ok(FitResult::new(a, ea))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fixtures::{self, A, EA, rel};

    #[test]
    fn recovers_coefficients_from_threshold_pulses() {
        let profiles = fixtures::threshold_pulses();
        let mut fit = VarianceFit::new(SolverConfig::default());
        for p in &profiles {
            fit.add_profile(p.view());
        }
        let result = fit.exec().unwrap();
        let (a, ea) = (result.a.unwrap(), result.ea.unwrap());
        assert!(rel(ea, EA) < 1e-5, "Ea={ea}");
        assert!(rel(a, A) < 1e-3, "A={a}");
    }

    #[test]
    fn caller_bounds_narrow_the_search() {
        let profiles = fixtures::threshold_pulses();
        let mut fit = VarianceFit::new(SolverConfig::default());
        for p in &profiles {
            fit.add_profile(p.view());
        }
        fit.set_min_ea(5.0e5);
        fit.set_max_ea(7.0e5);
        let ea = fit.exec().unwrap().ea.unwrap();
        assert!(rel(ea, EA) < 1e-5);

        fit.set_min_ea(8.0e5);
        fit.set_max_ea(7.0e5);
        assert!(matches!(fit.exec(), Err(KineticsError::Precondition(_))));
    }

    #[test]
    fn spread_is_zero_at_true_ea_and_infinite_when_saturated() {
        let profiles = fixtures::threshold_pulses();
        let views: Vec<_> = profiles.iter().map(|p| p.view()).collect();
        let mut integral = ArrheniusIntegral::new(1.0, 0.0);
        assert!(log_a_spread(&mut integral, &views, EA) < 1e-12);
        assert!(log_a_spread(&mut integral, &views, 0.5 * EA) > 1.0);
        assert_eq!(log_a_spread(&mut integral, &views, 1.0e9), f64::INFINITY);
    }
}
