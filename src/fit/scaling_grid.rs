//! Scaling-factor grid minimization.
//!
//! Brute-force evaluation of `Σ (x_i - 1)²` over an `(A, Ea)` grid:
//!
//! - `Ea`: linear over the caller bounds, or over `(0, Ea_ub]`
//! - `A`: linear over the caller bounds, or log-spaced between the smallest and
//!   largest `1/Ω_i(1, Ea)` implied by the profiles at that `Ea`
//!
//! The best grid point is reported as is. Grid rows are evaluated in parallel;
//! the winner is chosen deterministically (lowest cost, then lowest index).

use rayon::prelude::*;

use crate::domain::{FitMethod, FitResult, SolverConfig};
use crate::error::KineticsError;
use crate::fit::bounds::ea_upper_bound;
use crate::fit::variance::scaling_error;
use crate::fit::{ArrheniusFit, FitState};
use crate::integrate::ArrheniusIntegral;
use crate::math::grid::{lin_space, log_space};
use crate::math::real::{Real, from_usize, to_f64};
use crate::threshold::ThresholdCalculator;

#[derive(Debug, Clone)]
pub struct GridFit<'a, T> {
    state: FitState<'a, T>,
}

#[derive(Debug, Clone)]
struct Candidate<T> {
    idx: usize,
    a: T,
    ea: T,
    cost: T,
}

impl<'a, T: Real> GridFit<'a, T> {
    pub fn new(cfg: SolverConfig) -> Self {
        Self {
            state: FitState::new(cfg),
        }
    }

    fn ea_grid(&self) -> Result<Vec<T>, KineticsError> {
        let FitState { profiles, bounds, cfg } = &self.state;
        let steps = cfg.grid_ea_steps.max(2);
        match (bounds.min_ea.clone(), bounds.max_ea.clone()) {
            (Some(lo), Some(hi)) => lin_space(lo, hi, steps),
            (lo, hi) => {
                let hi = match hi {
                    Some(hi) => hi,
                    None => ea_upper_bound(profiles, cfg)?,
                };
                let lo = lo.unwrap_or_else(|| hi.clone() / from_usize::<T>(steps));
                lin_space(lo, hi, steps)
            }
        }
    }

    fn a_grid(&self, ea: T) -> Result<Vec<T>, KineticsError> {
        let FitState { profiles, bounds, cfg } = &self.state;
        let steps = cfg.grid_a_steps.max(2);
        if let (Some(lo), Some(hi)) = (&bounds.min_a, &bounds.max_a) {
            return lin_space(lo.clone(), hi.clone(), steps);
        }

        let integral = ArrheniusIntegral::new(T::one(), ea.clone()).with_config(cfg);
        let mut implied = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let value = T::one() / integral.evaluate(*profile)?;
            if !(value.is_finite() && value > T::zero()) {
                return Err(KineticsError::precondition(format!(
                    "damage integral saturates at Ea={}",
                    to_f64(&ea)
                )));
            }
            implied.push(value);
        }
        let lo = implied.iter().cloned().fold(implied[0].clone(), |m, v| m.min(v));
        let hi = implied.iter().cloned().fold(implied[0].clone(), |m, v| m.max(v));
        let lo = bounds.min_a.clone().unwrap_or(lo);
        let hi = bounds.max_a.clone().unwrap_or(hi);
        if lo == hi {
            return Ok(vec![lo]);
        }
        log_space(lo, hi, steps)
    }

    /// Best `(index, A, cost)` along one `Ea` row, `None` if nothing in the row evaluates.
    fn best_in_row(&self, ea: T) -> Option<(usize, T, T)> {
        let a_grid = match self.a_grid(ea.clone()) {
            Ok(grid) => grid,
            Err(err) => {
                tracing::debug!(ea = to_f64(&ea), error = %err, "skipping Ea row");
                return None;
            }
        };
        let mut calc = ThresholdCalculator::new(ArrheniusIntegral::new(T::one(), ea.clone()), self.state.cfg.clone());
        let mut best: Option<(usize, T, T)> = None;
        for (j, a) in a_grid.into_iter().enumerate() {
            let cost = scaling_error(&mut calc, &self.state.profiles, a.clone(), ea.clone());
            if !cost.is_finite() {
                continue;
            }
            if best.as_ref().is_none_or(|(_, _, c)| cost < *c) {
                best = Some((j, a, cost));
            }
        }
        best
    }
}

impl<'a, T: Real> ArrheniusFit<'a, T> for GridFit<'a, T> {
    fn method(&self) -> FitMethod {
        FitMethod::Grid
    }

    fn state(&self) -> &FitState<'a, T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FitState<'a, T> {
        &mut self.state
    }

    fn exec(&self) -> Result<FitResult<T>, KineticsError> {
        tracing::trace!("scaling factor grid: executing fit");
        self.state.require_profiles()?;
        let ea_grid = self.ea_grid()?;
        let a_steps = self.state.cfg.grid_a_steps.max(2);
        tracing::trace!(
            ea_min = to_f64(&ea_grid[0]),
            ea_max = to_f64(&ea_grid[ea_grid.len() - 1]),
            points = ea_grid.len(),
            "evaluating threshold error over the grid"
        );

        let candidates: Vec<Candidate<T>> = ea_grid
            .par_iter()
            .enumerate()
            .filter_map(|(i, ea)| {
                self.best_in_row(ea.clone()).map(|(j, a, cost)| Candidate {
                    idx: i * a_steps + j,
                    a,
                    ea: ea.clone(),
                    cost,
                })
            })
            .collect();

        let Some(first) = candidates.first() else {
            tracing::warn!("no grid point produced a finite threshold error");
            return Ok(FitResult::default());
        };
        let mut best = first;
        for c in &candidates[1..] {
            if c.cost < best.cost || (c.cost == best.cost && c.idx < best.idx) {
                best = c;
            }
        }
        tracing::debug!(a = to_f64(&best.a), ea = to_f64(&best.ea), cost = to_f64(&best.cost), "best grid point");
        Ok(FitResult::new(best.a.clone(), best.ea.clone()))
    }
}
