//! Threshold solver.
//!
//! Given a profile with baseline `T0 = T[0]`, find the factor `x` such that the
//! scaled profile `T0 + x·(T - T0)` accumulates exactly the target damage
//! (`Ω = 1` by default). `x > 1` means the exposure was below threshold.
//!
//! The search runs on `ln(Ω / target)`, which is increasing in `x` for a
//! profile that rises above its baseline, and is `±∞` when `Ω` saturates.

use crate::domain::{ProfileView, SolverConfig};
use crate::error::KineticsError;
use crate::integrate::ArrheniusIntegral;
use crate::math::real::{Real, lit, nan, to_f64};
use crate::math::roots::{Tolerance, bracket_and_solve_root};

#[derive(Debug, Clone)]
pub struct ThresholdCalculator<T> {
    integral: ArrheniusIntegral<T>,
    target: T,
    cfg: SolverConfig,
}

impl<T: Real> ThresholdCalculator<T> {
    pub fn new(integral: ArrheniusIntegral<T>, cfg: SolverConfig) -> Self {
        Self {
            integral: integral.with_config(&cfg),
            target: T::one(),
            cfg,
        }
    }

    pub fn integral(&self) -> &ArrheniusIntegral<T> {
        &self.integral
    }

    pub fn integral_mut(&mut self) -> &mut ArrheniusIntegral<T> {
        &mut self.integral
    }

    pub fn set_a(&mut self, a: T) {
        self.integral.set_a(a);
    }

    pub fn set_ea(&mut self, ea: T) {
        self.integral.set_ea(ea);
    }

    /// Damage the solved profile must reach.
    pub fn set_threshold_omega(&mut self, omega: T) {
        self.target = omega;
    }

    pub fn threshold_omega(&self) -> T {
        self.target.clone()
    }

    /// Damage integral of the unscaled profile.
    pub fn omega(&self, profile: ProfileView<'_, T>) -> Result<T, KineticsError> {
        self.integral.evaluate(profile)
    }

    /// Scale factor of the temperature rise that brings `Ω` to the target.
    pub fn solve(&self, profile: ProfileView<'_, T>) -> Result<T, KineticsError> {
        if !(self.target.is_finite() && self.target > T::zero()) {
            return Err(KineticsError::precondition("threshold Ω must be finite and > 0"));
        }

        let time = profile.time();
        let base = profile.temperature()[0].clone();
        let rise: Vec<T> = profile.temperature().iter().map(|t| t.clone() - base.clone()).collect();
        let mut scratch = vec![base.clone(); rise.len()];
        let mut failure: Option<KineticsError> = None;

        let mut f = |x: T| -> T {
            for (dst, dt) in scratch.iter_mut().zip(&rise) {
                *dst = base.clone() + x.clone() * dt.clone();
            }
            match self.integral.evaluate(ProfileView::derived(time, &scratch)) {
                Ok(omega) => (omega / self.target.clone()).ln(),
                Err(err) => {
                    failure.get_or_insert(err);
                    nan()
                }
            }
        };

        let guess = if f(T::zero()) > T::zero() {
            -T::one()
        } else {
            T::one()
        };
        let result = bracket_and_solve_root(
            &mut f,
            guess,
            lit(self.cfg.expansion_factor),
            true,
            Tolerance::bits(self.cfg.root_bits::<T>()),
            self.cfg.root_max_iterations,
        );
        if let Some(err) = failure {
            return Err(err);
        }
        let (lo, hi) = result?;
        let x = (lo + hi) / lit(2.0);
        tracing::trace!(threshold = to_f64(&x), "solved threshold scale factor");
        Ok(x)
    }

    /// Temperatures of `profile` with the rise scaled by `x`.
    pub fn threshold_profile(&self, profile: ProfileView<'_, T>, x: T) -> Vec<T> {
        let base = profile.temperature()[0].clone();
        profile
            .temperature()
            .iter()
            .map(|t| base.clone() + x.clone() * (t.clone() - base.clone()))
            .collect()
    }
}
