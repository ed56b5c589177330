//! Upper bound on `Ea` implied by floating-point range.
//!
//! With `A = 1`, `Ω(Ea)` decreases monotonically and eventually underflows to
//! exactly zero. Past that point nothing can be learned from a profile, so the
//! largest `Ea` with `Ω > 0` bounds every `Ea` search. Wider scalar types
//! underflow later and therefore search further.

use crate::domain::{ProfileView, SolverConfig};
use crate::error::KineticsError;
use crate::integrate::ArrheniusIntegral;
use crate::math::real::{Real, lit, nan, to_f64};
use crate::math::roots::{Tolerance, bracket_and_solve_root};

/// Largest `Ea` keeping `Ω(A = 1, Ea) > 0` for this profile.
pub fn profile_ea_upper_bound<T: Real>(
    profile: ProfileView<'_, T>,
    cfg: &SolverConfig,
) -> Result<T, KineticsError> {
    let mut integral = ArrheniusIntegral::new(T::one(), T::zero()).with_config(cfg);
    let mut failure: Option<KineticsError> = None;
    let indicator = |ea: T| -> T {
        integral.set_ea(ea);
        match integral.evaluate(profile) {
            Ok(omega) if omega > T::zero() => T::one(),
            Ok(_) => -T::one(),
            Err(err) => {
                failure.get_or_insert(err);
                nan()
            }
        }
    };

    let result = bracket_and_solve_root(
        indicator,
        lit(cfg.ea_search_guess),
        lit(cfg.expansion_factor),
        false,
        Tolerance::bits(cfg.root_bits::<T>()),
        cfg.ea_bound_iterations(cfg.root_bits::<T>()),
    );
    if let Some(err) = failure {
        return Err(err);
    }
    let (lo, _hi) = result?;
    Ok(lo)
}

/// Smallest per-profile bound. Profiles whose bound cannot be found are skipped.
pub fn ea_upper_bound<T: Real>(profiles: &[ProfileView<'_, T>], cfg: &SolverConfig) -> Result<T, KineticsError> {
    tracing::trace!(profiles = profiles.len(), "searching for an upper bound on Ea");
    let mut bound: Option<T> = None;
    for (i, profile) in profiles.iter().enumerate() {
        match profile_ea_upper_bound(*profile, cfg) {
            Ok(ub) => {
                tracing::debug!(profile = i, ea_ub = to_f64(&ub), "Ea upper bound");
                bound = Some(match bound {
                    Some(b) if b <= ub => b,
                    _ => ub,
                });
            }
            Err(err) => {
                tracing::warn!(profile = i, error = %err, "could not bound Ea from profile; skipping");
            }
        }
    }

    bound.ok_or_else(|| {
        tracing::error!("could not determine an upper bound on Ea from any profile");
        KineticsError::NoUsableProfiles("no profile yields an upper bound on Ea".into())
    })
}
