//! Coefficient uncertainty from perturbed reruns.
//!
//! The fit is repeated on copies of the profiles with the baseline shifted by
//! `δT0` and with the rise scaled by `1 + δs`. Each rerun's deviation from the
//! nominal coefficients is combined as a root-sum-of-squares.

use crate::domain::{FitBounds, FitMethod, FitResult, SolverConfig, ThermalProfile};
use crate::error::KineticsError;
use crate::fit::fitter_for;
use crate::math::real::{Real, to_f64};

/// Measurement perturbations applied to every profile. Unset entries are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbation<T> {
    /// Absolute temperature offset `δT0`, K.
    pub offset: Option<T>,
    /// Relative error of the temperature rise `δs`.
    pub rise: Option<T>,
}

impl<T> Default for Perturbation<T> {
    fn default() -> Self {
        Self {
            offset: None,
            rise: None,
        }
    }
}

impl<T> Perturbation<T> {
    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.rise.is_none()
    }
}

fn run<T: Real>(
    method: FitMethod,
    cfg: &SolverConfig,
    bounds: &FitBounds<T>,
    profiles: &[ThermalProfile<T>],
) -> Result<FitResult<T>, KineticsError> {
    let mut fit = fitter_for::<T>(method, cfg.clone());
    fit.set_bounds(bounds.clone());
    for profile in profiles {
        fit.add_profile(profile.view());
    }
    fit.exec()
}

fn rss<T: Real>(nominal: Option<T>, reruns: &[FitResult<T>], pick: impl Fn(&FitResult<T>) -> Option<T>) -> Option<T> {
    let nominal = nominal?;
    let mut total = T::zero();
    for rerun in reruns {
        let delta = pick(rerun)? - nominal.clone();
        total += delta.clone() * delta;
    }
    Some(total.sqrt())
}

/// Nominal fit and its uncertainty.
///
/// A coefficient's uncertainty is unset when the nominal fit or any rerun
/// left it unset.
pub fn fit_with_uncertainty<T: Real>(
    method: FitMethod,
    cfg: &SolverConfig,
    bounds: &FitBounds<T>,
    profiles: &[ThermalProfile<T>],
    perturbation: &Perturbation<T>,
) -> Result<(FitResult<T>, FitResult<T>), KineticsError> {
    let nominal = run(method, cfg, bounds, profiles)?;

    let mut reruns = Vec::with_capacity(2);
    if let Some(offset) = &perturbation.offset {
        tracing::trace!(method = method.display_name(), offset = to_f64(offset), "rerunning with baseline offset");
        let shifted: Vec<_> = profiles.iter().map(|p| p.offset(offset.clone())).collect();
        reruns.push(run(method, cfg, bounds, &shifted)?);
    }
    if let Some(rise) = &perturbation.rise {
        tracing::trace!(method = method.display_name(), rise = to_f64(rise), "rerunning with scaled rise");
        let scaled: Vec<_> = profiles.iter().map(|p| p.scale_rise(T::one() + rise.clone())).collect();
        reruns.push(run(method, cfg, bounds, &scaled)?);
    }

    let spread = FitResult {
        a: rss(nominal.a.clone(), &reruns, |r| r.a.clone()),
        ea: rss(nominal.ea.clone(), &reruns, |r| r.ea.clone()),
    };
    Ok((nominal, spread))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fixtures::{self, rel};

    #[test]
    fn combines_reruns_as_root_sum_of_squares() {
        let profiles = fixtures::threshold_pulses();
        let cfg = SolverConfig::default();
        let bounds = FitBounds::default();
        let method = FitMethod::ConstantTemperature;
        let perturbation = Perturbation {
            offset: Some(0.5),
            rise: Some(0.05),
        };

        let (nominal, spread) = fit_with_uncertainty(method, &cfg, &bounds, &profiles, &perturbation).unwrap();

        let shifted: Vec<_> = profiles.iter().map(|p| p.offset(0.5)).collect();
        let scaled: Vec<_> = profiles.iter().map(|p| p.scale_rise(1.05)).collect();
        let r1 = run(method, &cfg, &bounds, &shifted).unwrap();
        let r2 = run(method, &cfg, &bounds, &scaled).unwrap();

        let (ea0, ea1, ea2) = (nominal.ea.unwrap(), r1.ea.unwrap(), r2.ea.unwrap());
        let expected = ((ea1 - ea0).powi(2) + (ea2 - ea0).powi(2)).sqrt();
        assert!(rel(spread.ea.unwrap(), expected) < 1e-12);
        assert!(spread.ea.unwrap() > 0.0);
        assert!(spread.a.unwrap() > 0.0);
    }

    #[test]
    fn no_perturbation_gives_zero_spread() {
        let profiles = fixtures::threshold_pulses();
        let (nominal, spread) = fit_with_uncertainty(
            FitMethod::ConstantTemperature,
            &SolverConfig::default(),
            &FitBounds::default(),
            &profiles,
            &Perturbation::default(),
        )
        .unwrap();
        assert!(nominal.is_complete());
        assert_eq!(spread, FitResult::new(0.0, 0.0));
    }

    #[test]
    fn missing_rerun_coefficient_leaves_spread_unset() {
        let nominal = Some(1.0);
        let reruns = [FitResult::new(1.5, 2.0), FitResult::default()];
        assert_eq!(rss(nominal, &reruns, |r| r.a), None);
        assert_eq!(rss(nominal, &reruns[..1], |r| r.a), Some(0.5));
        assert_eq!(rss::<f64>(None, &reruns[..1], |r| r.a), None);
    }
}
