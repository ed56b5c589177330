//! Shared domain types.
//!
//! Plain data: rate coefficients, fit bounds and results, and the closed sets
//! of quadrature kernels and fitting strategies selectable from the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::KineticsError;
use crate::math::real::{Real, to_f64};

/// Coefficients of the rate law `k(T) = A · Tⁿ · exp(-Ea / (R·T))`.
///
/// `n = 0` is the plain Arrhenius form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParameters<T> {
    /// Frequency factor, 1/s.
    pub a: T,
    /// Activation energy, J/mol.
    pub ea: T,
    /// Temperature exponent of the prefactor.
    pub n: T,
}

impl<T: Real> RateParameters<T> {
    pub fn new(a: T, ea: T) -> Self {
        Self { a, ea, n: T::zero() }
    }

    pub fn with_exponent(mut self, n: T) -> Self {
        self.n = n;
        self
    }

    pub fn validate(&self) -> Result<(), KineticsError> {
        if !(self.a.is_finite() && self.a > T::zero()) {
            return Err(KineticsError::precondition(format!(
                "frequency factor must be finite and > 0, got {}",
                to_f64(&self.a)
            )));
        }
        if !(self.ea.is_finite() && self.n.is_finite()) {
            return Err(KineticsError::precondition("Ea and n must be finite"));
        }
        Ok(())
    }
}

/// Optional search bounds for the fitting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitBounds<T> {
    pub min_ea: Option<T>,
    pub max_ea: Option<T>,
    pub min_a: Option<T>,
    pub max_a: Option<T>,
}

impl<T> Default for FitBounds<T> {
    fn default() -> Self {
        Self {
            min_ea: None,
            max_ea: None,
            min_a: None,
            max_a: None,
        }
    }
}

/// Fitted coefficients. A strategy that cannot determine a coefficient leaves it unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult<T> {
    pub a: Option<T>,
    pub ea: Option<T>,
}

impl<T> Default for FitResult<T> {
    fn default() -> Self {
        Self { a: None, ea: None }
    }
}

impl<T: Real> FitResult<T> {
    pub fn new(a: T, ea: T) -> Self {
        Self {
            a: Some(a),
            ea: Some(ea),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.a.is_some() && self.ea.is_some()
    }

    pub fn parameters(&self) -> Option<RateParameters<T>> {
        Some(RateParameters::new(self.a.clone()?, self.ea.clone()?))
    }
}

/// Quadrature used to evaluate the damage integral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrature {
    /// Trapezoid rule on the sampled rate. Works for any `n` and `Ea`.
    #[default]
    Trapezoid,
    /// Exact integral of the rate over piecewise-linear temperature segments.
    ///
    /// Only defined for `n = 0` and `Ea >= 0`.
    ExponentialIntegral,
}

/// Strategy used to estimate `(A, Ea)` from threshold profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FitMethod {
    /// Minimize the spread of `ln Ω` over `Ea`, then the threshold error over `A`.
    Variance,
    /// Regress per-profile effective exposure times on effective temperatures.
    EffectiveExposure,
    /// Treat each profile as a square pulse at its peak temperature.
    ConstantTemperature,
    /// Brute-force the threshold error over an `(A, Ea)` grid.
    Grid,
}

impl FitMethod {
    pub fn display_name(self) -> &'static str {
        match self {
            FitMethod::Variance => "Variance minimization",
            FitMethod::EffectiveExposure => "Effective exposure regression",
            FitMethod::ConstantTemperature => "Constant temperature regression",
            FitMethod::Grid => "Scaling factor grid",
        }
    }

    pub fn all() -> [FitMethod; 4] {
        [
            FitMethod::Variance,
            FitMethod::EffectiveExposure,
            FitMethod::ConstantTemperature,
            FitMethod::Grid,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_parameters_validation() {
        assert!(RateParameters::new(3.1e99, 6.28e5).validate().is_ok());
        assert!(RateParameters::new(0.0, 6.28e5).validate().is_err());
        assert!(RateParameters::new(f64::INFINITY, 6.28e5).validate().is_err());
        assert!(RateParameters::new(1.0, 1.0).with_exponent(f64::NAN).validate().is_err());
    }

    #[test]
    fn fit_result_completeness() {
        let r = FitResult::new(1.0, 2.0);
        assert!(r.is_complete());
        assert_eq!(r.parameters().unwrap().ea, 2.0);
        assert!(FitResult::<f64>::default().parameters().is_none());
    }
}
