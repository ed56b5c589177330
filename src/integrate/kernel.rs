//! Per-segment quadrature kernels.
//!
//! A kernel turns each sample into a cached value, combines consecutive cached
//! values into a segment contribution, and supplies the constant factor
//! applied once to the final sum. The summation loops in [`super::parallel`]
//! are kernel-agnostic.

use crate::error::KineticsError;
use crate::math::expint::expint;
use crate::math::real::{Real, gas_constant, lit};

pub trait DamageKernel<T: Real>: Sync {
    /// Value cached per sample and reused by the segments on both sides.
    type Sample: Clone + Send;

    fn sample(&self, temperature: T) -> Result<Self::Sample, KineticsError>;

    /// Contribution of one segment before scaling. Callers skip `dt == 0`.
    fn segment(&self, dt: T, prev: &(T, Self::Sample), cur: &(T, Self::Sample)) -> T;

    fn scale(&self) -> T;
}

/// Trapezoid rule on `Tⁿ · exp(-Ea/(R·T))`, scaled by `A/2`.
#[derive(Debug, Clone, Copy)]
pub struct Trapezoid<T> {
    a: T,
    beta: T,
    n: T,
}

impl<T: Real> Trapezoid<T> {
    pub fn new(a: T, ea: T, n: T) -> Self {
        Self {
            a,
            beta: ea / gas_constant::<T>(),
            n,
        }
    }
}

impl<T: Real> DamageKernel<T> for Trapezoid<T> {
    type Sample = T;

    fn sample(&self, temperature: T) -> Result<T, KineticsError> {
        let prefactor = if self.n == T::zero() {
            T::one()
        } else {
            temperature.clone().powf(self.n.clone())
        };
        Ok(prefactor * (-self.beta.clone() / temperature).exp())
    }

    fn segment(&self, dt: T, prev: &(T, T), cur: &(T, T)) -> T {
        (prev.1.clone() + cur.1.clone()) * dt
    }

    fn scale(&self) -> T {
        self.a.clone() * lit(0.5)
    }
}

/// Exact integral of `exp(-α/T)` over piecewise-linear temperature segments.
///
/// With `Q(T) = T·E₂(α/T)`, a segment contributes `Δt·(Q₁ - Q₀)/(T₁ - T₀)`.
/// When `|1/T₁ - 1/T₀|` is within `0.001/α` the difference quotient loses
/// precision and the constant-temperature term `exp(-α/T₁)·Δt` is used.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialIntegral<T> {
    a: T,
    alpha: T,
    tolerance: T,
}

impl<T: Real> ExponentialIntegral<T> {
    /// Only the `n = 0`, `Ea >= 0` form has this closed form.
    pub fn new(a: T, ea: T, n: T) -> Result<Self, KineticsError> {
        if n != T::zero() {
            return Err(KineticsError::precondition(
                "exponential-integral quadrature requires n = 0",
            ));
        }
        if ea < T::zero() {
            return Err(KineticsError::precondition(
                "exponential-integral quadrature requires Ea >= 0",
            ));
        }
        let alpha = ea / gas_constant::<T>();
        Ok(Self {
            a,
            tolerance: lit::<T>(0.001) / alpha.clone(),
            alpha,
        })
    }
}

impl<T: Real> DamageKernel<T> for ExponentialIntegral<T> {
    /// `(exp(-α/T), T·E₂(α/T))`
    type Sample = (T, T);

    fn sample(&self, temperature: T) -> Result<(T, T), KineticsError> {
        let x = self.alpha.clone() / temperature.clone();
        Ok(((-x.clone()).exp(), temperature * expint(2, x)?))
    }

    fn segment(&self, dt: T, prev: &(T, (T, T)), cur: &(T, (T, T))) -> T {
        let (t0, (_, q0)) = prev;
        let (t1, (boltzmann, q1)) = cur;
        if (T::one() / t1.clone() - T::one() / t0.clone()).abs() > self.tolerance {
            (q1.clone() - q0.clone()) * dt / (t1.clone() - t0.clone())
        } else {
            boltzmann.clone() * dt
        }
    }

    fn scale(&self) -> T {
        self.a.clone()
    }
}
