//! Scalar abstraction shared by every numerical routine.
//!
//! Everything in the core is generic over [`Real`] rather than hard-coded to
//! `f64`. Precision-dependent tolerances (root-finding bits, Brent bits) are
//! derived from the scalar's own machine epsilon, so a wider `RealField` type
//! automatically gets tighter convergence and a larger usable `Ea` range.
//!
//! `Real` does not require `Copy`: heap-backed multiprecision `RealField`
//! implementations are `Clone` only, so values that are used more than once
//! are cloned explicitly.

use nalgebra::RealField;

/// Scalar type usable by the integrator, threshold solver and fitters.
pub trait Real: RealField + Send + Sync {}

impl<T: RealField + Send + Sync> Real for T {}

/// Universal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.3144598;

/// Lift an `f64` literal into `T`.
#[inline]
pub fn lit<T: Real>(value: f64) -> T {
    nalgebra::convert(value)
}

#[inline]
pub fn gas_constant<T: Real>() -> T {
    lit(GAS_CONSTANT)
}

/// Lossy conversion for logging/reporting. Returns NaN if `value` has no `f64` image.
#[inline]
pub fn to_f64<T: Real>(value: &T) -> f64 {
    nalgebra::try_convert::<T, f64>(value.clone()).unwrap_or(f64::NAN)
}

#[inline]
pub fn from_usize<T: Real>(value: usize) -> T {
    lit(value as f64)
}

/// NaN test that does not rely on an inherent `is_nan`.
#[inline]
pub fn is_nan<T: Real>(value: &T) -> bool {
    value.partial_cmp(value).is_none()
}

#[inline]
pub fn infinity<T: Real>() -> T {
    T::one() / T::zero()
}

#[inline]
pub fn nan<T: Real>() -> T {
    T::zero() / T::zero()
}

/// Number of binary digits in the significand of `T` (53 for `f64`).
pub fn digits<T: Real>() -> u32 {
    let two = lit::<T>(2.0);
    let mut x = T::default_epsilon();
    let mut bits = 1;
    while x < T::one() && bits < 4096 {
        x *= two.clone();
        bits += 1;
    }
    bits
}

/// `2^exp` in `T`.
#[inline]
pub fn pow2<T: Real>(exp: i32) -> T {
    lit::<T>(2.0).powi(exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_match_ieee_formats() {
        assert_eq!(digits::<f64>(), 53);
        assert_eq!(digits::<f32>(), 24);
    }

    #[test]
    fn literal_roundtrip() {
        let r: f64 = gas_constant();
        assert_eq!(to_f64(&r), GAS_CONSTANT);
        assert_eq!(pow2::<f64>(-3), 0.125);
        assert_eq!(infinity::<f64>(), f64::INFINITY);
        assert!(is_nan(&nan::<f32>()));
    }
}
