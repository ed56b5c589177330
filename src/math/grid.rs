//! Search grids.
//!
//! The fitting strategies localize minima with deterministic scans before any
//! refinement: log-spaced for quantities spanning many decades (`Ea`, `A`) and
//! linear for the brute-force scaling-factor grid.

use crate::error::KineticsError;
use crate::math::real::{Real, from_usize};

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space<T: Real>(min: T, max: T, steps: usize) -> Result<Vec<T>, KineticsError> {
    let zero = T::zero();
    if !(min.is_finite() && max.is_finite() && min > zero && max > zero && max >= min) {
        return Err(KineticsError::precondition(format!(
            "invalid log grid range: min={min}, max={max} (must be finite, >0, and max>=min)"
        )));
    }
    if steps < 2 {
        return Err(KineticsError::precondition("grid steps must be >= 2"));
    }

    let ln_min = min.clone().ln();
    let ln_max = max.clone().ln();
    let step = (ln_max - ln_min.clone()) / from_usize::<T>(steps - 1);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min.clone() + step.clone() * from_usize::<T>(i)).exp());
    }
    // Pin the endpoints so callers can rely on exact bounds.
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space<T: Real>(min: T, max: T, steps: usize) -> Result<Vec<T>, KineticsError> {
    if !(min.is_finite() && max.is_finite() && max >= min) {
        return Err(KineticsError::precondition(format!(
            "invalid linear grid range: min={min}, max={max}"
        )));
    }
    if steps < 2 {
        return Err(KineticsError::precondition("grid steps must be >= 2"));
    }

    let step = (max.clone() - min.clone()) / from_usize::<T>(steps - 1);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min.clone() + step.clone() * from_usize::<T>(i));
    }
    out[steps - 1] = max;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.1, 10.0, 5).unwrap();
        assert!((v[0] - 0.1_f64).abs() < 1e-12);
        assert!((v[v.len() - 1] - 10.0_f64).abs() < 1e-12);
        assert!((v[2] - 1.0_f64).abs() < 1e-12);
    }

    #[test]
    fn lin_space_is_evenly_spaced() {
        let v = lin_space(5.28e5, 7.28e5, 21).unwrap();
        assert_eq!(v.len(), 21);
        assert!((v[10] - 6.28e5_f64).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!(log_space(-1.0, 10.0, 5).is_err());
        assert!(log_space(1.0, 10.0, 1).is_err());
        assert!(lin_space(2.0, 1.0, 3).is_err());
    }
}
