//! Least squares solvers.
//!
//! The fitting strategies repeatedly solve single-predictor regressions of the
//! form `y = b + m·x` (per-profile effective exposures, then across profiles).
//!
//! Implementation choices:
//! - We solve via SVD so that rank deficiency is *detected* (a collinear or
//!   constant predictor) rather than producing silent garbage from a normal
//!   equation inverse.
//! - The predictor is centered before solving. `1/T` columns live around 3e-3
//!   with a spread of ~1e-4, which is nearly collinear with the intercept column
//!   otherwise.

use nalgebra::{DMatrix, DVector};

use crate::error::KineticsError;
use crate::math::real::{Real, from_usize};

/// Intercept/slope pair returned by [`linear_regression`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T> {
    pub intercept: T,
    pub slope: T,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the design matrix is rank deficient or the solution is not finite.
pub fn solve_least_squares<T: Real>(x: &DMatrix<T>, y: &DVector<T>) -> Option<DVector<T>> {
    let cols = x.ncols();
    let svd = x.clone().svd(true, true);

    let sigma_max = svd.singular_values.iter().cloned().fold(T::zero(), |a, b| a.max(b));
    if !(sigma_max > T::zero()) {
        return None;
    }
    let size = from_usize::<T>(x.nrows().max(cols));
    let tol = sigma_max * T::default_epsilon() * size;

    if svd.rank(tol.clone()) < cols {
        return None;
    }

    let beta = svd.solve(y, tol).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}

/// Ordinary least squares fit of `y = intercept + slope·x`.
pub fn linear_regression<T: Real>(x: &[T], y: &[T]) -> Result<LinearFit<T>, KineticsError> {
    if x.len() != y.len() {
        return Err(KineticsError::precondition(format!(
            "regression inputs differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(KineticsError::IllConditioned(format!(
            "need at least 2 points, got {n}"
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(KineticsError::IllConditioned("non-finite regression input".into()));
    }

    let mean_x = x.iter().fold(T::zero(), |acc, v| acc + v.clone()) / from_usize::<T>(n);

    let mut design = DMatrix::<T>::zeros(n, 2);
    for (i, xi) in x.iter().enumerate() {
        design[(i, 0)] = T::one();
        design[(i, 1)] = xi.clone() - mean_x.clone();
    }
    let rhs = DVector::<T>::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs).ok_or_else(|| {
        KineticsError::IllConditioned(format!("singular design matrix ({n} points)"))
    })?;

    let slope = beta[1].clone();
    let intercept = beta[0].clone() - slope.clone() * mean_x;
    if !(slope.is_finite() && intercept.is_finite()) {
        return Err(KineticsError::IllConditioned("non-finite coefficients".into()));
    }
    Ok(LinearFit { intercept, slope })
}
