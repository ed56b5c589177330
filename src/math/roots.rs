//! Bracket-and-solve root finding.
//!
//! Used by the threshold solver (find the temperature-rise scale factor with
//! `ln Ω = ln target`), by the `Ea` upper-bound search (find where `Ω` first
//! underflows to exactly zero) and by the modified critical temperature.
//!
//! Two phases:
//! 1. walk away from an initial guess by a multiplicative factor until the sign
//!    of `f` changes;
//! 2. shrink the bracket with a secant step, falling back to bisection whenever
//!    a step fails to halve the interval. The interval therefore at least halves
//!    every second evaluation.
//!
//! Both phases draw from one iteration budget. Running out while expanding is a
//! [`KineticsError::Bracketing`], running out while refining is a
//! [`KineticsError::IterationBudget`].

use crate::error::KineticsError;
use crate::math::real::{Real, is_nan, lit, pow2, to_f64};

/// Relative convergence criterion on a bracket `[a, b]`.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance<T> {
    eps: T,
}

impl<T: Real> Tolerance<T> {
    /// Converged when the bracket agrees to `bits` binary digits.
    ///
    /// The tolerance never drops below `4ε`, which no bracket can beat.
    pub fn bits(bits: u32) -> Self {
        let bits = bits.max(1) as i32;
        let requested = pow2::<T>(1 - bits);
        let floor = T::default_epsilon() * lit(4.0);
        Self {
            eps: requested.max(floor),
        }
    }

    pub fn eps(&self) -> T {
        self.eps.clone()
    }

    pub fn converged(&self, a: &T, b: &T) -> bool {
        (a.clone() - b.clone()).abs() <= self.eps.clone() * a.clone().abs().min(b.clone().abs())
    }
}

fn sign<T: Real>(v: &T) -> i8 {
    if *v > T::zero() {
        1
    } else if *v < T::zero() {
        -1
    } else {
        0
    }
}

fn checked<T: Real>(x: &T, fx: T) -> Result<T, KineticsError> {
    if is_nan(&fx) {
        return Err(KineticsError::precondition(format!(
            "objective returned NaN at x={}",
            to_f64(x)
        )));
    }
    Ok(fx)
}

/// Find a bracket `(lo, hi)` around a root of `f` and shrink it to `tol`.
///
/// `rising` states whether `f` increases with `x`; together with the sign of
/// `f(guess)` it decides whether to walk away from zero (multiply by `factor`)
/// or towards it (divide). `guess` must be non-zero and `factor > 1`.
pub fn bracket_and_solve_root<T, F>(
    mut f: F,
    guess: T,
    factor: T,
    rising: bool,
    tol: Tolerance<T>,
    max_iter: usize,
) -> Result<(T, T), KineticsError>
where
    T: Real,
    F: FnMut(T) -> T,
{
    let zero = T::zero();
    if guess == zero || !guess.is_finite() {
        return Err(KineticsError::precondition("root search guess must be finite and non-zero"));
    }
    if !(factor > T::one()) {
        return Err(KineticsError::precondition("root search expansion factor must be > 1"));
    }

    let mut a = guess.clone();
    let mut fa = checked(&a, f(a.clone()))?;
    let mut b = a.clone();
    let mut fb = fa.clone();
    let mut count = 1usize;

    if fa == zero {
        return Ok((a.clone(), a));
    }

    let walk_outward = (fa < zero) == if guess < zero { !rising } else { rising };
    if walk_outward {
        while sign(&fb) == sign(&fa) {
            if count >= max_iter {
                return Err(KineticsError::Bracketing { iterations: count });
            }
            a = b.clone();
            fa = fb;
            b *= factor.clone();
            fb = checked(&b, f(b.clone()))?;
            count += 1;
        }
    } else {
        while sign(&fb) == sign(&fa) {
            if count >= max_iter {
                return Err(KineticsError::Bracketing { iterations: count });
            }
            b = a.clone();
            fb = fa;
            a /= factor.clone();
            fa = checked(&a, f(a.clone()))?;
            count += 1;
        }
    }

    let (lo, flo, hi, fhi) = if a <= b { (a, fa, b, fb) } else { (b, fb, a, fa) };
    refine(f, lo, flo, hi, fhi, tol, count, max_iter)
}

/// Shrink a sign-changing bracket until `tol` is met.
#[allow(clippy::too_many_arguments)]
fn refine<T, F>(
    mut f: F,
    mut lo: T,
    mut flo: T,
    mut hi: T,
    mut fhi: T,
    tol: Tolerance<T>,
    mut count: usize,
    max_iter: usize,
) -> Result<(T, T), KineticsError>
where
    T: Real,
    F: FnMut(T) -> T,
{
    let zero = T::zero();
    let two = lit::<T>(2.0);
    if flo == zero {
        return Ok((lo.clone(), lo));
    }
    if fhi == zero {
        return Ok((hi.clone(), hi));
    }

    let mut bisect_next = false;
    while !tol.converged(&lo, &hi) {
        if count >= max_iter {
            return Err(KineticsError::IterationBudget { iterations: count });
        }

        let width = hi.clone() - lo.clone();
        let mid = lo.clone() + width.clone() / two.clone();
        let mut c = if bisect_next {
            mid.clone()
        } else {
            hi.clone() - fhi.clone() * width.clone() / (fhi.clone() - flo.clone())
        };
        // Saturated endpoints (±∞) and round-off can put the secant outside the bracket.
        if !(c.is_finite() && c > lo && c < hi) {
            c = mid;
        }

        let fc = checked(&c, f(c.clone()))?;
        count += 1;
        if fc == zero {
            return Ok((c.clone(), c));
        }

        if sign(&fc) == sign(&flo) {
            lo = c;
            flo = fc;
        } else {
            hi = c;
            fhi = fc;
        }
        bisect_next = hi.clone() - lo.clone() > width / two.clone();
    }

    Ok((lo, hi))
}
