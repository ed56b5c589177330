//! Brent's method for one-dimensional minimization.
//!
//! Golden-section search with parabolic interpolation steps. The variance
//! strategy uses it twice: once over `Ea` between neighbours of the best point
//! of a log-spaced scan, once over `A` between the per-profile scaling bounds.

use crate::error::KineticsError;
use crate::math::real::{Real, digits, is_nan, lit, pow2};

/// Minimize `f` on `[min, max]`, converging to `bits` binary digits.
///
/// `bits` is capped at half the significand width of `T`; asking for more than
/// that only burns iterations since the minimum of a smooth function is flat to
/// `sqrt(ε)`. Returns `(x, f(x))` for the best abscissa seen.
pub fn brent_find_minima<T, F>(
    mut f: F,
    min: T,
    max: T,
    bits: u32,
    max_iter: usize,
) -> Result<(T, T), KineticsError>
where
    T: Real,
    F: FnMut(T) -> T,
{
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(KineticsError::precondition(format!(
            "invalid minimization interval [{min}, {max}]"
        )));
    }

    let bits = bits.clamp(2, digits::<T>() / 2);
    let tolerance = pow2::<T>(1 - bits as i32);
    let golden = lit::<T>(0.381_966_0);
    let half = lit::<T>(0.5);
    let two = lit::<T>(2.0);
    let quarter = lit::<T>(0.25);
    let zero = T::zero();

    let (mut lo, mut hi) = (min, max);
    let mut x = hi.clone();
    let mut w = hi.clone();
    let mut v = hi.clone();
    let mut fx = f(x.clone());
    if is_nan(&fx) {
        return Err(KineticsError::precondition("objective returned NaN"));
    }
    let mut fw = fx.clone();
    let mut fv = fx.clone();
    let mut delta = zero.clone();
    let mut delta2 = zero.clone();

    let mut count = max_iter;
    loop {
        let mid = (lo.clone() + hi.clone()) * half.clone();
        let fract1 = tolerance.clone() * x.clone().abs() + tolerance.clone() * quarter.clone();
        let fract2 = two.clone() * fract1.clone();
        if (x.clone() - mid.clone()).abs() <= fract2.clone() - (hi.clone() - lo.clone()) * half.clone() {
            break;
        }
        if count == 0 {
            return Err(KineticsError::IterationBudget { iterations: max_iter });
        }
        count -= 1;

        let mut golden_step = true;
        if delta2.clone().abs() > fract1 {
            // Parabola through x, w, v.
            let r = (x.clone() - w.clone()) * (fx.clone() - fv.clone());
            let mut q = (x.clone() - v.clone()) * (fx.clone() - fw.clone());
            let mut p = (x.clone() - v.clone()) * q.clone() - (x.clone() - w.clone()) * r.clone();
            q = two.clone() * (q - r);
            if q > zero {
                p = -p;
            }
            q = q.abs();
            let td = delta2.clone();
            delta2 = delta.clone();
            if p.clone().abs() < (half.clone() * q.clone() * td).abs()
                && p > q.clone() * (lo.clone() - x.clone())
                && p < q.clone() * (hi.clone() - x.clone())
            {
                delta = p / q;
                let u = x.clone() + delta.clone();
                if u.clone() - lo.clone() < fract2 || hi.clone() - u < fract2 {
                    delta = if mid.clone() - x.clone() < zero {
                        -fract1.clone().abs()
                    } else {
                        fract1.clone().abs()
                    };
                }
                golden_step = false;
            }
        }
        if golden_step {
            delta2 = if x >= mid { lo.clone() - x.clone() } else { hi.clone() - x.clone() };
            delta = golden.clone() * delta2.clone();
        }

        let u = if delta.clone().abs() >= fract1 {
            x.clone() + delta.clone()
        } else if delta > zero {
            x.clone() + fract1.abs()
        } else {
            x.clone() - fract1.abs()
        };
        let mut fu = f(u.clone());
        if is_nan(&fu) {
            fu = T::max_value().unwrap_or_else(|| fx.clone());
        }

        if fu <= fx {
            if u >= x {
                lo = x.clone();
            } else {
                hi = x.clone();
            }
            v = w;
            w = x;
            x = u;
            fv = fw;
            fw = fx;
            fx = fu;
        } else {
            if u < x {
                lo = u.clone();
            } else {
                hi = u.clone();
            }
            if fu <= fw || w == x {
                v = w;
                w = u;
                fv = fw;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    Ok((x, fx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_parabola_minimum() {
        let (x, fx) = brent_find_minima(|x: f64| (x - 1.3) * (x - 1.3) + 0.5, -4.0, 7.0, 52, 1000).unwrap();
        assert!((x - 1.3).abs() < 1e-7);
        assert!((fx - 0.5).abs() < 1e-12);
    }

    #[test]
    fn finds_minimum_of_asymmetric_function() {
        // x·ln(x) has its minimum at 1/e.
        let (x, _) = brent_find_minima(|x: f64| x * x.ln(), 0.05, 3.0, 52, 1000).unwrap();
        assert!((x - (-1.0_f64).exp()).abs() < 1e-7);
    }

    #[test]
    fn minimum_on_boundary() {
        let (x, _) = brent_find_minima(|x: f64| x, 2.0, 5.0, 52, 1000).unwrap();
        assert!((x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn infinite_costs_are_avoided() {
        let f = |x: f64| if x > 4.0 { f64::INFINITY } else { (x - 3.0).powi(2) };
        let (x, fx) = brent_find_minima(f, 0.0, 4.5, 52, 1000).unwrap();
        assert!((x - 3.0).abs() < 1e-6);
        assert!(fx.is_finite());
    }

    #[test]
    fn budget_exhaustion_is_an_error() {
        let err = brent_find_minima(|x: f64| (x - 1.0).powi(2), -100.0, 100.0, 52, 3).unwrap_err();
        assert_eq!(err, KineticsError::IterationBudget { iterations: 3 });
    }

    #[test]
    fn rejects_empty_interval() {
        assert!(brent_find_minima(|x: f64| x, 1.0, 1.0, 52, 10).is_err());
    }
}
