//! Generalized exponential integral `E_n(x) = ∫₁^∞ e^(-x·t) / tⁿ dt`.
//!
//! Power series for `x <= 1`, modified Lentz continued fraction above.

use crate::error::KineticsError;
use crate::math::real::{Real, from_usize, lit, to_f64};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;
const MAX_ITER: usize = 1000;

/// Evaluate `E_n(x)` for `x >= 0`.
///
/// `E_0(x) = e^(-x)/x`; `E_n(0) = 1/(n-1)` for `n > 1`. The integral diverges
/// at `x == 0` when `n <= 1`.
pub fn expint<T: Real>(n: u32, x: T) -> Result<T, KineticsError> {
    let zero = T::zero();
    let one = T::one();
    if !(x >= zero) || (x == zero && n <= 1) {
        return Err(KineticsError::precondition(format!(
            "E_{n}(x) undefined for x={}",
            to_f64(&x)
        )));
    }
    if !x.is_finite() {
        return Ok(zero);
    }
    if n == 0 {
        return Ok((-x.clone()).exp() / x);
    }
    let nm1 = n as usize - 1;
    if x == zero {
        return Ok(one / from_usize::<T>(nm1));
    }

    let eps = T::default_epsilon();
    // Smallest representable-ish number: keeps Lentz denominators away from zero.
    let fpmin = eps.clone() * eps.clone() * eps.clone() * eps.clone();

    if x > one {
        let mut b = x.clone() + from_usize::<T>(n as usize);
        let mut c = one.clone() / fpmin;
        let mut d = one.clone() / b.clone();
        let mut h = d.clone();
        let two = lit::<T>(2.0);
        for i in 1..=MAX_ITER {
            let an = -from_usize::<T>(i) * (from_usize::<T>(nm1) + from_usize::<T>(i));
            b += two.clone();
            d = one.clone() / (an.clone() * d + b.clone());
            c = b.clone() + an / c;
            let del = c.clone() * d.clone();
            h *= del.clone();
            if (del - one.clone()).abs() < eps {
                return Ok(h * (-x).exp());
            }
        }
        return Err(KineticsError::IterationBudget { iterations: MAX_ITER });
    }

    let mut ans = if nm1 != 0 {
        one.clone() / from_usize::<T>(nm1)
    } else {
        -x.clone().ln() - lit::<T>(EULER_GAMMA)
    };
    let mut fact = one.clone();
    for i in 1..=MAX_ITER {
        fact *= -x.clone() / from_usize::<T>(i);
        let del = if i != nm1 {
            -fact.clone() / (from_usize::<T>(i) - from_usize::<T>(nm1))
        } else {
            // psi(n) = -gamma + sum_{k=1}^{n-1} 1/k
            let mut psi = -lit::<T>(EULER_GAMMA);
            for k in 1..=nm1 {
                psi += one.clone() / from_usize::<T>(k);
            }
            fact.clone() * (-x.clone().ln() + psi)
        };
        ans += del.clone();
        if del.abs() < ans.clone().abs() * eps.clone() {
            return Ok(ans);
        }
    }
    Err(KineticsError::IterationBudget { iterations: MAX_ITER })
}
