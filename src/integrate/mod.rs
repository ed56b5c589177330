//! Damage integral `Ω = ∫ A · Tⁿ · exp(-Ea/(R·T)) dt` over a sampled profile.
//!
//! [`ArrheniusIntegral`] holds the rate coefficients and the quadrature choice.
//! Coefficients change only through the explicit setters, which is how the
//! threshold solver and the fitters sweep `A` and `Ea` between evaluations.
//!
//! Saturation is a value, not an error: a rate that underflows everywhere gives
//! `Ω = 0` and one that overflows gives `Ω = +∞`.

use crate::domain::{ProfileView, Quadrature, RateParameters, SolverConfig};
use crate::error::KineticsError;
use crate::math::real::{Real, gas_constant, lit};
use crate::math::roots::{Tolerance, bracket_and_solve_root};

pub mod kernel;
pub(crate) mod parallel;

use kernel::{DamageKernel, ExponentialIntegral, Trapezoid};

#[derive(Debug, Clone)]
pub struct ArrheniusIntegral<T> {
    params: RateParameters<T>,
    quadrature: Quadrature,
    parallel_threshold: usize,
}

impl<T: Real> ArrheniusIntegral<T> {
    pub fn new(a: T, ea: T) -> Self {
        Self::from_parameters(RateParameters::new(a, ea))
    }

    pub fn from_parameters(params: RateParameters<T>) -> Self {
        Self {
            params,
            quadrature: Quadrature::default(),
            parallel_threshold: SolverConfig::default().parallel_threshold,
        }
    }

    pub fn with_quadrature(mut self, quadrature: Quadrature) -> Self {
        self.quadrature = quadrature;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_config(self, cfg: &SolverConfig) -> Self {
        self.with_parallel_threshold(cfg.parallel_threshold)
    }

    pub fn set_a(&mut self, a: T) {
        self.params.a = a;
    }

    pub fn set_ea(&mut self, ea: T) {
        self.params.ea = ea;
    }

    pub fn set_exponent(&mut self, n: T) {
        self.params.n = n;
    }

    pub fn a(&self) -> T {
        self.params.a.clone()
    }

    pub fn ea(&self) -> T {
        self.params.ea.clone()
    }

    pub fn exponent(&self) -> T {
        self.params.n.clone()
    }

    pub fn parameters(&self) -> RateParameters<T> {
        self.params.clone()
    }

    pub fn quadrature(&self) -> Quadrature {
        self.quadrature
    }

    /// Instantaneous rate `A · Tⁿ · exp(-Ea/(R·T))`.
    pub fn rate(&self, temperature: T) -> T {
        let RateParameters { a, ea, n } = self.params.clone();
        let prefactor = if n == T::zero() {
            T::one()
        } else {
            temperature.clone().powf(n)
        };
        a * prefactor * (-ea / (gas_constant::<T>() * temperature)).exp()
    }

    /// Rate at every sample of `profile`.
    pub fn rate_profile(&self, profile: ProfileView<'_, T>) -> Vec<T> {
        profile.temperature().iter().map(|t| self.rate(t.clone())).collect()
    }

    /// Damage integral over the whole profile.
    pub fn evaluate(&self, profile: ProfileView<'_, T>) -> Result<T, KineticsError> {
        self.params.validate()?;
        let RateParameters { a, ea, n } = self.params.clone();
        match self.quadrature {
            Quadrature::Trapezoid => self.run(&Trapezoid::new(a, ea, n), profile),
            Quadrature::ExponentialIntegral => {
                self.run(&ExponentialIntegral::new(a, ea, n)?, profile)
            }
        }
    }

    /// Running damage integral, `0` at the first sample and `Ω` at the last.
    pub fn cumulative_damage(&self, profile: ProfileView<'_, T>) -> Result<Vec<T>, KineticsError> {
        self.params.validate()?;
        let RateParameters { a, ea, n } = self.params.clone();
        match self.quadrature {
            Quadrature::Trapezoid => running(&Trapezoid::new(a, ea, n), profile),
            Quadrature::ExponentialIntegral => {
                running(&ExponentialIntegral::new(a, ea, n)?, profile)
            }
        }
    }

    fn run<K: DamageKernel<T>>(&self, kernel: &K, profile: ProfileView<'_, T>) -> Result<T, KineticsError> {
        let sum = parallel::total(kernel, profile, self.parallel_threshold)?;
        Ok(sum * kernel.scale())
    }
}

fn running<T, K>(kernel: &K, profile: ProfileView<'_, T>) -> Result<Vec<T>, KineticsError>
where
    T: Real,
    K: DamageKernel<T>,
{
    let time = profile.time();
    let temp = profile.temperature();
    let scale = kernel.scale();

    let mut out = Vec::with_capacity(profile.len());
    let mut sum = T::zero();
    out.push(sum.clone());
    let mut prev = (temp[0].clone(), kernel.sample(temp[0].clone())?);
    for i in 1..profile.len() {
        let cur = (temp[i].clone(), kernel.sample(temp[i].clone())?);
        let dt = time[i].clone() - time[i - 1].clone();
        if dt != T::zero() {
            sum += kernel.segment(dt, &prev, &cur);
        }
        out.push(sum.clone() * scale.clone());
        prev = cur;
    }
    Ok(out)
}

/// Temperature at which the rate equals 1/s.
///
/// `Ea / (R·ln A)` for the plain form. With `n != 0` the equation
/// `R·T·(ln A + n·ln T) = Ea` is solved starting from the plain-form value.
pub fn critical_temperature<T: Real>(
    params: &RateParameters<T>,
    cfg: &SolverConfig,
) -> Result<T, KineticsError> {
    params.validate()?;
    let RateParameters { a, ea, n } = params.clone();
    let r = gas_constant::<T>();
    let ln_a = a.ln();
    if !(ln_a > T::zero() && ea > T::zero()) {
        return Err(KineticsError::precondition(
            "critical temperature needs A > 1 and Ea > 0",
        ));
    }

    let plain = ea.clone() / (r.clone() * ln_a.clone());
    if n == T::zero() {
        return Ok(plain);
    }

    let (lo, _hi) = bracket_and_solve_root(
        |t: T| r.clone() * t.clone() * (ln_a.clone() + n.clone() * t.ln()) - ea.clone(),
        plain,
        lit(1.1),
        true,
        Tolerance::bits(cfg.root_bits::<T>()),
        cfg.root_max_iterations,
    )?;
    tracing::debug!(tcrit = crate::math::real::to_f64(&lo), "solved modified critical temperature");
    Ok(lo)
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use rand::rngs::StdRng;

    use super::*;
    use crate::math::expint::expint;
    use crate::math::real::GAS_CONSTANT;

    const A: f64 = 3.1e99;
    const EA: f64 = 6.28e5;

    /// 80 samples at dt = 0.1 s: 310 K except 410 K for t in (1, 3].
    fn step_scenario() -> (Vec<f64>, Vec<f64>) {
        let t: Vec<f64> = (0..80).map(|i| i as f64 * 0.1).collect();
        let temp = (0..80)
            .map(|i| if (11..=30).contains(&i) { 410.0 } else { 310.0 })
            .collect();
        (t, temp)
    }

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn scenario_matches_square_pulse_estimate() {
        let (t, temp) = step_scenario();
        let view = ProfileView::new(&t, &temp).unwrap();
        let tau = 2.0;
        let expected = |a: f64, ea: f64| {
            a * (-ea / (GAS_CONSTANT * 410.0)).exp() * tau + a * (-ea / (GAS_CONSTANT * 310.0)).exp() * 3.0 * tau
        };

        for (a, ea) in [(A, EA), (2e30, 2e5)] {
            let omega = ArrheniusIntegral::new(a, ea).evaluate(view).unwrap();
            let want = expected(a, ea);
            assert!(rel(omega, want) < 1e-9, "A={a} Ea={ea} omega={omega} expected={want}");
        }

        // The closed form follows the linear ramps between 310 K and 410 K.
        let exact = ArrheniusIntegral::new(A, EA)
            .with_quadrature(Quadrature::ExponentialIntegral)
            .evaluate(view)
            .unwrap();
        assert!(rel(exact, expected(A, EA)) < 0.06);
    }

    #[test]
    fn linear_in_a_and_deterministic() {
        let (t, temp) = step_scenario();
        let view = ProfileView::new(&t, &temp).unwrap();
        let mut integral = ArrheniusIntegral::new(A, EA);
        let first = integral.evaluate(view).unwrap();
        assert_eq!(first, integral.evaluate(view).unwrap());

        integral.set_a(2.0 * A);
        let doubled = integral.evaluate(view).unwrap();
        assert!(rel(doubled, 2.0 * first) < 1e-14);
    }

    #[test]
    fn non_increasing_in_ea() {
        let (t, temp) = step_scenario();
        let view = ProfileView::new(&t, &temp).unwrap();
        let mut integral = ArrheniusIntegral::new(1.0, 0.0);
        let mut last = f64::INFINITY;
        for k in 0..40 {
            integral.set_ea(k as f64 * 2.5e4);
            let omega = integral.evaluate(view).unwrap();
            assert!(omega <= last);
            last = omega;
        }
    }

    #[test]
    fn saturates_instead_of_failing() {
        let (t, temp) = step_scenario();
        let view = ProfileView::new(&t, &temp).unwrap();
        assert_eq!(ArrheniusIntegral::new(2e30, 2e10).evaluate(view).unwrap(), 0.0);
        assert_eq!(
            ArrheniusIntegral::new(2e300, -2e5).evaluate(view).unwrap(),
            f64::INFINITY
        );
    }

    #[test]
    fn zero_width_steps_contribute_nothing() {
        let t = [0.0, 1.0, 1.0, 2.0];
        let temp = [350.0, 350.0, 350.0, 350.0];
        let view = ProfileView::new(&t, &temp).unwrap();
        let integral = ArrheniusIntegral::new(2e300, -2e5);
        assert_eq!(integral.evaluate(view).unwrap(), f64::INFINITY);

        let integral = ArrheniusIntegral::new(1.0, 0.0);
        assert!((integral.evaluate(view).unwrap() - 2.0).abs() < 1e-15);
    }

    #[test]
    fn exponential_integral_matches_linear_ramp() {
        // One segment from 320 K to 360 K over 5 s.
        let t = [0.0, 5.0];
        let temp = [320.0, 360.0];
        let view = ProfileView::new(&t, &temp).unwrap();
        let (a, ea) = (1.0e20, 1.5e5);
        let alpha = ea / GAS_CONSTANT;
        let q = |temp: f64| temp * expint(2, alpha / temp).unwrap();
        let expected = a * 5.0 / 40.0 * (q(360.0) - q(320.0));

        let exact = ArrheniusIntegral::new(a, ea)
            .with_quadrature(Quadrature::ExponentialIntegral)
            .evaluate(view)
            .unwrap();
        assert!(rel(exact, expected) < 1e-12);

        // A finely sampled trapezoid converges to the same value.
        let n = 20_001;
        let fine_t: Vec<f64> = (0..n).map(|i| 5.0 * i as f64 / (n - 1) as f64).collect();
        let fine_temp: Vec<f64> = fine_t.iter().map(|s| 320.0 + 8.0 * s).collect();
        let fine = ProfileView::new(&fine_t, &fine_temp).unwrap();
        let trap = ArrheniusIntegral::new(a, ea).evaluate(fine).unwrap();
        assert!(rel(trap, expected) < 1e-6);
    }

    #[test]
    fn exponential_integral_rejects_modified_form() {
        let (t, temp) = step_scenario();
        let view = ProfileView::new(&t, &temp).unwrap();
        let mut integral = ArrheniusIntegral::new(A, EA).with_quadrature(Quadrature::ExponentialIntegral);
        integral.set_exponent(0.5);
        assert!(matches!(integral.evaluate(view), Err(KineticsError::Precondition(_))));
    }

    #[test]
    fn parallel_path_agrees_with_sequential() {
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 10_000;
        let t: Vec<f64> = (0..n).map(|i| i as f64 * 1e-3).collect();
        let temp: Vec<f64> = (0..n).map(|_| rng.gen_range(310.0..330.0)).collect();
        let view = ProfileView::new(&t, &temp).unwrap();

        let seq = ArrheniusIntegral::new(A, EA).with_parallel_threshold(usize::MAX);
        let par = ArrheniusIntegral::new(A, EA).with_parallel_threshold(16);
        let (s, p) = (seq.evaluate(view).unwrap(), par.evaluate(view).unwrap());
        assert!(rel(p, s) < 1e-12);
    }

    #[test]
    fn cumulative_damage_ends_at_omega() {
        let (t, temp) = step_scenario();
        let view = ProfileView::new(&t, &temp).unwrap();
        let integral = ArrheniusIntegral::new(A, EA);
        let running = integral.cumulative_damage(view).unwrap();
        assert_eq!(running.len(), 80);
        assert_eq!(running[0], 0.0);
        assert!(running.windows(2).all(|w| w[1] >= w[0]));
        assert!(rel(running[79], integral.evaluate(view).unwrap()) < 1e-12);
    }

    #[test]
    fn rate_and_rate_profile() {
        let mut integral = ArrheniusIntegral::new(A, EA);
        let k = integral.rate(330.0);
        assert!(rel(k, A * (-EA / (GAS_CONSTANT * 330.0)).exp()) < 1e-14);

        integral.set_exponent(1.0);
        assert!(rel(integral.rate(330.0), 330.0 * k) < 1e-12);

        let t = [0.0, 1.0];
        let temp = [310.0, 330.0];
        let rates = integral.rate_profile(ProfileView::new(&t, &temp).unwrap());
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[1], integral.rate(330.0));
    }

    #[test]
    fn critical_temperature_plain_and_modified() {
        let cfg = SolverConfig::default();
        let plain = RateParameters::new(A, EA);
        let tc = critical_temperature(&plain, &cfg).unwrap();
        assert!(rel(tc, EA / (GAS_CONSTANT * A.ln())) < 1e-14);
        assert!(rel(ArrheniusIntegral::from_parameters(plain).rate(tc), 1.0) < 1e-9);

        let modified = plain.with_exponent(-2.0);
        let tc = critical_temperature(&modified, &cfg).unwrap();
        let rate = ArrheniusIntegral::from_parameters(modified).rate(tc);
        assert!(rel(rate, 1.0) < 1e-9, "rate at Tcrit = {rate}");

        assert!(critical_temperature(&RateParameters::new(0.5, EA), &cfg).is_err());
    }
}
