//! Temperature-time profiles.
//!
//! [`ThermalProfile`] owns its samples and is what the I/O layer produces.
//! [`ProfileView`] borrows two equal-length slices and is what the integrator,
//! threshold solver and fitters consume. Both validate on construction:
//!
//! - at least two samples
//! - `time` and `temperature` have the same length
//! - every value is finite
//! - `time` is non-decreasing (zero-width steps are allowed and contribute nothing)

use crate::error::KineticsError;
use crate::math::real::{Real, to_f64};

fn validate<T: Real>(time: &[T], temperature: &[T]) -> Result<(), KineticsError> {
    if time.len() != temperature.len() {
        return Err(KineticsError::precondition(format!(
            "time and temperature lengths differ ({} vs {})",
            time.len(),
            temperature.len()
        )));
    }
    if time.len() < 2 {
        return Err(KineticsError::precondition(format!(
            "profile needs at least 2 samples, got {}",
            time.len()
        )));
    }
    if let Some(i) = time
        .iter()
        .chain(temperature.iter())
        .position(|v| !v.is_finite())
    {
        let i = i % time.len();
        return Err(KineticsError::precondition(format!("non-finite sample at index {i}")));
    }
    if let Some(i) = time.windows(2).position(|w| w[1] < w[0]) {
        return Err(KineticsError::precondition(format!(
            "time decreases at index {} ({} -> {})",
            i + 1,
            to_f64(&time[i]),
            to_f64(&time[i + 1])
        )));
    }
    Ok(())
}

/// Borrowed, validated temperature-time profile.
#[derive(Debug)]
pub struct ProfileView<'a, T> {
    time: &'a [T],
    temperature: &'a [T],
}

impl<T> Clone for ProfileView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ProfileView<'_, T> {}

impl<'a, T: Real> ProfileView<'a, T> {
    pub fn new(time: &'a [T], temperature: &'a [T]) -> Result<Self, KineticsError> {
        validate(time, temperature)?;
        Ok(Self { time, temperature })
    }

    /// Build a view over temperatures derived from an already validated view.
    ///
    /// `temperature` must have the same length as `time` and be finite.
    pub(crate) fn derived(time: &'a [T], temperature: &'a [T]) -> Self {
        debug_assert_eq!(time.len(), temperature.len());
        Self { time, temperature }
    }

    pub fn time(&self) -> &'a [T] {
        self.time
    }

    pub fn temperature(&self) -> &'a [T] {
        self.temperature
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false for a validated view; provided for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn duration(&self) -> T {
        self.time[self.time.len() - 1].clone() - self.time[0].clone()
    }

    pub fn max_temperature(&self) -> T {
        self.temperature
            .iter()
            .cloned()
            .fold(self.temperature[0].clone(), |a, b| a.max(b))
    }

    pub fn min_temperature(&self) -> T {
        self.temperature
            .iter()
            .cloned()
            .fold(self.temperature[0].clone(), |a, b| a.min(b))
    }

    pub fn to_profile(&self) -> ThermalProfile<T> {
        ThermalProfile {
            name: None,
            time: self.time.to_vec(),
            temperature: self.temperature.to_vec(),
        }
    }
}

/// Owned temperature-time profile, typically one per input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalProfile<T> {
    pub name: Option<String>,
    time: Vec<T>,
    temperature: Vec<T>,
}

impl<T: Real> ThermalProfile<T> {
    pub fn new(time: Vec<T>, temperature: Vec<T>) -> Result<Self, KineticsError> {
        validate(&time, &temperature)?;
        Ok(Self {
            name: None,
            time,
            temperature,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn view(&self) -> ProfileView<'_, T> {
        ProfileView::derived(&self.time, &self.temperature)
    }

    pub fn time(&self) -> &[T] {
        &self.time
    }

    pub fn temperature(&self) -> &[T] {
        &self.temperature
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Copy with `offset` added to every temperature.
    pub fn offset(&self, offset: T) -> Self {
        Self {
            name: self.name.clone(),
            time: self.time.clone(),
            temperature: self.temperature.iter().map(|t| t.clone() + offset.clone()).collect(),
        }
    }

    /// Copy with the rise above the first sample scaled by `factor`:
    /// `T0 + factor·(T - T0)`.
    pub fn scale_rise(&self, factor: T) -> Self {
        let base = self.temperature[0].clone();
        Self {
            name: self.name.clone(),
            time: self.time.clone(),
            temperature: self
                .temperature
                .iter()
                .map(|t| base.clone() + factor.clone() * (t.clone() - base.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_validates_shape() {
        let t = [0.0, 1.0, 2.0];
        let temp = [300.0, 310.0, 305.0];
        let view = ProfileView::new(&t, &temp).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.duration(), 2.0);
        assert_eq!(view.max_temperature(), 310.0);
        assert_eq!(view.min_temperature(), 300.0);

        assert!(matches!(
            ProfileView::new(&t[..1], &temp[..1]),
            Err(KineticsError::Precondition(_))
        ));
        assert!(matches!(
            ProfileView::new(&t, &temp[..2]),
            Err(KineticsError::Precondition(_))
        ));
    }

    #[test]
    fn view_rejects_decreasing_time_and_nan() {
        let temp = [300.0, 310.0, 305.0];
        let err = ProfileView::new(&[0.0, 2.0, 1.0], &temp).unwrap_err();
        assert!(err.to_string().contains("index 2"));
        assert!(ProfileView::new(&[0.0, 1.0, 1.0], &temp).is_ok());
        assert!(ProfileView::new(&[0.0, 1.0, 2.0], &[300.0, f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn perturbed_copies() {
        let p = ThermalProfile::new(vec![0.0, 1.0, 2.0], vec![310.0, 320.0, 315.0]).unwrap();
        assert_eq!(p.offset(1.5).temperature(), &[311.5, 321.5, 316.5]);
        assert_eq!(p.scale_rise(1.1).temperature()[1], 310.0 + 1.1 * 10.0);
        assert_eq!(p.scale_rise(1.1).temperature()[0], 310.0);
    }
}
