//! Solver configuration.
//!
//! Every iteration budget and search constant used by the core lives here and
//! is passed down explicitly. Defaults can be overridden from the environment
//! (a `.env` file is honoured):
//!
//! - `ARRHENIUS_PARALLEL_THRESHOLD`
//! - `ARRHENIUS_ROOT_MAX_ITERATIONS`
//! - `ARRHENIUS_MINIMIZE_MAX_ITERATIONS`
//! - `ARRHENIUS_GUARD_BITS`

use std::str::FromStr;

use crate::error::AppError;
use crate::math::real::{Real, digits};

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Bits of precision given up by the threshold root search.
    pub guard_bits: u32,
    pub root_max_iterations: usize,
    pub minimize_max_iterations: usize,
    /// Multiplicative step used while expanding a root bracket.
    pub expansion_factor: f64,
    /// Profiles with more samples than this are integrated in parallel.
    pub parallel_threshold: usize,
    /// Starting point of the per-profile `Ea` upper-bound search, J/mol.
    pub ea_search_guess: f64,
    /// Step of the coarse `ln Ea` scan in the variance strategy.
    pub ea_scan_step: f64,
    pub grid_ea_steps: usize,
    pub grid_a_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            guard_bits: 3,
            root_max_iterations: 100,
            minimize_max_iterations: 1000,
            expansion_factor: 2.0,
            parallel_threshold: 4096,
            ea_search_guess: 100.0,
            ea_scan_step: 0.5,
            grid_ea_steps: 100,
            grid_a_steps: 10,
        }
    }
}

impl SolverConfig {
    /// Defaults overridden by `ARRHENIUS_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, "ARRHENIUS_PARALLEL_THRESHOLD")? {
            cfg.parallel_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, "ARRHENIUS_ROOT_MAX_ITERATIONS")? {
            cfg.root_max_iterations = v;
        }
        if let Some(v) = parse_var(&lookup, "ARRHENIUS_MINIMIZE_MAX_ITERATIONS")? {
            cfg.minimize_max_iterations = v;
        }
        if let Some(v) = parse_var(&lookup, "ARRHENIUS_GUARD_BITS")? {
            cfg.guard_bits = v;
        }
        Ok(cfg)
    }

    /// Binary digits the threshold root search converges to for scalar `T`.
    pub fn root_bits<T: Real>(&self) -> u32 {
        digits::<T>().saturating_sub(self.guard_bits).max(1)
    }

    /// Budget for the `Ea` upper-bound search when converging to `bits`.
    ///
    /// The indicator it solves is a step, so refinement is pure bisection and
    /// needs about one evaluation per bit on top of the bracket expansion.
    pub fn ea_bound_iterations(&self, bits: u32) -> usize {
        self.root_max_iterations.max(bits as usize + 64)
    }
}

fn parse_var<V: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<V>, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<V>()
        .map(Some)
        .map_err(|_| AppError::new(2, format!("Invalid value for {key}: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.guard_bits, 3);
        assert_eq!(cfg.parallel_threshold, 4096);
        assert_eq!(cfg.root_bits::<f64>(), 50);
    }

    #[test]
    fn ea_bound_budget_grows_with_precision() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.ea_bound_iterations(cfg.root_bits::<f64>()), 114);
        assert_eq!(cfg.ea_bound_iterations(110), 174);
        assert_eq!(cfg.ea_bound_iterations(230), 294);

        let generous = SolverConfig {
            root_max_iterations: 500,
            ..SolverConfig::default()
        };
        assert_eq!(generous.ea_bound_iterations(110), 500);
    }

    #[test]
    fn environment_overrides() {
        let cfg = SolverConfig::from_lookup(|key| match key {
            "ARRHENIUS_PARALLEL_THRESHOLD" => Some("16".to_string()),
            "ARRHENIUS_GUARD_BITS" => Some(" 5 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.parallel_threshold, 16);
        assert_eq!(cfg.guard_bits, 5);
        assert_eq!(cfg.root_max_iterations, 100);
    }

    #[test]
    fn malformed_value_is_usage_error() {
        let err = SolverConfig::from_lookup(|key| {
            (key == "ARRHENIUS_ROOT_MAX_ITERATIONS").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
