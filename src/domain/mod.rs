//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - temperature-time profiles (`ThermalProfile`, `ProfileView`)
//! - rate coefficients, fit bounds and fit results
//! - the selectable quadrature kernels and fitting strategies
//! - solver configuration (`SolverConfig`)

pub mod config;
pub mod profile;
pub mod types;

pub use config::SolverConfig;
pub use profile::{ProfileView, ThermalProfile};
pub use types::*;
