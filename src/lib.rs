//! `arrhenius-kinetics` library crate.
//!
//! Thermal damage kinetics under the Arrhenius rate law
//! `k(T) = A · Tⁿ · exp(-Ea / (R·T))`:
//!
//! - damage integral `Ω` of a temperature-time profile (`integrate`)
//! - threshold scale factor bringing a profile to a target `Ω` (`threshold`)
//! - fitting `(A, Ea)` to threshold profiles (`fit`)
//!
//! The binary (`arrhenius`) is a thin wrapper around this library so the core
//! stays testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod integrate;
pub mod io;
pub mod math;
pub mod report;
pub mod threshold;
