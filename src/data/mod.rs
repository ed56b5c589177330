//! Generated input data.

pub mod synthetic;
