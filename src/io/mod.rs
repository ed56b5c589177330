//! Input/output helpers.
//!
//! - profile file parsing (`ingest`)
//! - two-column and JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
