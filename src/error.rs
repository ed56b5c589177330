//! Error types.
//!
//! Two layers:
//!
//! - [`KineticsError`] is what the numerical core returns. Each variant is a
//!   distinct failure class so callers can decide what is recoverable (a
//!   bracketing failure on one profile during a fit is skipped, a precondition
//!   violation is not).
//! - [`AppError`] is the binary boundary: a message plus the process exit code.

use thiserror::Error;

/// Failures raised by the integrator, threshold solver, fitting engine and
/// numeric primitives.
///
/// Saturation of the damage integral (`Ω == 0` or `Ω == +∞`) is not an error:
/// it is a valid value that cost functions handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KineticsError {
    /// Malformed input: mismatched lengths, too few samples, non-positive `A`, ...
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// No sign change was found while expanding the root bracket.
    #[error("unable to bracket a root after {iterations} iterations")]
    Bracketing { iterations: usize },

    /// A refinement or minimization loop ran out of its iteration budget.
    #[error("iteration budget of {iterations} exhausted before convergence")]
    IterationBudget { iterations: usize },

    /// Singular or near-singular least-squares design.
    #[error("ill-conditioned regression: {0}")]
    IllConditioned(String),

    /// None of the accumulated profiles could be used.
    #[error("no usable profiles: {0}")]
    NoUsableProfiles(String),
}

impl KineticsError {
    pub fn precondition(message: impl Into<String>) -> Self {
        KineticsError::Precondition(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<KineticsError> for AppError {
    fn from(err: KineticsError) -> Self {
        let code = match err {
            KineticsError::Precondition(_) => 2,
            KineticsError::NoUsableProfiles(_) => 3,
            _ => 4,
        };
        AppError::new(code, err.to_string())
    }
}
