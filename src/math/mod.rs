//! Numeric primitives: scalar abstraction, grids, root bracketing, Brent
//! minimization, the exponential integral and least squares.

pub mod expint;
pub mod grid;
pub mod minima;
pub mod ols;
pub mod real;
pub mod roots;

pub use expint::expint;
pub use grid::{lin_space, log_space};
pub use minima::brent_find_minima;
pub use ols::{LinearFit, linear_regression, solve_least_squares};
pub use real::{GAS_CONSTANT, Real};
pub use roots::{Tolerance, bracket_and_solve_root};
