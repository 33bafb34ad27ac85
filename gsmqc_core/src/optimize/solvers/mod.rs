//! Solver backends for optimization problems

pub mod clarabel;

use thiserror::Error;

use crate::optimize::problem::Problem;
use crate::optimize::ProblemSolution;

/// Interface implemented by every solver backend
pub trait SolverBackend {
    /// Solve the problem, returning the solution
    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError>;
}

/// Errors raised by a solver backend
#[derive(Clone, Debug, Error)]
pub enum SolverError {
    /// The backend could not set up the numerical problem
    #[error("solver setup failed: {0}")]
    Setup(String),
}
