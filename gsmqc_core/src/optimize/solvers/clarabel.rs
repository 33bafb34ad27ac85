//! Implements a solver interface for Clarabel

use clarabel::algebra::CscMatrix as ClarabelCscMatrix;
use clarabel::solver::{
    DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};

use crate::optimize::problem::Problem;
use crate::optimize::solvers::{SolverBackend, SolverError};
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Solver backend based on the Clarabel interior point solver
#[derive(Debug, Default)]
pub struct ClarabelSolver {
    /// Print solver progress to stdout
    pub verbose: bool,
}

impl SolverBackend for ClarabelSolver {
    fn solve(&self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let form = problem.standard_form();
        if form.num_variables == 0 {
            return Err(SolverError::Setup(
                "problem has no variables".to_string(),
            ));
        }
        // Hand the stacked rows to Clarabel in its column compressed format
        let (col_offsets, row_indices, values) = form.a.disassemble();
        let a = ClarabelCscMatrix::new(
            form.num_equalities + form.num_inequalities,
            form.num_variables,
            col_offsets,
            row_indices,
            values,
        );
        // Pure LP, so the quadratic block stays empty
        let p = ClarabelCscMatrix::zeros((form.num_variables, form.num_variables));
        let cones = [
            SupportedConeT::ZeroConeT(form.num_equalities),
            SupportedConeT::NonnegativeConeT(form.num_inequalities),
        ];
        let settings = DefaultSettings {
            verbose: self.verbose,
            ..DefaultSettings::default()
        };
        let mut solver = DefaultSolver::new(&p, &form.q, &a, &form.b, &cones, settings);
        solver.solve();

        let status = match solver.solution.status {
            SolverStatus::Solved => OptimizationStatus::Optimal,
            SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                OptimizationStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                OptimizationStatus::Unbounded
            }
            SolverStatus::MaxIterations
            | SolverStatus::MaxTime
            | SolverStatus::InsufficientProgress => OptimizationStatus::SolverHalted,
            _ => OptimizationStatus::NumericalError,
        };
        let (objective_value, variable_values) = match status {
            OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal => {
                // Clarabel minimizes; undo the negation applied for maximization
                let objective_value = if form.maximize {
                    -solver.solution.obj_val
                } else {
                    solver.solution.obj_val
                };
                (
                    Some(objective_value),
                    Some(problem.label_values(&solver.solution.x)),
                )
            }
            _ => (None, None),
        };
        Ok(ProblemSolution {
            status,
            objective_value,
            variable_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_problem_is_a_setup_error() {
        let problem = Problem::new_maximization();
        let res = ClarabelSolver::default().solve(&problem);
        assert!(matches!(res, Err(SolverError::Setup(_))));
    }

    #[test]
    fn unbounded_maximization() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, 0.0, f64::INFINITY)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.0).unwrap();
        let solution = ClarabelSolver::default().solve(&problem).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Unbounded);
    }
}
