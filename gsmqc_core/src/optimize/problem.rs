//! Provides struct representing an optimization problem
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csc::CscMatrix;
use thiserror::Error;

use crate::configuration::Solver;
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense, ObjectiveTerm};
use crate::optimize::problem::ProblemError::{
    NonExistentVariable, NonExistentVariablesInObjective,
};
use crate::optimize::solvers::clarabel::ClarabelSolver;
use crate::optimize::solvers::{SolverBackend, SolverError};
use crate::optimize::variable::{Variable, VariableBuilder};
use crate::optimize::ProblemSolution;

/// A linear optimization problem
#[derive(Debug)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem
    variables: IndexMap<String, Arc<RwLock<Variable>>>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Arc<RwLock<Constraint>>>,
    /// Current number of variables in the problem
    num_variables: usize,
    /// Current number of constraints in the problem
    num_constraints: usize,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
            num_variables: 0,
            num_constraints: 0,
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    // endregion Creation Functions

    // region Update Objective Sense
    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }
    // endregion Update Objective Sense

    // region Adding Variables
    /// Add a variable to the optimization problem
    pub fn add_variable(&mut self, variable: Arc<RwLock<Variable>>) -> Result<(), ProblemError> {
        // Validate that the variable can in fact be added to the problem
        self.validate_variable(variable.clone())?;
        // Update the index of the variable to reflect the current variable count
        variable.write().unwrap().index = self.num_variables;
        self.num_variables += 1;
        let var_id = variable.read().unwrap().id.clone();
        self.variables.insert(var_id, variable);
        Ok(())
    }

    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        name: Option<&str>,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let new_var = VariableBuilder::default()
            .id(id.to_string())
            .name(name.map(|n| n.to_string()))
            .lower_bound(lower_bound)
            .upper_bound(upper_bound)
            .build()
            .unwrap()
            .wrap();
        self.add_variable(new_var)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(
        &mut self,
        constraint: Arc<RwLock<Constraint>>,
    ) -> Result<(), ProblemError> {
        self.validate_constraint(constraint.clone())?;
        self.num_constraints += 1;
        self.constraints
            .insert(constraint.read().unwrap().get_id(), constraint.clone());
        Ok(())
    }

    /// Create a new equality constraint and add it to the problem
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        variables: &[Arc<RwLock<Variable>>],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let new_cons = Constraint::new_equality(id, variables, coefficients, equals).wrap();
        self.add_constraint(new_cons)
    }

    /// Create a new equality constraint using variable ids rather than variable
    /// references, and add it to the problem
    pub fn add_new_equality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        let variables = self.resolve_variables(variables)?;
        self.add_new_equality_constraint(id, &variables, coefficients, equals)
    }

    /// Create a new inequality constraint and add it to the problem
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        variables: &[Arc<RwLock<Variable>>],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let new_cons =
            Constraint::new_inequality(id, variables, coefficients, lower_bound, upper_bound)
                .wrap();
        self.add_constraint(new_cons)
    }

    /// Create a new inequality constraint using variable ids rather than variable
    /// references, and add it to the problem
    pub fn add_new_inequality_constraint_by_id(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let variables = self.resolve_variables(variables)?;
        self.add_new_inequality_constraint(id, &variables, coefficients, lower_bound, upper_bound)
    }

    // endregion Adding Constraints

    // region Adding Objective Terms
    /// Add a new term to the objective
    pub fn add_objective_term(&mut self, objective_term: ObjectiveTerm) -> Result<(), ProblemError> {
        self.validate_objective_term(&objective_term)?;
        self.objective.add_term(objective_term);
        Ok(())
    }

    /// Add a new linear term to the objective
    pub fn add_new_linear_objective_term(
        &mut self,
        variable: Arc<RwLock<Variable>>,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        let objective_term = ObjectiveTerm::new(variable, coefficient);
        self.add_objective_term(objective_term)
    }

    /// Add a new linear term to the objective using the variable id
    pub fn add_new_linear_objective_term_by_id(
        &mut self,
        variable_id: &str,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        let variable = match self.variables.get(variable_id) {
            Some(variable) => variable.clone(),
            None => return Err(NonExistentVariablesInObjective),
        };
        self.add_new_linear_objective_term(variable, coefficient)
    }

    // endregion Adding Objective Terms

    // region Update Variable Bounds
    /// Update the bounds of a variable
    pub fn update_variable_bounds(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        if lower_bound > upper_bound {
            return Err(ProblemError::InvalidVariableBounds);
        }
        match self.variables.get(id) {
            Some(var) => {
                let mut var = var.write().unwrap();
                var.lower_bound = lower_bound;
                var.upper_bound = upper_bound;
            }
            None => return Err(NonExistentVariable),
        };
        Ok(())
    }
    // endregion Update Variable Bounds

    // region Remove Objective Terms
    /// Remove all terms from the objective
    pub fn remove_all_objective_terms(&mut self) {
        self.objective.remove_all_terms();
    }
    // endregion Remove Objective Terms

    // region Solving
    /// Solve the problem with the selected solver backend
    pub fn solve(&self, solver: Solver) -> Result<ProblemSolution, SolverError> {
        match solver {
            Solver::Clarabel => ClarabelSolver::default().solve(self),
        }
    }

    /// Assemble the problem into the conic standard form solvers consume
    ///
    /// Equality rows come first (zero cone), then one sided inequality rows
    /// (nonnegative cone); variable box bounds are appended as inequality
    /// rows. Rows with a non finite right hand side are omitted.
    pub(crate) fn standard_form(&self) -> StandardForm {
        let num_variables = self.num_variables;
        let mut eq_rows: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();
        let mut ineq_rows: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();
        for constraint in self.constraints.values() {
            let constraint = constraint.read().unwrap();
            let entries: Vec<(usize, f64)> = constraint
                .get_terms()
                .iter()
                .map(|term| (term.variable.read().unwrap().index, term.coefficient))
                .collect();
            match &*constraint {
                Constraint::Equality { equals, .. } => eq_rows.push((entries, *equals)),
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if upper_bound.is_finite() {
                        ineq_rows.push((entries.clone(), *upper_bound));
                    }
                    if lower_bound.is_finite() {
                        let negated = entries
                            .iter()
                            .map(|(index, coefficient)| (*index, -coefficient))
                            .collect();
                        ineq_rows.push((negated, -lower_bound));
                    }
                }
            }
        }
        for variable in self.variables.values() {
            let variable = variable.read().unwrap();
            if variable.upper_bound.is_finite() {
                ineq_rows.push((vec![(variable.index, 1.0)], variable.upper_bound));
            }
            if variable.lower_bound.is_finite() {
                ineq_rows.push((vec![(variable.index, -1.0)], -variable.lower_bound));
            }
        }
        let num_equalities = eq_rows.len();
        let num_inequalities = ineq_rows.len();
        let mut coo = CooMatrix::new(num_equalities + num_inequalities, num_variables);
        let mut b = Vec::with_capacity(num_equalities + num_inequalities);
        for (row, (entries, rhs)) in eq_rows.into_iter().chain(ineq_rows).enumerate() {
            for (column, coefficient) in entries {
                coo.push(row, column, coefficient);
            }
            b.push(rhs);
        }
        let mut q = vec![0.0; num_variables];
        for term in &self.objective.terms {
            q[term.variable.read().unwrap().index] += term.coefficient;
        }
        let maximize = self.objective.sense == ObjectiveSense::Maximize;
        if maximize {
            for coefficient in &mut q {
                *coefficient = -*coefficient;
            }
        }
        StandardForm {
            a: CscMatrix::from(&coo),
            b,
            q,
            num_equalities,
            num_inequalities,
            num_variables,
            maximize,
        }
    }

    /// Label a solver's value vector with the variable ids
    pub(crate) fn label_values(&self, values: &[f64]) -> IndexMap<String, f64> {
        self.variables
            .iter()
            .map(|(id, variable)| (id.clone(), values[variable.read().unwrap().index]))
            .collect()
    }
    // endregion Solving

    // region Validation Functions
    /// Resolve variable ids into their shared handles
    fn resolve_variables(
        &self,
        ids: &[&str],
    ) -> Result<Vec<Arc<RwLock<Variable>>>, ProblemError> {
        ids.iter()
            .map(|id| {
                self.variables
                    .get(*id)
                    .cloned()
                    .ok_or(NonExistentVariable)
            })
            .collect()
    }

    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: Arc<RwLock<Variable>>) -> Result<(), ProblemError> {
        // Check if there is already a variable with this id
        if self.variables.contains_key(&variable.read().unwrap().id) {
            return Err(ProblemError::VariableIdAlreadyExists);
        };
        // Check if the variable bounds are valid
        let lb = variable.read().unwrap().lower_bound;
        let ub = variable.read().unwrap().upper_bound;
        if lb > ub {
            return Err(ProblemError::InvalidVariableBounds);
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: Arc<RwLock<Constraint>>) -> Result<(), ProblemError> {
        // Check that a constraint with the same id doesn't already exist
        if self
            .constraints
            .contains_key(&constraint.read().unwrap().get_id())
        {
            return Err(ProblemError::ConstraintAlreadyExists);
        }
        // Check that for inequality constraints the bounds make sense
        match *constraint.read().unwrap() {
            Constraint::Equality { .. } => {}
            Constraint::Inequality {
                lower_bound,
                upper_bound,
                ..
            } => {
                if lower_bound > upper_bound {
                    return Err(ProblemError::InvalidConstraintBounds);
                }
            }
        }
        // Check that the variables in this constraint are in the problem
        for var in constraint.read().unwrap().get_variables() {
            if let Some(problem_var) = self.variables.get(&var.read().unwrap().id) {
                if !Arc::ptr_eq(&var, problem_var) {
                    return Err(ProblemError::NonExistentVariablesInConstraint);
                }
            } else {
                return Err(ProblemError::NonExistentVariablesInConstraint);
            }
        }
        // All checks have passed
        Ok(())
    }

    /// Check that an objective term to be added is valid to add to this Problem
    fn validate_objective_term(&self, objective_term: &ObjectiveTerm) -> Result<(), ProblemError> {
        // Make sure the variable in the objective is in the problem
        if let Some(problem_var) = self
            .variables
            .get(&objective_term.variable.read().unwrap().id)
        {
            if !Arc::ptr_eq(&objective_term.variable, problem_var) {
                return Err(NonExistentVariablesInObjective);
            }
        } else {
            return Err(NonExistentVariablesInObjective);
        }
        Ok(())
    }

    // endregion Validation Functions
}

/// Conic standard form of a [`Problem`]: minimize `q'x` subject to equality
/// rows, then one sided inequality rows
pub(crate) struct StandardForm {
    /// Stacked constraint matrix, equality rows first
    pub(crate) a: CscMatrix<f64>,
    /// Right hand sides, aligned with the rows of `a`
    pub(crate) b: Vec<f64>,
    /// Minimization objective coefficients by variable index
    pub(crate) q: Vec<f64>,
    pub(crate) num_equalities: usize,
    pub(crate) num_inequalities: usize,
    pub(crate) num_variables: usize,
    /// Whether the original sense was maximization (objective negated in `q`)
    pub(crate) maximize: bool,
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add a variable with the same id as an existing variable")]
    VariableIdAlreadyExists,
    /// Error when trying to add variable with invalid bounds
    #[error("Tried to add a variable with lower_bound>upper_bound")]
    InvalidVariableBounds,
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add a constraint with the same id as an existing constraint")]
    ConstraintAlreadyExists,
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add an inequality constraint with lower_bound > upper_bound")]
    InvalidConstraintBounds,
    /// Error when trying to add a constraint that contains variables not in the problem
    #[error("Tried to add a constraint with variables not in the problem")]
    NonExistentVariablesInConstraint,
    /// Error when trying to add an objective term which includes variables not in the problem
    #[error("Tried adding an objective term with variables not in the problem")]
    NonExistentVariablesInObjective,
    /// Error when trying to perform an update on a variable that doesn't exist
    #[error("Tried to access a variable that doesn't exist")]
    NonExistentVariable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::OptimizationStatus;

    #[test]
    fn new_problem() {
        let max_problem = Problem::new_maximization();
        assert_eq!(max_problem.objective.sense, ObjectiveSense::Maximize);

        let min_problem = Problem::new_minimization();
        assert_eq!(min_problem.objective.sense, ObjectiveSense::Minimize);
    }

    #[test]
    fn update_objective_sense() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.update_objective_sense(ObjectiveSense::Minimize);
        assert_eq!(problem.objective.sense, ObjectiveSense::Minimize);
    }

    #[test]
    fn add_variables() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);

        problem
            .add_new_variable("x", None, 0.0, 100.0)
            .unwrap();
        problem
            .add_new_variable("y", Some("second"), -5.0, 5.0)
            .unwrap();
        let x = problem.variables.get("x").expect("x not added");
        assert_eq!(x.read().unwrap().index, 0);
        let y = problem.variables.get("y").expect("y not added");
        assert_eq!(y.read().unwrap().index, 1);
        assert_eq!(y.read().unwrap().name.as_deref(), Some("second"));
    }

    #[test]
    fn add_bad_variable() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        let res = problem.add_new_variable("x", None, 100.0, 64.0);
        assert!(matches!(res, Err(ProblemError::InvalidVariableBounds)));

        problem.add_new_variable("x", None, 0.0, 1.0).unwrap();
        let res = problem.add_new_variable("x", None, 0.0, 1.0);
        assert!(matches!(res, Err(ProblemError::VariableIdAlreadyExists)));
    }

    #[test]
    fn add_constraints_by_id() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", None, 0.0, 100.0).unwrap();
        problem.add_new_variable("y", None, 0.0, 100.0).unwrap();

        problem
            .add_new_equality_constraint_by_id("balance", &["x", "y"], &[2.0, 3.0], 200.0)
            .unwrap();
        problem
            .add_new_inequality_constraint_by_id("cap", &["x", "y"], &[1.0, 1.0], 0.0, 50.0)
            .unwrap();
        assert_eq!(problem.num_constraints, 2);

        let res = problem.add_new_equality_constraint_by_id("ghost", &["z"], &[1.0], 0.0);
        assert!(matches!(res, Err(ProblemError::NonExistentVariable)));
    }

    #[test]
    fn add_bad_constraint() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", None, 0.0, 100.0).unwrap();

        let res =
            problem.add_new_inequality_constraint_by_id("bad", &["x"], &[1.0], 200.0, 100.0);
        assert!(matches!(res, Err(ProblemError::InvalidConstraintBounds)));

        problem
            .add_new_equality_constraint_by_id("row", &["x"], &[1.0], 1.0)
            .unwrap();
        let res = problem.add_new_equality_constraint_by_id("row", &["x"], &[1.0], 1.0);
        assert!(matches!(res, Err(ProblemError::ConstraintAlreadyExists)));
    }

    #[test]
    fn foreign_variable_rejected() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", None, 0.0, 1.0).unwrap();
        // A variable with a known id but a different allocation
        let imposter = VariableBuilder::default()
            .id("x".to_string())
            .build()
            .unwrap()
            .wrap();
        let res = problem.add_new_equality_constraint("row", &[imposter.clone()], &[1.0], 0.0);
        assert!(matches!(
            res,
            Err(ProblemError::NonExistentVariablesInConstraint)
        ));
        let res = problem.add_new_linear_objective_term(imposter, 1.0);
        assert!(matches!(
            res,
            Err(ProblemError::NonExistentVariablesInObjective)
        ));
    }

    #[test]
    fn standard_form_shape() {
        let mut problem = Problem::new(ObjectiveSense::Maximize);
        problem.add_new_variable("x", None, 0.0, 4.0).unwrap();
        problem
            .add_new_variable("y", None, f64::NEG_INFINITY, 3.0)
            .unwrap();
        problem
            .add_new_equality_constraint_by_id("eq", &["x", "y"], &[1.0, -1.0], 0.0)
            .unwrap();
        problem
            .add_new_inequality_constraint_by_id("cap", &["x", "y"], &[1.0, 1.0], 0.0, 5.0)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.0).unwrap();

        let form = problem.standard_form();
        assert_eq!(form.num_variables, 2);
        assert_eq!(form.num_equalities, 1);
        // Two rows for the two sided cap, three finite box bounds
        assert_eq!(form.num_inequalities, 5);
        assert_eq!(form.b.len(), 6);
        assert!(form.maximize);
        // Maximization negates the objective into minimization form
        assert!((form.q[0] - -1.0).abs() < 1e-12);
        assert!((form.q[1]).abs() < 1e-12);
    }

    #[test]
    fn solve_small_lp() {
        // max 2x + 3y with x in [0,4], y in [0,3], x + y <= 5
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", None, 0.0, 4.0).unwrap();
        problem.add_new_variable("y", None, 0.0, 3.0).unwrap();
        problem
            .add_new_inequality_constraint_by_id("cap", &["x", "y"], &[1.0, 1.0], 0.0, 5.0)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 2.0).unwrap();
        problem.add_new_linear_objective_term_by_id("y", 3.0).unwrap();

        let solution = problem.solve(Solver::Clarabel).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 13.0).abs() < 1e-4);
        let values = solution.variable_values.unwrap();
        assert!((values["x"] - 2.0).abs() < 1e-4);
        assert!((values["y"] - 3.0).abs() < 1e-4);
    }

    #[test]
    fn solve_respects_sense() {
        // Same feasible region, minimization drives both variables to zero
        let mut problem = Problem::new_minimization();
        problem.add_new_variable("x", None, 0.0, 4.0).unwrap();
        problem.add_new_variable("y", None, 0.0, 3.0).unwrap();
        problem.add_new_linear_objective_term_by_id("x", 2.0).unwrap();
        problem.add_new_linear_objective_term_by_id("y", 3.0).unwrap();

        let solution = problem.solve(Solver::Clarabel).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Optimal);
        assert!(solution.objective_value.unwrap().abs() < 1e-4);
    }

    #[test]
    fn solve_detects_infeasibility() {
        let mut problem = Problem::new_maximization();
        problem.add_new_variable("x", None, 0.0, 1.0).unwrap();
        problem
            .add_new_equality_constraint_by_id("impossible", &["x"], &[1.0], 5.0)
            .unwrap();
        problem.add_new_linear_objective_term_by_id("x", 1.0).unwrap();

        let solution = problem.solve(Solver::Clarabel).unwrap();
        assert_eq!(solution.status, OptimizationStatus::Infeasible);
        assert!(solution.objective_value.is_none());
    }
}
