//! Provides struct for representing an optimization problem's objective

use std::sync::{Arc, RwLock};

use crate::optimize::variable::Variable;

/// Represents the Objective of an optimization problem
#[derive(Debug, Clone)]
pub struct Objective {
    /// Terms included in the objective (See [`ObjectiveTerm`])
    pub(crate) terms: Vec<ObjectiveTerm>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    pub(crate) sense: ObjectiveSense,
}

impl Objective {
    /// Create a new empty objective, with a given sense
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            terms: Vec::new(),
            sense,
        }
    }

    /// Create a new empty maximization objective
    pub fn new_maximize() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new empty minimization objective
    pub fn new_minimize() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }

    /// Change the sense of the objective
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// Add a new term to the objective
    pub fn add_term(&mut self, term: ObjectiveTerm) {
        self.terms.push(term);
    }

    /// Add a new linear term to the objective
    pub fn add_linear_term(&mut self, variable: Arc<RwLock<Variable>>, coefficient: f64) {
        self.terms.push(ObjectiveTerm::new(variable, coefficient));
    }

    /// Remove every term that involves the given variable
    pub fn remove_terms_with_variable(&mut self, variable_id: &str) {
        self.terms
            .retain(|term| term.variable.read().unwrap().id != variable_id);
    }

    /// Remove all terms from the objective
    pub fn remove_all_terms(&mut self) {
        self.terms.clear();
    }
}

/// Represents the sense of the objective, whether it should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

/// A linear term in the objective
#[derive(Debug, Clone)]
pub struct ObjectiveTerm {
    /// Variable in the objective term
    pub(crate) variable: Arc<RwLock<Variable>>,
    /// Coefficient for the term
    pub(crate) coefficient: f64,
}

impl ObjectiveTerm {
    /// Create a new linear objective term
    pub fn new(variable: Arc<RwLock<Variable>>, coefficient: f64) -> Self {
        ObjectiveTerm {
            variable,
            coefficient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::variable::VariableBuilder;

    fn wrapped_variable(id: &str) -> Arc<RwLock<Variable>> {
        VariableBuilder::default()
            .id(id.to_string())
            .build()
            .unwrap()
            .wrap()
    }

    #[test]
    fn sense_round_trip() {
        let mut objective = Objective::new_maximize();
        assert_eq!(objective.sense, ObjectiveSense::Maximize);
        objective.set_sense(ObjectiveSense::Minimize);
        assert_eq!(objective.sense, ObjectiveSense::Minimize);
    }

    #[test]
    fn term_removal_by_variable() {
        let mut objective = Objective::new_minimize();
        objective.add_linear_term(wrapped_variable("x"), 1.0);
        objective.add_linear_term(wrapped_variable("y"), 2.0);
        objective.add_linear_term(wrapped_variable("x"), -1.0);
        assert_eq!(objective.terms.len(), 3);
        objective.remove_terms_with_variable("x");
        assert_eq!(objective.terms.len(), 1);
        objective.remove_all_terms();
        assert!(objective.terms.is_empty());
    }
}
