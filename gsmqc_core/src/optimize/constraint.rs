//! Provides struct for representing a constraint in an optimization problem
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock};

use crate::optimize::variable::Variable;

/// Represents a linear constraint in an optimization problem
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Represents an equality constraint, where `terms` = `equals`
    Equality {
        /// Used to identify the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`]
        terms: Vec<ConstraintTerm>,
        /// The right hand side of the equality constraint
        equals: f64,
    },
    /// Represents an inequality constraint
    Inequality {
        /// Used to identify the constraint
        id: String,
        /// Linear terms which are added together, see [`ConstraintTerm`]
        terms: Vec<ConstraintTerm>,
        /// The lowest value the sum of the terms can take
        lower_bound: f64,
        /// The highest value the sum of the terms can take
        upper_bound: f64,
    },
}

impl Constraint {
    /// Create a new equality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier for the constraint
    /// - `variables`: A slice of wrapped variables
    /// - `coefficients`: A slice of coefficients for the variables
    /// - `equals`: The right hand side of the equality
    pub fn new_equality(
        id: &str,
        variables: &[Arc<RwLock<Variable>>],
        coefficients: &[f64],
        equals: f64,
    ) -> Self {
        Constraint::Equality {
            id: id.to_string(),
            terms: Constraint::zip_into_terms(variables, coefficients),
            equals,
        }
    }

    /// Create a new inequality constraint
    ///
    /// # Parameters
    /// - `id`: Identifier for the constraint
    /// - `variables`: A slice of wrapped variables
    /// - `coefficients`: A slice of coefficients for the variables
    /// - `lower_bound`: The lowest value the sum of the terms can take
    /// - `upper_bound`: The highest value the sum of the terms can take
    pub fn new_inequality(
        id: &str,
        variables: &[Arc<RwLock<Variable>>],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Constraint::Inequality {
            id: id.to_string(),
            terms: Constraint::zip_into_terms(variables, coefficients),
            lower_bound,
            upper_bound,
        }
    }

    /// Wrap the constraint in an Arc<RwLock<>>
    pub fn wrap(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Get the id of the constraint
    pub fn get_id(&self) -> String {
        match self {
            Constraint::Equality { id, .. } => id.clone(),
            Constraint::Inequality { id, .. } => id.clone(),
        }
    }

    /// Get the linear terms of the constraint
    pub fn get_terms(&self) -> &[ConstraintTerm] {
        match self {
            Constraint::Equality { terms, .. } => terms,
            Constraint::Inequality { terms, .. } => terms,
        }
    }

    /// Get the variables participating in the constraint
    pub fn get_variables(&self) -> Vec<Arc<RwLock<Variable>>> {
        self.get_terms()
            .iter()
            .map(|term| term.variable.clone())
            .collect()
    }

    /// Take a slice of variable references, and a slice of coefficients and zip
    /// them together into a vec of ConstraintTerms
    fn zip_into_terms(
        variables: &[Arc<RwLock<Variable>>],
        coefficients: &[f64],
    ) -> Vec<ConstraintTerm> {
        variables
            .iter()
            .zip(coefficients)
            .map(|(var, coefficient)| ConstraintTerm {
                variable: var.clone(),
                coefficient: *coefficient,
            })
            .collect()
    }

    /// Create a string representation of the terms in the Constraint
    fn terms_to_string(terms: &[ConstraintTerm]) -> String {
        terms
            .iter()
            .map(|term| format!("{}", term))
            .collect::<Vec<String>>()
            .join(" + ")
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Equality { terms, equals, .. } => {
                write!(f, "{} = {}", Self::terms_to_string(terms), equals)
            }
            Constraint::Inequality {
                terms,
                lower_bound,
                upper_bound,
                ..
            } => {
                write!(
                    f,
                    "{} <= {} <= {}",
                    lower_bound,
                    Self::terms_to_string(terms),
                    upper_bound
                )
            }
        }
    }
}

/// Represents a single term in a constraint, specifically
/// the multiplication of the `variable` by the `coefficient`
#[derive(Debug, Clone)]
pub struct ConstraintTerm {
    /// A reference to a [`Variable`]
    pub(crate) variable: Arc<RwLock<Variable>>,
    /// The coefficient for the variable
    pub(crate) coefficient: f64,
}

impl Display for ConstraintTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.variable.read().unwrap().id)
    }
}
