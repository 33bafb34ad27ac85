//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock};

use derive_builder::Builder;

/// A continuous decision variable with box bounds
///
/// # Notes:
/// Every variable is continuous; the problems built here are pure linear
/// programs (one flux variable per reaction).
#[derive(Builder, Debug, Clone)]
pub struct Variable {
    /// Used to identify the variable (must be unique within a problem)
    pub id: String,
    /// Human readable variable name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lowest value the variable can take
    #[builder(default = "f64::NEG_INFINITY")]
    pub lower_bound: f64,
    /// Highest value the variable can take
    #[builder(default = "f64::INFINITY")]
    pub upper_bound: f64,
    /// Position of the variable in the solver's column ordering
    #[builder(default = "0")]
    pub(crate) index: usize,
}

impl Variable {
    /// Wrap the variable in an Arc<RwLock<>> for sharing with constraints
    pub fn wrap(self) -> Arc<RwLock<Variable>> {
        Arc::new(RwLock::new(self))
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}, {}]", self.id, self.lower_bound, self.upper_bound)
    }
}
