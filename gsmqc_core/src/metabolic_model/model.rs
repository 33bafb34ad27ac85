//! This module provides the Model struct for representing an entire metabolic model
use std::fmt::{Display, Formatter};

use crate::configuration::{Solver, CONFIGURATION};
use crate::metabolic_model::gene::Gene;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::SolverError;
use crate::optimize::{OptimizationStatus, ProblemSolution};

use indexmap::IndexMap;
use thiserror::Error;

/// Represents a Genome Scale Metabolic Model
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of gene ids to Gene Objects
    pub genes: IndexMap<String, Gene>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
    /// Solver backend used when the model is optimized
    pub solver: Solver,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            genes: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
            solver: CONFIGURATION.read().unwrap().solver,
        }
    }

    /// Add a reaction to the model
    ///
    /// # Examples
    /// ```rust
    /// use gsmqc_core::metabolic_model::model::Model;
    /// use gsmqc_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// model.add_reaction(new_reaction);
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a gene to the model
    pub fn add_gene(&mut self, gene: Gene) {
        let id = gene.id.clone();
        self.genes.insert(id, gene);
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// Reactions crossing the system boundary (exchanges, demands, sinks)
    pub fn boundary(&self) -> impl Iterator<Item = &Reaction> + '_ {
        self.reactions.values().filter(|rxn| rxn.is_boundary())
    }

    /// Demand reactions of the model
    pub fn demands(&self) -> impl Iterator<Item = &Reaction> + '_ {
        self.reactions.values().filter(|rxn| rxn.is_demand())
    }

    /// Replace the objective with a single reaction at coefficient 1
    pub fn set_objective(&mut self, reaction_id: &str) -> Result<(), ModelError> {
        if !self.reactions.contains_key(reaction_id) {
            return Err(ModelError::UnknownReaction(reaction_id.to_string()));
        }
        self.objective.clear();
        self.objective.insert(reaction_id.to_string(), 1.0);
        Ok(())
    }

    /// Add a demand reaction `DM_<metabolite>` consuming the metabolite
    ///
    /// The demand is irreversible, bounded by `[0, default upper bound]`.
    /// Returns the id of the new reaction.
    pub fn add_demand(&mut self, metabolite_id: &str) -> Result<String, ModelError> {
        if !self.metabolites.contains_key(metabolite_id) {
            return Err(ModelError::UnknownMetabolite(metabolite_id.to_string()));
        }
        let demand_id = format!("DM_{}", metabolite_id);
        if self.reactions.contains_key(&demand_id) {
            return Err(ModelError::BoundaryExists(demand_id));
        }
        let mut metabolites = IndexMap::new();
        metabolites.insert(metabolite_id.to_string(), -1.0);
        let reaction = Reaction {
            id: demand_id.clone(),
            metabolites,
            name: None,
            gpr: None,
            lower_bound: 0.0,
            upper_bound: CONFIGURATION.read().unwrap().upper_bound,
            subsystem: None,
            notes: None,
            annotation: None,
        };
        self.reactions.insert(demand_id.clone(), reaction);
        Ok(demand_id)
    }

    /// Remove a reaction from the model, along with its objective entry
    pub fn remove_reaction(&mut self, reaction_id: &str) -> Result<(), ModelError> {
        if self.reactions.shift_remove(reaction_id).is_none() {
            return Err(ModelError::UnknownReaction(reaction_id.to_string()));
        }
        self.objective.shift_remove(reaction_id);
        Ok(())
    }

    /// Translate the model into a flux balance linear program
    ///
    /// One continuous variable per reaction bounded by its flux bounds, and
    /// one steady state equality constraint per metabolite that participates
    /// in at least one reaction.
    pub fn build_problem(&self) -> Result<Problem, ModelError> {
        let mut problem = Problem::new_maximization();
        for (rxn_id, reaction) in &self.reactions {
            problem.add_new_variable(
                rxn_id,
                reaction.name.as_deref(),
                reaction.lower_bound,
                reaction.upper_bound,
            )?;
        }
        // Group the stoichiometry into per-metabolite rows
        let mut participants: IndexMap<String, Vec<(&str, f64)>> = IndexMap::new();
        for (rxn_id, reaction) in &self.reactions {
            for (met_id, coefficient) in &reaction.metabolites {
                participants
                    .entry(met_id.clone())
                    .or_default()
                    .push((rxn_id.as_str(), *coefficient));
            }
        }
        for (met_id, terms) in &participants {
            let variables: Vec<&str> = terms.iter().map(|(rxn_id, _)| *rxn_id).collect();
            let coefficients: Vec<f64> = terms.iter().map(|(_, coefficient)| *coefficient).collect();
            problem.add_new_equality_constraint_by_id(met_id, &variables, &coefficients, 0.0)?;
        }
        for (rxn_id, coefficient) in &self.objective {
            problem.add_new_linear_objective_term_by_id(rxn_id, *coefficient)?;
        }
        Ok(problem)
    }

    /// Optimize the model, returning the full solution with fluxes
    pub fn optimize(&self) -> Result<ProblemSolution, ModelError> {
        let problem = self.build_problem()?;
        Ok(problem.solve(self.solver)?)
    }

    /// Optimize the model and return only the objective value
    ///
    /// `error_value` is returned when the problem is infeasible, unbounded,
    /// or the solver halted; solver setup failures still propagate.
    pub fn slim_optimize(&self, error_value: f64) -> Result<f64, ModelError> {
        let solution = self.optimize()?;
        match (solution.status, solution.objective_value) {
            (
                OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal,
                Some(objective_value),
            ) => Ok(objective_value),
            _ => Ok(error_value),
        }
    }
}

/// Errors from model level operations
#[derive(Debug, Error)]
pub enum ModelError {
    /// A reaction id was not found in the model
    #[error("no reaction with id {0} in the model")]
    UnknownReaction(String),
    /// A metabolite id was not found in the model
    #[error("no metabolite with id {0} in the model")]
    UnknownMetabolite(String),
    /// A boundary reaction with the derived id already exists
    #[error("a boundary reaction {0} already exists")]
    BoundaryExists(String),
    /// The model could not be translated into an optimization problem
    #[error(transparent)]
    Problem(#[from] ProblemError),
    /// The solver backend failed
    #[error(transparent)]
    Solver(#[from] SolverError),
}

// region GPR Functionality
/// Representation of a Gene Protein Reaction Rule as an AST
#[derive(Clone, Debug)]
pub enum Gpr {
    /// Operation on two genes (see [`GprOperation`])
    Operation(GprOperation),
    /// A terminal gene Node (see [`Gene`])
    GeneNode(String),
}

impl Display for Gpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_id())
    }
}

impl Gpr {
    /// Create a new binary operation node
    pub fn new_binary_operation(
        left: Gpr,
        operator: GprOperatorType,
        right: Gpr,
    ) -> Result<Gpr, GprError> {
        let op = match operator {
            GprOperatorType::Or => GprOperation::Or {
                left: Box::new(left),
                right: Box::new(right),
            },
            GprOperatorType::And => GprOperation::And {
                left: Box::new(left),
                right: Box::new(right),
            },
            GprOperatorType::Not => return Err(GprError::InvalidBinaryOp),
        };
        Ok(Gpr::Operation(op))
    }

    /// Create a new unary operation node
    pub fn new_unary_operation(operator: GprOperatorType, operand: Gpr) -> Result<Gpr, GprError> {
        let op = match operator {
            GprOperatorType::Not => GprOperation::Not {
                val: Box::new(operand),
            },
            _ => return Err(GprError::InvalidUnaryOp),
        };
        Ok(Gpr::Operation(op))
    }

    /// Create a new gene node
    pub fn new_gene_node(gene: &str) -> Gpr {
        Gpr::GeneNode(gene.to_string())
    }

    /// Gene ids referenced by the rule, deduplicated, in rule order
    pub fn genes(&self) -> Vec<String> {
        let mut genes = Vec::new();
        self.collect_genes(&mut genes);
        genes
    }

    fn collect_genes(&self, genes: &mut Vec<String>) {
        match self {
            Gpr::Operation(op) => match op {
                GprOperation::Or { left, right } | GprOperation::And { left, right } => {
                    left.collect_genes(genes);
                    right.collect_genes(genes);
                }
                GprOperation::Not { val } => val.collect_genes(genes),
            },
            Gpr::GeneNode(gene) => {
                if !genes.contains(gene) {
                    genes.push(gene.clone());
                }
            }
        }
    }

    /// Generate a GPR string with gene ids from the GPR AST
    pub fn to_string_id(&self) -> String {
        match self {
            Gpr::Operation(op) => match op {
                GprOperation::Or { left, right } => {
                    format!("({} or {})", left.to_string_id(), right.to_string_id())
                }
                GprOperation::And { left, right } => {
                    format!("({} and {})", left.to_string_id(), right.to_string_id())
                }
                GprOperation::Not { val } => {
                    format!("(not {})", val)
                }
            },
            Gpr::GeneNode(gene_ref) => gene_ref.to_string(),
        }
    }
}

/// Possible operations on genes
#[derive(Clone, Debug)]
pub enum GprOperation {
    Or { left: Box<Gpr>, right: Box<Gpr> },
    And { left: Box<Gpr>, right: Box<Gpr> },
    Not { val: Box<Gpr> },
}

/// Types of Allowed GPR Operations
pub enum GprOperatorType {
    /// Or, results in active if either left or right are active
    Or,
    /// And, results in active if both left and right are active
    And,
    /// Not, results in active if val is inactive
    Not,
}

#[derive(Clone, Debug, Error)]
pub enum GprError {
    #[error("Invalid Binary Operation")]
    InvalidBinaryOp,
    #[error("Invalid Unary Operation")]
    InvalidUnaryOp,
}

// endregion GPR Functionality

#[cfg(test)]
mod gpr_tests {
    use super::*;
    use crate::io::gpr_parse::parse_gpr;
    use indexmap::IndexMap;

    #[test]
    fn display() {
        let single = Gpr::new_gene_node("Rv0001");
        assert_eq!(format!("{}", single), "Rv0001");

        let mut gene_map = IndexMap::new();
        let gpr = parse_gpr("(Rv0001 and Rv0002) or Rv0003", &mut gene_map).unwrap();
        // The display is explicit with parenthesis, so an extra pair wraps
        // the whole expression
        assert_eq!(format!("{}", gpr), "((Rv0001 and Rv0002) or Rv0003)");

        let gpr = parse_gpr("Rv0001 and not Rv0002", &mut gene_map).unwrap();
        assert_eq!(format!("{}", gpr), "(Rv0001 and (not Rv0002))");
    }

    #[test]
    fn genes_are_collected_in_rule_order() {
        let mut gene_map = IndexMap::new();
        let gpr = parse_gpr("(b0002 and b0001) or b0002", &mut gene_map).unwrap();
        assert_eq!(gpr.genes(), vec!["b0002".to_string(), "b0001".to_string()]);
    }

    #[test]
    fn invalid_operator_arity() {
        let left = Gpr::new_gene_node("a");
        let right = Gpr::new_gene_node("b");
        assert!(matches!(
            Gpr::new_binary_operation(left, GprOperatorType::Not, right),
            Err(GprError::InvalidBinaryOp)
        ));
        let operand = Gpr::new_gene_node("a");
        assert!(matches!(
            Gpr::new_unary_operation(GprOperatorType::And, operand),
            Err(GprError::InvalidUnaryOp)
        ));
    }
}
