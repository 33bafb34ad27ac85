//! Flux variability analysis and blocked reaction detection

use indexmap::IndexMap;

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::model::{Model, ModelError};
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::OptimizationStatus;
use crate::quality::QualityError;

/// Minimum and maximum attainable flux of a reaction
#[derive(Debug, Clone, Copy)]
pub struct FluxRange {
    pub minimum: f64,
    pub maximum: f64,
}

/// Compute the attainable flux range of each listed reaction
///
/// With `fraction_of_optimum` above zero and a non-empty model objective,
/// the objective is optimized first and constrained to stay above that
/// fraction of its optimum while each reaction is minimized and maximized
/// in turn. Extents whose subproblem cannot be solved are reported as zero.
pub fn flux_variability_analysis(
    model: &Model,
    reaction_ids: &[String],
    fraction_of_optimum: f64,
) -> Result<IndexMap<String, FluxRange>, QualityError> {
    let mut problem = model.build_problem()?;

    if fraction_of_optimum > 0.0 && !model.objective.is_empty() {
        let solution = problem.solve(model.solver).map_err(ModelError::from)?;
        let optimum = match (solution.status, solution.objective_value) {
            (
                OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal,
                Some(objective_value),
            ) => objective_value,
            _ => return Err(QualityError::ObjectiveInfeasible),
        };
        let variables: Vec<&str> = model.objective.keys().map(String::as_str).collect();
        let coefficients: Vec<f64> = model.objective.values().copied().collect();
        problem
            .add_new_inequality_constraint_by_id(
                "objective_floor",
                &variables,
                &coefficients,
                fraction_of_optimum * optimum,
                f64::INFINITY,
            )
            .map_err(ModelError::from)?;
    }

    let mut ranges = IndexMap::new();
    for rxn_id in reaction_ids {
        problem.remove_all_objective_terms();
        problem
            .add_new_linear_objective_term_by_id(rxn_id, 1.0)
            .map_err(ModelError::from)?;
        problem.update_objective_sense(ObjectiveSense::Minimize);
        let minimum = solve_extent(&problem, model)?;
        problem.update_objective_sense(ObjectiveSense::Maximize);
        let maximum = solve_extent(&problem, model)?;
        ranges.insert(rxn_id.clone(), FluxRange { minimum, maximum });
    }
    Ok(ranges)
}

fn solve_extent(problem: &Problem, model: &Model) -> Result<f64, QualityError> {
    let solution = problem.solve(model.solver).map_err(ModelError::from)?;
    match (solution.status, solution.objective_value) {
        (
            OptimizationStatus::Optimal | OptimizationStatus::AlmostOptimal,
            Some(objective_value),
        ) => Ok(objective_value),
        _ => Ok(0.0),
    }
}

/// Find reactions unable to carry flux under any condition
///
/// A reaction is blocked when flux variability analysis, run without any
/// objective requirement, pins both of its extents to zero.
pub fn find_blocked_reactions(model: &Model) -> Result<Vec<String>, QualityError> {
    let reaction_ids: Vec<String> = model.reactions.keys().cloned().collect();
    let ranges = flux_variability_analysis(model, &reaction_ids, 0.0)?;
    let zero_cutoff = CONFIGURATION.read().unwrap().tolerance;
    let blocked: Vec<String> = ranges
        .iter()
        .filter(|(_, range)| {
            range.minimum.abs() < zero_cutoff && range.maximum.abs() < zero_cutoff
        })
        .map(|(rxn_id, _)| rxn_id.clone())
        .collect();
    if !blocked.is_empty() {
        log::info!("{} reactions are blocked", blocked.len());
    }
    Ok(blocked)
}
