//! Detection of metabolites generated without any mass input

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::model::Model;
use crate::quality::QualityError;

/// Find metabolites the model can produce with every uptake closed
///
/// Works on its own copy of the model: the lower bound of every boundary
/// reaction is raised to zero so nothing enters the system, then each
/// metabolite of the `cytosol` compartment is probed with a temporary demand
/// reaction made the objective. Any demand that can still carry flux means
/// the metabolite appears out of nowhere, usually through an erroneous
/// reaction cycle. Metabolites already covered by a demand reaction are
/// skipped.
pub fn check_free_mass(model: &Model, cytosol: &str) -> Result<Vec<String>, QualityError> {
    let mut probe = model.clone();

    let boundary_ids: Vec<String> = probe.boundary().map(|rxn| rxn.id.clone()).collect();
    for rxn_id in &boundary_ids {
        if let Some(reaction) = probe.reactions.get_mut(rxn_id) {
            reaction.lower_bound = 0.0;
        }
    }

    let demanded: Vec<String> = probe
        .demands()
        .flat_map(|rxn| rxn.metabolites.keys().cloned().collect::<Vec<String>>())
        .collect();
    let candidates: Vec<String> = probe
        .metabolites
        .iter()
        .filter(|(met_id, metabolite)| {
            metabolite.compartment.as_deref() == Some(cytosol)
                && !demanded.iter().any(|known| known == *met_id)
        })
        .map(|(met_id, _)| met_id.clone())
        .collect();

    let tolerance = CONFIGURATION.read().unwrap().tolerance;
    let mut free = Vec::new();
    for met_id in candidates {
        let demand_id = probe.add_demand(&met_id)?;
        probe.set_objective(&demand_id)?;
        let objective_value = probe.slim_optimize(0.0)?;
        if objective_value > tolerance {
            free.push(met_id);
        }
        probe.remove_reaction(&demand_id)?;
    }

    if !free.is_empty() {
        log::info!("{} metabolites are generated for free", free.len());
    }
    Ok(free)
}
