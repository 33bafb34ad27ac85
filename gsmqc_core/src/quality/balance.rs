//! Mass and charge balance checking of reactions

use indexmap::IndexSet;

use crate::metabolic_model::model::Model;

/// Result of checking every reaction of a model for balance
#[derive(Debug, Clone)]
pub struct BalanceSummary {
    /// Ids of the imbalanced reactions, in model order
    pub imbalanced: Vec<String>,
    /// How many reactions are imbalanced in at least one element
    pub mass_imbalanced: usize,
    /// How many reactions are imbalanced in charge
    pub charge_imbalanced: usize,
}

/// Check mass and charge balance of every non-boundary reaction
///
/// Boundary reactions intentionally violate conservation and are skipped, as
/// is anything in `exclude`. Reactions touching a metabolite with an
/// unparseable formula cannot be judged and are skipped as well. When no
/// metabolite in the model carries elemental data at all, every reaction is
/// reported imbalanced.
pub fn check_balance(model: &Model, exclude: &[String]) -> BalanceSummary {
    let mut element_set: IndexSet<String> = IndexSet::new();
    for metabolite in model.metabolites.values() {
        if let Ok(elements) = metabolite.elements() {
            element_set.extend(elements.into_iter().map(|(element, _)| element));
        }
    }

    if element_set.is_empty() {
        log::warn!("no elemental data associated with metabolites");
        let imbalanced: Vec<String> = model.reactions.keys().cloned().collect();
        return BalanceSummary {
            mass_imbalanced: imbalanced.len(),
            charge_imbalanced: imbalanced.len(),
            imbalanced,
        };
    }

    let mut summary = BalanceSummary {
        imbalanced: Vec::new(),
        mass_imbalanced: 0,
        charge_imbalanced: 0,
    };
    for (rxn_id, reaction) in &model.reactions {
        if reaction.is_boundary() || exclude.iter().any(|excluded| excluded == rxn_id) {
            continue;
        }
        let balance = match reaction.check_mass_balance(&model.metabolites) {
            Ok(balance) => balance,
            Err(_) => continue,
        };
        if balance.is_empty() {
            continue;
        }
        if balance.contains_key("charge") {
            summary.charge_imbalanced += 1;
        }
        if balance.keys().any(|key| element_set.contains(key)) {
            summary.mass_imbalanced += 1;
        }
        summary.imbalanced.push(rxn_id.clone());
    }

    if summary.mass_imbalanced > 0 {
        log::info!("{} reactions are mass imbalanced", summary.mass_imbalanced);
    }
    if summary.charge_imbalanced > 0 {
        log::info!(
            "{} reactions are charge imbalanced",
            summary.charge_imbalanced
        );
    }
    summary
}
