//! Detection of reactions unsupported by gene evidence

use crate::metabolic_model::model::Model;

/// Find reactions not associated with any gene
///
/// Such reactions usually entered the reconstruction through gap filling
/// rather than genome annotation. Boundary reactions never carry gene
/// evidence and are skipped, as is anything in `exclude` (typically the
/// biomass objective).
pub fn find_orphan_reactions(model: &Model, exclude: &[String]) -> Vec<String> {
    let mut orphans = Vec::new();
    for (rxn_id, reaction) in &model.reactions {
        if reaction.is_boundary() || exclude.iter().any(|excluded| excluded == rxn_id) {
            continue;
        }
        if reaction.genes().is_empty() {
            orphans.push(rxn_id.clone());
        }
    }
    if !orphans.is_empty() {
        log::info!("{} reactions not associated with genes", orphans.len());
    }
    orphans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::gpr_parse::parse_gpr;
    use crate::metabolic_model::reaction::{Reaction, ReactionBuilder};
    use indexmap::IndexMap;

    fn reaction(id: &str, stoichiometry: &[(&str, f64)], rule: Option<&str>) -> Reaction {
        let mut genes = IndexMap::new();
        let gpr = rule.map(|r| parse_gpr(r, &mut genes).unwrap());
        ReactionBuilder::default()
            .id(id.to_string())
            .metabolites(
                stoichiometry
                    .iter()
                    .map(|(met, coef)| (met.to_string(), *coef))
                    .collect(),
            )
            .gpr(gpr)
            .build()
            .unwrap()
    }

    #[test]
    fn orphans_skip_boundary_and_excluded() {
        let mut model = Model::new_empty();
        model.add_reaction(reaction("EX_a_e", &[("a_e", -1.0)], None));
        model.add_reaction(reaction(
            "WITH_GENES",
            &[("a_e", -1.0), ("a_c", 1.0)],
            Some("b0001 or b0002"),
        ));
        model.add_reaction(reaction("GAPFILLED", &[("a_c", -1.0), ("b_c", 1.0)], None));
        model.add_reaction(reaction("BIOMASS", &[("b_c", -1.0), ("c_c", 1.0)], None));

        let orphans = find_orphan_reactions(&model, &["BIOMASS".to_string()]);
        assert_eq!(orphans, vec!["GAPFILLED".to_string()]);
    }

    #[test]
    fn clean_model_has_no_orphans() {
        let mut model = Model::new_empty();
        model.add_reaction(reaction(
            "WITH_GENES",
            &[("a_e", -1.0), ("a_c", 1.0)],
            Some("b0001"),
        ));
        assert!(find_orphan_reactions(&model, &[]).is_empty());
    }
}
