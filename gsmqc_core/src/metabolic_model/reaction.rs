//! This module provides a struct for representing reactions

use derive_builder::Builder;
use indexmap::IndexMap;
use thiserror::Error;

use super::model::Gpr;
use crate::configuration::CONFIGURATION;
use crate::metabolic_model::metabolite::{FormulaError, Metabolite};

/// Net accumulations smaller than this are rounding noise, not imbalance
const BALANCE_EPSILON: f64 = 1e-06;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    ///
    /// Keyed by metabolite id, negative coefficients are consumed,
    /// positive coefficients are produced
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule associating the reaction with gene evidence
    #[builder(default = "None")]
    pub gpr: Option<Gpr>,
    /// Lower flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "CONFIGURATION.read().unwrap().upper_bound")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Reaction {
    /// Gene ids referenced by this reaction's GPR rule (empty without a rule)
    pub fn genes(&self) -> Vec<String> {
        match &self.gpr {
            Some(gpr) => gpr.genes(),
            None => Vec::new(),
        }
    }

    /// Whether the reaction crosses the system boundary
    ///
    /// Boundary reactions (exchanges, demands, sinks) touch a single
    /// metabolite and are exempt from conservation bookkeeping.
    pub fn is_boundary(&self) -> bool {
        self.metabolites.len() == 1
    }

    /// Whether the reaction is a demand reaction
    pub fn is_demand(&self) -> bool {
        self.is_boundary() && self.id.starts_with("DM_")
    }

    /// Check elemental and charge balance of the reaction
    ///
    /// Returns the net accumulation per element, with charge tracked under
    /// the `"charge"` key; an empty map means the reaction is balanced.
    /// Metabolites without a formula contribute no elements, while an
    /// unparseable formula is an error the caller may choose to skip.
    pub fn check_mass_balance(
        &self,
        metabolites: &IndexMap<String, Metabolite>,
    ) -> Result<IndexMap<String, f64>, BalanceError> {
        let mut balance: IndexMap<String, f64> = IndexMap::new();
        for (met_id, coefficient) in &self.metabolites {
            let metabolite =
                metabolites
                    .get(met_id)
                    .ok_or_else(|| BalanceError::UnknownMetabolite {
                        reaction: self.id.clone(),
                        metabolite: met_id.clone(),
                    })?;
            *balance.entry("charge".to_string()).or_insert(0.0) +=
                coefficient * f64::from(metabolite.charge);
            for (element, count) in metabolite.elements()? {
                *balance.entry(element).or_insert(0.0) += coefficient * count;
            }
        }
        balance.retain(|_, net| net.abs() > BALANCE_EPSILON);
        Ok(balance)
    }
}

/// Errors from checking the mass balance of a reaction
#[derive(Clone, Debug, Error)]
pub enum BalanceError {
    /// The reaction references a metabolite missing from the model
    #[error("reaction {reaction} references unknown metabolite {metabolite}")]
    UnknownMetabolite { reaction: String, metabolite: String },
    /// A participating metabolite has an unparseable formula
    #[error(transparent)]
    Formula(#[from] FormulaError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;

    fn metabolite(id: &str, formula: Option<&str>, charge: i32) -> Metabolite {
        MetaboliteBuilder::default()
            .id(id.to_string())
            .formula(formula.map(|f| f.to_string()))
            .charge(charge)
            .build()
            .unwrap()
    }

    fn metabolite_table(mets: Vec<Metabolite>) -> IndexMap<String, Metabolite> {
        mets.into_iter().map(|m| (m.id.clone(), m)).collect()
    }

    fn reaction(id: &str, stoichiometry: &[(&str, f64)]) -> Reaction {
        ReactionBuilder::default()
            .id(id.to_string())
            .metabolites(
                stoichiometry
                    .iter()
                    .map(|(met, coef)| (met.to_string(), *coef))
                    .collect(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn default_bounds_from_configuration() {
        let rxn = ReactionBuilder::default()
            .id("PFK".to_string())
            .build()
            .unwrap();
        assert!((rxn.lower_bound - -1000.).abs() < 1e-12);
        assert!((rxn.upper_bound - 1000.).abs() < 1e-12);
    }

    #[test]
    fn boundary_classification() {
        let exchange = reaction("EX_glc__D_e", &[("glc__D_e", -1.0)]);
        let demand = reaction("DM_atp_c", &[("atp_c", -1.0)]);
        let internal = reaction("GLCt", &[("glc__D_e", -1.0), ("glc__D_c", 1.0)]);
        assert!(exchange.is_boundary());
        assert!(!exchange.is_demand());
        assert!(demand.is_boundary());
        assert!(demand.is_demand());
        assert!(!internal.is_boundary());
    }

    #[test]
    fn balanced_reaction_is_empty() {
        let mets = metabolite_table(vec![
            metabolite("glc__D_e", Some("C6H12O6"), 0),
            metabolite("glc__D_c", Some("C6H12O6"), 0),
        ]);
        let rxn = reaction("GLCt", &[("glc__D_e", -1.0), ("glc__D_c", 1.0)]);
        assert!(rxn.check_mass_balance(&mets).unwrap().is_empty());
    }

    #[test]
    fn mass_imbalance_reported_per_element() {
        // One water made out of nothing but a proton
        let mets = metabolite_table(vec![
            metabolite("h_c", Some("H"), 1),
            metabolite("h2o_c", Some("H2O"), 0),
        ]);
        let rxn = reaction("BAD", &[("h_c", -1.0), ("h2o_c", 1.0)]);
        let balance = rxn.check_mass_balance(&mets).unwrap();
        assert!((balance["H"] - 1.0).abs() < 1e-9);
        assert!((balance["O"] - 1.0).abs() < 1e-9);
        assert!((balance["charge"] - -1.0).abs() < 1e-9);
    }

    #[test]
    fn charge_only_imbalance() {
        let mets = metabolite_table(vec![
            metabolite("a_c", Some("C2H2"), 0),
            metabolite("b_c", Some("C2H2"), -1),
        ]);
        let rxn = reaction("CHRG", &[("a_c", -1.0), ("b_c", 1.0)]);
        let balance = rxn.check_mass_balance(&mets).unwrap();
        assert_eq!(balance.len(), 1);
        assert!((balance["charge"] - -1.0).abs() < 1e-9);
    }

    #[test]
    fn formula_error_propagates() {
        let mets = metabolite_table(vec![
            metabolite("lipid_c", Some("C10H18*"), 0),
            metabolite("h2o_c", Some("H2O"), 0),
        ]);
        let rxn = reaction("LIP", &[("lipid_c", -1.0), ("h2o_c", 1.0)]);
        assert!(matches!(
            rxn.check_mass_balance(&mets),
            Err(BalanceError::Formula(_))
        ));
    }

    #[test]
    fn unknown_metabolite_is_an_error() {
        let mets = metabolite_table(vec![metabolite("a_c", Some("C"), 0)]);
        let rxn = reaction("GHOST", &[("a_c", -1.0), ("ghost_c", 1.0)]);
        assert!(matches!(
            rxn.check_mass_balance(&mets),
            Err(BalanceError::UnknownMetabolite { .. })
        ));
    }

    #[test]
    fn missing_formula_contributes_no_elements() {
        let mets = metabolite_table(vec![
            metabolite("a_c", Some("C6H12O6"), 0),
            metabolite("x_c", None, 0),
        ]);
        let rxn = reaction("TX", &[("a_c", -1.0), ("x_c", 1.0)]);
        let balance = rxn.check_mass_balance(&mets).unwrap();
        // The formula-less product hides the carbon loss entirely
        assert!((balance["C"] - -6.0).abs() < 1e-9);
        assert!(!balance.contains_key("charge"));
    }
}
