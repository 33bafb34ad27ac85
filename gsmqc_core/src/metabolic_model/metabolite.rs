//! This module provides the metabolite struct representing a metabolite

use std::hash::Hash;

use derive_builder::Builder;
use indexmap::IndexMap;
use thiserror::Error;

/// Represents a metabolite
#[derive(Builder, Debug, Clone)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electrical charge of the Metabolite
    #[builder(default = "0")]
    pub charge: i32,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Notes about the metabolite
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Metabolite annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Metabolite {
    /// Parse the chemical formula into a map of element symbol to atom count
    ///
    /// A metabolite without a formula carries no elemental data and yields an
    /// empty map. Counts may be integers or decimals (polymer averages);
    /// anything outside element symbols and counts, such as an `*` R-group
    /// placeholder, is rejected.
    ///
    /// # Examples
    /// ```rust
    /// use gsmqc_core::metabolic_model::metabolite::MetaboliteBuilder;
    /// let glucose = MetaboliteBuilder::default()
    ///     .id("glc__D_c".to_string())
    ///     .formula(Some("C6H12O6".to_string()))
    ///     .build()
    ///     .unwrap();
    /// let elements = glucose.elements().unwrap();
    /// assert_eq!(elements["C"], 6.0);
    /// assert_eq!(elements["H"], 12.0);
    /// ```
    pub fn elements(&self) -> Result<IndexMap<String, f64>, FormulaError> {
        let mut composition: IndexMap<String, f64> = IndexMap::new();
        let formula = match &self.formula {
            Some(formula) => formula,
            None => return Ok(composition),
        };
        let chars: Vec<char> = formula.chars().collect();
        let mut pos = 0;
        while pos < chars.len() {
            if !chars[pos].is_ascii_uppercase() {
                return Err(FormulaError::InvalidCharacter {
                    formula: formula.clone(),
                    character: chars[pos],
                });
            }
            let mut element = String::new();
            element.push(chars[pos]);
            pos += 1;
            while pos < chars.len() && chars[pos].is_ascii_lowercase() {
                element.push(chars[pos]);
                pos += 1;
            }
            let mut count = String::new();
            while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                count.push(chars[pos]);
                pos += 1;
            }
            let count: f64 = if count.is_empty() {
                1.0
            } else {
                count.parse().map_err(|_| FormulaError::InvalidCount {
                    formula: formula.clone(),
                    count: count.clone(),
                })?
            };
            *composition.entry(element).or_insert(0.0) += count;
        }
        Ok(composition)
    }
}

impl Hash for Metabolite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state); // Hash by id
                             // If the metabolite has an associated compartment, also hash by that
        if let Some(ref compartment) = self.compartment {
            compartment.hash(state)
        };
    }
}

/// Errors from parsing a chemical formula
#[derive(Clone, Debug, Error)]
pub enum FormulaError {
    /// The formula contains a character that cannot start an element symbol
    #[error("invalid character '{character}' in formula {formula}")]
    InvalidCharacter { formula: String, character: char },
    /// An atom count could not be parsed as a number
    #[error("could not parse atom count '{count}' in formula {formula}")]
    InvalidCount { formula: String, count: String },
}
