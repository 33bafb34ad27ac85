//! Quality checks for genome scale metabolic reconstructions
//!
//! Four independent checks, each returning a list of identifiers:
//! [`orphan::find_orphan_reactions`] (reactions without gene evidence),
//! [`free_mass::check_free_mass`] (metabolites produced from nothing),
//! [`balance::check_balance`] (mass/charge imbalanced reactions) and
//! [`variability::find_blocked_reactions`] (reactions that can never carry
//! flux). [`report::check_quality`] runs all four and
//! [`report::write_report`] persists the non-empty lists.

pub mod balance;
pub mod free_mass;
pub mod orphan;
pub mod report;
pub mod variability;

pub use report::{check_quality, write_report, QualityReport};

use thiserror::Error;

use crate::metabolic_model::model::ModelError;

/// Errors from running a quality check
#[derive(Debug, Error)]
pub enum QualityError {
    /// A model operation or underlying solve failed
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The model objective could not be optimized during variability analysis
    #[error("the model objective could not be optimized during variability analysis")]
    ObjectiveInfeasible,
}
