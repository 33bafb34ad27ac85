//! Orchestration of the quality checks and persistence of their results

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::metabolic_model::model::Model;
use crate::quality::balance::check_balance;
use crate::quality::free_mass::check_free_mass;
use crate::quality::orphan::find_orphan_reactions;
use crate::quality::variability::find_blocked_reactions;
use crate::quality::QualityError;

/// File the orphan reaction ids are written to
pub const ORPHAN_FILE: &str = "orphan_rxn.txt";
/// File the freely generated metabolite ids are written to
pub const FREE_MASS_FILE: &str = "free_cpd.txt";
/// File the imbalanced reaction ids are written to
pub const IMBALANCED_FILE: &str = "imbalanced_rxn.txt";
/// File the blocked reaction ids are written to
pub const BLOCKED_FILE: &str = "blocked_rxn.txt";

/// Aggregated findings of all four quality checks
#[derive(Debug, Clone)]
pub struct QualityReport {
    /// Reactions without gene evidence
    pub orphans: Vec<String>,
    /// Metabolites generated without mass input
    pub free_metabolites: Vec<String>,
    /// Mass or charge imbalanced reactions
    pub imbalanced: Vec<String>,
    /// Reactions that can never carry flux
    pub blocked: Vec<String>,
    /// Wall clock duration of the whole run
    pub duration: Duration,
}

impl QualityReport {
    /// Whether every check came back empty
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty()
            && self.free_metabolites.is_empty()
            && self.imbalanced.is_empty()
            && self.blocked.is_empty()
    }
}

/// Run every quality check against the model
///
/// `exclude` is skipped by the orphan and balance checks (typically the
/// biomass objective); `cytosol` names the compartment probed for free mass.
pub fn check_quality(
    model: &Model,
    exclude: &[String],
    cytosol: &str,
) -> Result<QualityReport, QualityError> {
    let start = Instant::now();
    let model_name = model.id.as_deref().unwrap_or("model");

    let orphans = find_orphan_reactions(model, exclude);
    let free_metabolites = check_free_mass(model, cytosol)?;
    let imbalanced = check_balance(model, exclude).imbalanced;
    let blocked = find_blocked_reactions(model)?;

    let report = QualityReport {
        orphans,
        free_metabolites,
        imbalanced,
        blocked,
        duration: start.elapsed(),
    };
    if report.is_clean() {
        log::info!("no inconsistencies detected");
    }
    log::info!(
        "took {} seconds to analyze {}",
        report.duration.as_secs(),
        model_name
    );
    Ok(report)
}

/// Write each non-empty result list into its fixed named file under `out_dir`
///
/// One identifier per line; empty lists produce no file.
pub fn write_report(report: &QualityReport, out_dir: &Path) -> std::io::Result<()> {
    write_list(&report.orphans, &out_dir.join(ORPHAN_FILE))?;
    write_list(&report.free_metabolites, &out_dir.join(FREE_MASS_FILE))?;
    write_list(&report.imbalanced, &out_dir.join(IMBALANCED_FILE))?;
    write_list(&report.blocked, &out_dir.join(BLOCKED_FILE))?;
    Ok(())
}

fn write_list(ids: &[String], path: &Path) -> std::io::Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let mut contents = ids.join("\n");
    contents.push('\n');
    fs::write(path, contents)
}
