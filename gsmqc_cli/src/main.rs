//! Command line audit of genome scale metabolic reconstructions

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gsmqc_core::metabolic_model::model::Model;
use gsmqc_core::quality::{check_quality, write_report};

/// Assess quality metrics of a genome scale metabolic model
///
/// Loads a COBRA JSON model, scans it for reactions without gene evidence,
/// metabolites generated from nothing, mass/charge imbalanced reactions and
/// blocked reactions, then writes each non-empty list of offenders to a
/// fixed named text file.
#[derive(Debug, Parser)]
#[command(name = "gsmqc", version, about)]
struct Cli {
    /// Path to the model in COBRA JSON format
    model: PathBuf,
    /// Reaction id to optimize; also excluded from the gene and balance
    /// checks, as biomass style objectives carry no genes and do not balance
    objective: Option<String>,
    /// Compartment probed for free mass generation
    #[arg(long, default_value = "c")]
    cytosol: String,
    /// Additional reaction ids to skip in the gene and balance checks
    #[arg(long)]
    exclude: Vec<String>,
    /// Directory the result lists are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut model = Model::read_json(&cli.model)
        .with_context(|| format!("failed to load model from {}", cli.model.display()))?;
    log::info!(
        "loaded {} ({} reactions, {} metabolites, {} genes)",
        model.id.as_deref().unwrap_or("model"),
        model.reactions.len(),
        model.metabolites.len(),
        model.genes.len()
    );

    let mut exclude = cli.exclude.clone();
    if let Some(objective) = &cli.objective {
        model
            .set_objective(objective)
            .with_context(|| format!("cannot use {objective} as the objective"))?;
        exclude.push(objective.clone());
    }

    let report = check_quality(&model, &exclude, &cli.cytosol)?;

    println!("orphan reactions:     {}", report.orphans.len());
    println!("free metabolites:     {}", report.free_metabolites.len());
    println!("imbalanced reactions: {}", report.imbalanced.len());
    println!("blocked reactions:    {}", report.blocked.len());

    write_report(&report, &cli.out_dir).context("failed to write result lists")?;
    Ok(())
}
